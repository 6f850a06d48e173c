use nerfeat::{Clique, FeatureFactory, FeatureFlags, PaddedSequence, Token};
use nerfeat::lexicon::{Gazetteer, LexicalResources};
use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== nerfeat: clique feature templates for sequence labeling ===");

    let flags = FeatureFlags::from_yaml_str(
        r#"
useWord: true
useTags: true
usePrev: true
useNext: true
useSequences: true
usePrevSequences: true
useNextSequences: true
useTaggySequences: true
useSymTags: true
useParenMatching: true
wordShape: chris2
useShapeStrings: true
useGazettes: true
cleanGazette: true
useDistSim: true
unknownWordDistSimClass: UNK
"#,
    )?;

    // Small in-memory gazetteer
    let mut gazetteer = Gazetteer::new();
    gazetteer.add_entry("LOC", &["New", "York"]);
    let resources = LexicalResources::default().with_gazetteer(gazetteer);
    let factory = FeatureFactory::with_resources(flags, resources)?;

    println!("Lexicon: {}", factory.describe_lexicon());

    let tokens: Vec<Token> = [
        ("Mr.", "NNP"),
        ("Smith", "NNP"),
        ("(", "-LRB-"),
        ("IBM", "NNP"),
        (")", "-RRB-"),
        ("visited", "VBD"),
        ("New", "NNP"),
        ("York", "NNP"),
    ]
    .iter()
    .map(|(word, tag)| Token::new(*word).with_tag(*tag))
    .collect();
    let seq = PaddedSequence::new(&tokens);

    let examples = [
        (1, Clique::C),
        (4, Clique::CpCp2C),
        (6, Clique::C),
        (6, Clique::CpCnC),
    ];

    for (position, clique) in examples {
        println!("\n--- '{}' under {} ---", tokens[position].word(), clique);
        match factory.generate_features(&seq, position, clique) {
            Ok(features) => {
                println!("Found {} features", features.len());
                for feature in features.iter().take(12) {
                    println!("  {}", feature);
                }
            }
            Err(e) => {
                println!("Error generating features: {}", e);
            }
        }
    }

    // Unknown clique names are rejected
    println!("\n--- Unknown clique ---");
    if let Err(e) = factory.generate_features_named(&seq, 0, "CpCpCpC") {
        println!("Rejected: {}", e);
    }

    Ok(())
}
