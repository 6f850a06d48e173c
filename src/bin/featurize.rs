use nerfeat::{Clique, Document, DocumentParser, FeatureFactory, FeatureFlags, TokenFeatures};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use log::{info, error};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "featurize")]
#[command(about = "Generate clique features for annotated JSON documents")]
#[command(version)]
struct Args {
    /// Input JSON document, or a directory of documents (.json / .json.gz)
    #[arg(short, long)]
    input: PathBuf,

    /// YAML flag file (defaults to every feature off)
    #[arg(short, long)]
    flags: Option<PathBuf>,

    /// Cliques to generate, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "C,CpC")]
    cliques: Vec<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One JSON object per token
    Jsonl,
    /// `doc<TAB>sentence<TAB>position<TAB>word<TAB>feature` per feature
    Tsv,
}

#[derive(Debug)]
struct FeaturizeStats {
    total_files: usize,
    processed_files: usize,
    failed_files: usize,
    total_sentences: usize,
    total_tokens: usize,
    total_features: usize,
    start_time: std::time::Instant,
}

impl Default for FeaturizeStats {
    fn default() -> Self {
        Self {
            total_files: 0,
            processed_files: 0,
            failed_files: 0,
            total_sentences: 0,
            total_tokens: 0,
            total_features: 0,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Runs the feature factory over documents and writes the results
struct Featurizer {
    factory: FeatureFactory,
    parser: DocumentParser,
    cliques: Vec<Clique>,
    format: OutputFormat,
    out: Box<dyn Write>,
    stats: FeaturizeStats,
    progress_bar: Option<ProgressBar>,
    verbose: bool,
}

impl Featurizer {
    fn new(args: &Args) -> Result<Self> {
        let flags = match &args.flags {
            Some(path) => FeatureFlags::from_yaml_file(path)?,
            None => FeatureFlags::default(),
        };
        let factory = FeatureFactory::new(flags)?;
        info!("{}", factory.describe_lexicon());

        let cliques = args
            .cliques
            .iter()
            .map(|name| name.parse::<Clique>())
            .collect::<Result<Vec<_>, _>>()?;

        let out: Box<dyn Write> = match &args.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
                anyhow!("Failed to create output file {}: {}", path.display(), e)
            })?)),
            None => Box::new(BufWriter::new(io::stdout())),
        };

        Ok(Self::with_output(factory, cliques, args.format, out, args.verbose))
    }

    fn with_output(
        factory: FeatureFactory,
        cliques: Vec<Clique>,
        format: OutputFormat,
        out: Box<dyn Write>,
        verbose: bool,
    ) -> Self {
        Self {
            factory,
            parser: DocumentParser::new(),
            cliques,
            format,
            out,
            stats: FeaturizeStats::default(),
            progress_bar: None,
            verbose,
        }
    }

    /// Initialize progress bar
    fn init_progress_bar(&mut self, total_files: usize) -> Result<()> {
        if !self.verbose && total_files > 1 {
            let pb = ProgressBar::new(total_files as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-");
            pb.set_style(style);
            pb.set_message("Featurizing documents...");
            self.progress_bar = Some(pb);
        }
        Ok(())
    }

    fn update_progress(&mut self, current_file: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Processing: {}", current_file));
            pb.inc(1);
        } else if self.verbose {
            info!("Processing: {}", current_file);
        }
    }

    fn finish_progress(&mut self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Featurization completed!");
        }
    }

    /// Featurize a single file or every document file in a directory
    fn run(&mut self, input: &Path) -> Result<()> {
        if !input.exists() {
            return Err(anyhow!("Input path does not exist: {}", input.display()));
        }

        let files = if input.is_dir() {
            find_json_files(input)?
        } else {
            vec![input.to_path_buf()]
        };
        info!("Found {} document files", files.len());

        self.init_progress_bar(files.len())?;
        for file_path in &files {
            self.process_file(file_path)?;
            let name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "unknown".to_string());
            self.update_progress(&name);
        }
        self.finish_progress();
        self.out.flush()?;
        Ok(())
    }

    /// Parse and featurization failures mark the whole file as failed and
    /// write nothing for it; write failures abort
    fn process_file(&mut self, file_path: &Path) -> Result<()> {
        self.stats.total_files += 1;
        let documents = match self.parser.parse_file(file_path) {
            Ok(docs) => docs,
            Err(e) => {
                self.stats.failed_files += 1;
                error!("Failed to parse {}: {}", file_path.display(), e);
                return Ok(());
            }
        };

        let mut featurized = Vec::with_capacity(documents.len());
        for document in &documents {
            if let Err(e) = self.parser.validate_document(document) {
                log::warn!("Skipping invalid document {}: {}", document.id, e);
                continue;
            }
            match self.factory.featurize_document(document, &self.cliques) {
                Ok(sentences) => featurized.push((document, sentences)),
                Err(e) => {
                    self.stats.failed_files += 1;
                    error!(
                        "Failed to featurize document {} in {}: {}",
                        document.id,
                        file_path.display(),
                        e
                    );
                    return Ok(());
                }
            }
        }

        for (document, sentences) in &featurized {
            self.write_document(document, sentences)?;
        }
        self.stats.processed_files += 1;
        Ok(())
    }

    fn write_document(&mut self, document: &Document, sentences: &[Vec<TokenFeatures>]) -> Result<()> {
        self.stats.total_sentences += sentences.len();
        for (sentence_idx, tokens) in sentences.iter().enumerate() {
            for token in tokens {
                self.stats.total_tokens += 1;
                self.stats.total_features += token.len();
                match self.format {
                    OutputFormat::Jsonl => {
                        let record = serde_json::json!({
                            "doc": document.id,
                            "sentence": sentence_idx,
                            "position": token.position,
                            "word": token.word,
                            "features": token.features,
                        });
                        writeln!(self.out, "{}", record)?;
                    }
                    OutputFormat::Tsv => {
                        for feature in token.features.values().flatten() {
                            writeln!(
                                self.out,
                                "{}\t{}\t{}\t{}\t{}",
                                document.id, sentence_idx, token.position, token.word, feature
                            )?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn print_stats(&self) {
        let elapsed = self.stats.start_time.elapsed();

        eprintln!("\n=== Featurization Statistics ===");
        eprintln!("Total files found: {}", self.stats.total_files);
        eprintln!("Successfully processed: {}", self.stats.processed_files);
        eprintln!("Failed to process: {}", self.stats.failed_files);
        eprintln!("Total sentences: {}", self.stats.total_sentences);
        eprintln!("Total tokens: {}", self.stats.total_tokens);
        eprintln!("Total features: {}", self.stats.total_features);
        eprintln!("Total time: {:.2?}", elapsed);

        if self.stats.total_tokens > 0 && elapsed.as_secs_f64() > 0.0 {
            let tokens_per_second = self.stats.total_tokens as f64 / elapsed.as_secs_f64();
            eprintln!("Processing speed: {:.1} tokens/second", tokens_per_second);
        }
    }
}

/// All `.json` and `.json.gz` files directly under `dir`, sorted
fn find_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if name.ends_with(".json") || name.ends_with(".json.gz") || name.ends_with(".jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::init();
    }

    let mut featurizer = Featurizer::new(&args)?;
    featurizer.run(&args.input)?;
    featurizer.print_stats();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_json_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.json", "a.json.gz", "c.jsonl", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let files = find_json_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json.gz", "b.json", "c.jsonl"]);
    }

    /// Writer whose contents stay readable after it is boxed
    #[derive(Clone, Default)]
    struct SharedBuf(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sentence(words: &[&str], domain: Option<&str>) -> String {
        let words = serde_json::to_string(words).unwrap();
        let mut fields = format!(r#"{{"$type": "TokensField", "name": "word", "tokens": {}}}"#, words);
        if let Some(domain) = domain {
            fields.push_str(&format!(r#", {{"$type": "TokensField", "name": "domain", "tokens": ["{}"]}}"#, domain));
        }
        format!(r#"{{"numTokens": 1, "fields": [{}]}}"#, fields)
    }

    #[test]
    fn test_failed_file_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let good = format!(r#"{{"id": "ok", "sentences": [{}]}}"#, sentence(&["Paris"], Some("news")));
        let bad = format!(r#"{{"id": "bad", "sentences": [{}]}}"#, sentence(&["Rome"], None));
        fs::write(dir.path().join("a.jsonl"), format!("{}\n{}\n", good, bad)).unwrap();
        fs::write(dir.path().join("b.json"), &good).unwrap();

        let factory = FeatureFactory::new(FeatureFlags {
            use_word: true,
            use_domain_adaptation: true,
            ..Default::default()
        })
        .unwrap();
        let sink = SharedBuf::default();
        let mut featurizer =
            Featurizer::with_output(factory, vec![Clique::C], OutputFormat::Tsv, Box::new(sink.clone()), true);
        featurizer.run(dir.path()).unwrap();

        assert_eq!(featurizer.stats.total_files, 2);
        assert_eq!(featurizer.stats.failed_files, 1);
        assert_eq!(featurizer.stats.processed_files, 1);

        let output = String::from_utf8(sink.0.borrow().clone()).unwrap();
        let docs: Vec<&str> = output.lines().map(|l| l.split('\t').next().unwrap()).collect();
        assert!(!docs.is_empty());
        assert!(docs.iter().all(|d| *d == "ok"));
        assert_eq!(featurizer.stats.total_tokens, 1);
    }
}
