//! Distributional-similarity lexicon and the per-word class resolver.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;

use crate::data::parser::{for_each_text_line, open_text_reader};
use crate::data::token::Token;
use crate::engine::config::{DistSimFormat, FeatureFlags};
use crate::error::{FeatureError, Result};
use crate::features::shape::digits;

/// How a word is turned into a lexicon key.
///
/// The same folding runs when a lexicon file is read and when a token is
/// looked up, so keys on both sides always agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFolding {
    pub cased: bool,
    pub number_equivalence: bool,
}

impl KeyFolding {
    pub fn from_flags(flags: &FeatureFlags) -> Self {
        Self {
            cased: flags.cased_dist_sim,
            number_equivalence: flags.number_equivalence_dist_sim,
        }
    }

    /// Lowercase unless cased, then map digits to `9` under number
    /// equivalence
    pub fn fold(&self, word: &str) -> String {
        let key = if self.cased {
            word.to_string()
        } else {
            word.to_lowercase()
        };
        if self.number_equivalence {
            digits(&key)
        } else {
            key
        }
    }
}

/// Word -> cluster class table
#[derive(Debug, Clone, Default)]
pub struct DistSimLexicon {
    classes: HashMap<String, Arc<str>>,
    source: Option<PathBuf>,
}

impl DistSimLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lexicon file, folding every word with `folding`
    pub fn load<P: AsRef<Path>>(path: P, format: DistSimFormat, folding: KeyFolding) -> Result<Self> {
        let path = path.as_ref();
        let to_error = |source| FeatureError::Resource {
            kind: "distsim lexicon",
            path: path.to_path_buf(),
            source,
        };
        let reader = open_text_reader(path).map_err(to_error)?;
        let mut lexicon = Self::from_reader(reader, format, folding).map_err(to_error)?;
        lexicon.source = Some(path.to_path_buf());
        log::info!(
            "Loaded distsim lexicon with {} entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Read `word<TAB>class` (or `class<TAB>word`) lines, skipping
    /// malformed ones
    pub fn from_reader<R: BufRead>(reader: R, format: DistSimFormat, folding: KeyFolding) -> io::Result<Self> {
        let mut lexicon = Self::new();
        let mut skipped = 0usize;
        let invalid = for_each_text_line(reader, |_, line| {
            let mut fields = line.split_whitespace();
            let (first, second) = match (fields.next(), fields.next()) {
                (Some(a), Some(b)) => (a, b),
                (None, _) => return,
                _ => {
                    skipped += 1;
                    return;
                }
            };
            let (word, class) = match format {
                DistSimFormat::WordClass => (first, second),
                DistSimFormat::ClassWord => (second, first),
            };
            lexicon.insert(&folding.fold(word), class);
        })?;
        skipped += invalid;
        if skipped > 0 {
            log::warn!("Skipped {} malformed distsim lines", skipped);
        }
        Ok(lexicon)
    }

    /// Insert an already folded key
    pub fn insert(&mut self, word: &str, class: &str) {
        self.classes.insert(word.to_string(), Arc::from(class));
    }

    pub fn get(&self, key: &str) -> Option<&Arc<str>> {
        self.classes.get(key)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// What `describe_lexicon` reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconDescription {
    NotLoaded,
    Loaded {
        source: String,
        entries: usize,
        cased: bool,
        number_equivalence: bool,
        unknown_class: Option<String>,
    },
}

impl fmt::Display for LexiconDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexiconDescription::NotLoaded => write!(f, "no distsim lexicon loaded"),
            LexiconDescription::Loaded {
                source,
                entries,
                cased,
                number_equivalence,
                unknown_class,
            } => write!(
                f,
                "distsim lexicon {} ({} entries, cased={}, numberEquivalence={}, unknownClass={})",
                source,
                entries,
                cased,
                number_equivalence,
                unknown_class.as_deref().unwrap_or("none")
            ),
        }
    }
}

/// Resolves a token's distsim class through a read-through cache.
///
/// The cache is keyed by the normalized lookup key, so every token with
/// the same key resolves once and shares the result.
#[derive(Debug, Default)]
pub struct DistSimResolver {
    lexicon: Option<Arc<DistSimLexicon>>,
    folding: KeyFolding,
    unknown_class: Option<Arc<str>>,
    cache: DashMap<String, Option<Arc<str>>>,
}

impl DistSimResolver {
    pub fn new(lexicon: Option<Arc<DistSimLexicon>>, flags: &FeatureFlags) -> Self {
        Self {
            lexicon,
            folding: KeyFolding::from_flags(flags),
            unknown_class: flags.unknown_word_dist_sim_class.as_deref().map(Arc::from),
            cache: DashMap::new(),
        }
    }

    /// Normalized lexicon key for `word`
    pub fn lookup_key(&self, word: &str) -> String {
        self.folding.fold(word)
    }

    /// Class for `token`, falling back to the unknown class on a miss
    pub fn resolve(&self, token: &Token) -> Option<Arc<str>> {
        let key = self.lookup_key(token.word());
        if let Some(hit) = self.cache.get(&key) {
            return hit.value().clone();
        }

        let class = self
            .lexicon
            .as_ref()
            .and_then(|lex| lex.get(&key).cloned())
            .or_else(|| self.unknown_class.clone());
        self.cache.entry(key).or_insert(class).value().clone()
    }

    /// Memoized class for `token`, without computing it
    pub fn cached(&self, token: &Token) -> Option<Option<Arc<str>>> {
        let key = self.lookup_key(token.word());
        self.cache.get(&key).map(|entry| entry.value().clone())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn describe(&self) -> LexiconDescription {
        match &self.lexicon {
            None => LexiconDescription::NotLoaded,
            Some(lexicon) => LexiconDescription::Loaded {
                source: lexicon
                    .source()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<in-memory>".to_string()),
                entries: lexicon.len(),
                cased: self.folding.cased,
                number_equivalence: self.folding.number_equivalence,
                unknown_class: self.unknown_class.as_deref().map(str::to_string),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn flags() -> FeatureFlags {
        FeatureFlags {
            use_dist_sim: true,
            ..Default::default()
        }
    }

    fn cased() -> KeyFolding {
        KeyFolding {
            cased: true,
            number_equivalence: false,
        }
    }

    #[test]
    fn test_read_formats() {
        let data = "Paris\tC12\nLondon C12\nbroken\n\n";
        let lex = DistSimLexicon::from_reader(data.as_bytes(), DistSimFormat::WordClass, KeyFolding::default()).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.get("paris").map(|c| &**c), Some("C12"));
        assert!(lex.get("Paris").is_none());

        let data = "C7\tRome\n";
        let lex = DistSimLexicon::from_reader(data.as_bytes(), DistSimFormat::ClassWord, cased()).unwrap();
        assert_eq!(lex.get("Rome").map(|c| &**c), Some("C7"));
    }

    #[test]
    fn test_lookup_key_normalization() {
        let mut f = flags();
        let resolver = DistSimResolver::new(None, &f);
        assert_eq!(resolver.lookup_key("Paris"), "paris");

        f.cased_dist_sim = true;
        f.number_equivalence_dist_sim = true;
        let resolver = DistSimResolver::new(None, &f);
        assert_eq!(resolver.lookup_key("Route66"), "Route99");
    }

    #[test]
    fn test_resolve_hit_and_miss() {
        let mut lex = DistSimLexicon::new();
        lex.insert("paris", "C12");
        let resolver = DistSimResolver::new(Some(Arc::new(lex)), &flags());

        assert_eq!(resolver.resolve(&Token::new("Paris")).as_deref(), Some("C12"));
        assert_eq!(resolver.resolve(&Token::new("Gotham")), None);
    }

    #[test]
    fn test_unknown_class_fallback_is_memoized() {
        let mut f = flags();
        f.unknown_word_dist_sim_class = Some("UNK".to_string());
        let resolver = DistSimResolver::new(None, &f);

        for word in ["alpha", "Beta", "42"] {
            let token = Token::new(word);
            assert_eq!(resolver.cached(&token), None);
            assert_eq!(resolver.resolve(&token).as_deref(), Some("UNK"));
            assert_eq!(resolver.cached(&token).flatten().as_deref(), Some("UNK"));
        }
        assert_eq!(resolver.cache_len(), 3);

        // repeat queries hit the same entry
        let first = resolver.resolve(&Token::new("alpha")).unwrap();
        let second = resolver.resolve(&Token::new("ALPHA")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        resolver.clear();
        assert_eq!(resolver.cache_len(), 0);
    }

    #[test]
    fn test_describe_distinguishes_absent_and_empty() {
        let resolver = DistSimResolver::new(None, &flags());
        assert_eq!(resolver.describe(), LexiconDescription::NotLoaded);
        assert_eq!(resolver.describe().to_string(), "no distsim lexicon loaded");

        let resolver = DistSimResolver::new(Some(Arc::new(DistSimLexicon::new())), &flags());
        match resolver.describe() {
            LexiconDescription::Loaded { entries, .. } => assert_eq!(entries, 0),
            other => panic!("Expected loaded lexicon, got {:?}", other),
        }
    }

    #[test]
    fn test_load_file_records_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Berlin\tC3").unwrap();
        let lex = DistSimLexicon::load(file.path(), DistSimFormat::WordClass, KeyFolding::default()).unwrap();
        assert_eq!(lex.len(), 1);
        assert_eq!(lex.source(), Some(file.path()));
        assert!(DistSimLexicon::load("/no/such/lexicon", DistSimFormat::WordClass, KeyFolding::default()).is_err());
    }

    #[test]
    fn test_number_equivalence_applies_to_loaded_keys() {
        let mut f = flags();
        f.number_equivalence_dist_sim = true;
        let folding = KeyFolding::from_flags(&f);
        let lex = DistSimLexicon::from_reader("1999\tC5\nRoute66\tC9\n".as_bytes(), DistSimFormat::WordClass, folding)
            .unwrap();
        assert_eq!(lex.get("9999").map(|c| &**c), Some("C5"));

        let resolver = DistSimResolver::new(Some(Arc::new(lex)), &f);
        assert_eq!(resolver.resolve(&Token::new("1999")).as_deref(), Some("C5"));
        assert_eq!(resolver.resolve(&Token::new("2024")).as_deref(), Some("C5"));
        assert_eq!(resolver.resolve(&Token::new("ROUTE12")).as_deref(), Some("C9"));
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let data: &[u8] = b"Paris\tC12\n\xff\xfe\tC1\nRome\tC7\n";
        let lex = DistSimLexicon::from_reader(data, DistSimFormat::WordClass, KeyFolding::default()).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.get("rome").map(|c| &**c), Some("C7"));
    }
}
