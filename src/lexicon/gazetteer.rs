//! Gazetteer tables.
//!
//! A gazette line is `TAG word1 word2 ...`. Single-word entries go into a
//! context-free (sloppy) table; multi-word entries go into a phrase
//! (clean) table that only matches when the whole phrase is present in
//! the sentence at the right alignment.

use std::collections::{BTreeSet, HashMap};
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use crate::data::padded::PaddedSequence;
use crate::data::parser::{for_each_text_line, open_text_reader};
use crate::error::{FeatureError, Result};

/// One phrase alignment: `words[offset]` is the word it is indexed under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GazetteInfo {
    pub features: [String; 2],
    pub offset: usize,
    pub words: Arc<[String]>,
}

#[derive(Debug, Default, Clone)]
pub struct Gazetteer {
    sloppy: HashMap<String, BTreeSet<String>>,
    clean: HashMap<String, Vec<GazetteInfo>>,
    entries: usize,
}

fn gazette_features(tag: &str, len: usize) -> [String; 2] {
    [format!("{}-GAZ", tag), format!("{}-GAZ{}", tag, len)]
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single gazette file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut gazetteer = Self::new();
        gazetteer.load_file(path)?;
        Ok(gazetteer)
    }

    /// Merge a gazette file into this table, returning the entries read
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let to_error = |source| FeatureError::Resource {
            kind: "gazette",
            path: path.to_path_buf(),
            source,
        };
        let reader = open_text_reader(path).map_err(to_error)?;
        let added = self.read_from(reader).map_err(to_error)?;
        log::info!("Loaded {} gazette entries from {}", added, path.display());
        Ok(added)
    }

    /// Read gazette lines; malformed lines are skipped
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut added = 0;
        let invalid = for_each_text_line(reader, |line_no, line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return;
            }
            let mut fields = line.split_whitespace();
            let tag = match fields.next() {
                Some(tag) => tag,
                None => return,
            };
            let words: Vec<&str> = fields.collect();
            if words.is_empty() {
                log::warn!("Skipping gazette line {}: no words after tag '{}'", line_no, tag);
                return;
            }
            self.add_entry(tag, &words);
            added += 1;
        })?;
        if invalid > 0 {
            log::warn!("Skipped {} undecodable gazette lines", invalid);
        }
        Ok(added)
    }

    /// Add one entry; an empty tag or word list is ignored
    pub fn add_entry(&mut self, tag: &str, words: &[&str]) {
        if tag.is_empty() || words.is_empty() {
            return;
        }
        self.entries += 1;
        let features = gazette_features(tag, words.len());

        if let [word] = words {
            self.sloppy
                .entry(word.to_string())
                .or_default()
                .extend(features);
            return;
        }

        let phrase: Arc<[String]> = words.iter().map(|w| w.to_string()).collect();
        for (offset, word) in words.iter().enumerate() {
            let info = GazetteInfo {
                features: features.clone(),
                offset,
                words: Arc::clone(&phrase),
            };
            let infos = self.clean.entry(word.to_string()).or_default();
            if !infos.contains(&info) {
                infos.push(info);
            }
        }
    }

    /// Features of every single-word entry for `word`
    pub fn sloppy_matches<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.sloppy
            .get(word)
            .into_iter()
            .flat_map(|features| features.iter().map(String::as_str))
    }

    /// Features of every phrase that covers `position` exactly.
    ///
    /// Alignments that would start before the sentence or run past its
    /// end never match.
    pub fn clean_matches<'a>(&'a self, seq: &PaddedSequence<'_>, position: usize) -> Vec<&'a str> {
        let word = seq.at(position, 0).word();
        let infos = match self.clean.get(word) {
            Some(infos) => infos,
            None => return Vec::new(),
        };

        let mut matched = Vec::new();
        for info in infos {
            let start = position as isize - info.offset as isize;
            if start < 0 || start as usize + info.words.len() > seq.len() {
                continue;
            }
            let aligned = info
                .words
                .iter()
                .enumerate()
                .all(|(i, w)| seq.get(start + i as isize).word() == w.as_str());
            if aligned {
                matched.extend(info.features.iter().map(String::as_str));
            }
        }
        matched
    }

    /// Number of entries added
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::token::Token;
    use std::io::Write;

    fn sentence(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| Token::new(*w)).collect()
    }

    #[test]
    fn test_read_and_skip_malformed() {
        let data = "CITY New York\n\n# comment\nPERSON\nCITY Paris\n  \nORG Acme Corp Inc\n";
        let mut gaz = Gazetteer::new();
        let added = gaz.read_from(data.as_bytes()).unwrap();
        assert_eq!(added, 3);
        assert_eq!(gaz.len(), 3);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_stop_reading() {
        let data: &[u8] = b"CITY Paris\nCITY \xff\xfe\nCITY Rome\n";
        let mut gaz = Gazetteer::new();
        let added = gaz.read_from(data).unwrap();
        assert_eq!(added, 2);
        assert_eq!(gaz.sloppy_matches("Rome").count(), 2);
    }

    #[test]
    fn test_sloppy_fires_regardless_of_neighbors() {
        let mut gaz = Gazetteer::new();
        gaz.add_entry("CITY", &["Paris"]);
        let found: Vec<_> = gaz.sloppy_matches("Paris").collect();
        assert_eq!(found, vec!["CITY-GAZ", "CITY-GAZ1"]);
        assert_eq!(gaz.sloppy_matches("London").count(), 0);
    }

    #[test]
    fn test_clean_requires_contiguous_phrase() {
        let mut gaz = Gazetteer::new();
        gaz.add_entry("CITY", &["New", "York"]);

        let tokens = sentence(&["in", "New", "York", "today"]);
        let seq = PaddedSequence::new(&tokens);
        assert_eq!(gaz.clean_matches(&seq, 1), vec!["CITY-GAZ", "CITY-GAZ2"]);
        assert_eq!(gaz.clean_matches(&seq, 2), vec!["CITY-GAZ", "CITY-GAZ2"]);
        assert!(gaz.clean_matches(&seq, 0).is_empty());

        let tokens = sentence(&["New", "XYZ"]);
        let seq = PaddedSequence::new(&tokens);
        assert!(gaz.clean_matches(&seq, 0).is_empty());
    }

    #[test]
    fn test_clean_never_matches_past_edges() {
        let mut gaz = Gazetteer::new();
        gaz.add_entry("CITY", &["New", "York"]);

        let tokens = sentence(&["New"]);
        let seq = PaddedSequence::new(&tokens);
        assert!(gaz.clean_matches(&seq, 0).is_empty());

        let tokens = sentence(&["York", "is", "big"]);
        let seq = PaddedSequence::new(&tokens);
        assert!(gaz.clean_matches(&seq, 0).is_empty());
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let mut gaz = Gazetteer::new();
        gaz.add_entry("CITY", &["New", "York"]);
        gaz.add_entry("CITY", &["New", "York"]);
        let tokens = sentence(&["New", "York"]);
        let seq = PaddedSequence::new(&tokens);
        assert_eq!(gaz.clean_matches(&seq, 0).len(), 2);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "LOC Rome").unwrap();
        writeln!(file, "LOC Buenos Aires").unwrap();
        let gaz = Gazetteer::load(file.path()).unwrap();
        assert_eq!(gaz.len(), 2);
        assert_eq!(gaz.sloppy_matches("Rome").count(), 2);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = Gazetteer::load("/no/such/gazette.txt").unwrap_err();
        assert!(matches!(err, FeatureError::Resource { kind: "gazette", .. }));
    }
}
