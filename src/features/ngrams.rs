//! Character n-gram extraction and the string pre-transforms applied
//! before it.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::config::FeatureFlags;
use crate::engine::constants::GREEK_LETTERS;

/// Shortest n-gram emitted, counting the `<`/`>` word markers
const MIN_NGRAM: usize = 2;

static GREEK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = GREEK_LETTERS.join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("greek letter pattern is valid")
});

/// Remove interior hyphens, keeping any hyphen in the first two or the
/// last two characters.
///
/// `"<pre-fix->"` becomes `"<prefix->"`.
pub fn dehyphenate(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    let mut i = 2;
    while i + 2 < chars.len() {
        if chars[i] == '-' {
            chars.remove(i);
        } else {
            i += 1;
        }
    }
    chars.into_iter().collect()
}

/// Replace whole-word Greek letter names with `~`
pub fn greekify(s: &str) -> String {
    GREEK_PATTERN.replace_all(s, "~").into_owned()
}

/// All `#gram#` features for `word` under the n-gram flags
pub fn word_ngrams(word: &str, flags: &FeatureFlags) -> Vec<String> {
    let mut marked = format!("<{}>", word);
    if flags.lowercase_n_grams {
        marked = marked.to_lowercase();
    }
    if flags.dehyphenate_n_grams {
        marked = dehyphenate(&marked);
    }
    if flags.greekify_n_grams {
        marked = greekify(&marked);
    }

    let chars: Vec<char> = marked.chars().collect();
    let len = chars.len();
    let limit = flags.n_gram_limit();
    let gram = |from: usize, to: usize| -> String {
        let mut s = String::with_capacity(to - from + 2);
        s.push('#');
        s.extend(&chars[from..to]);
        s.push('#');
        s
    };

    let mut grams = Vec::new();
    if flags.no_mid_n_grams {
        let max = limit.map_or(len, |l| l.min(len));
        for j in MIN_NGRAM..=max {
            grams.push(gram(0, j));
        }
        let start = limit.map_or(0, |l| len.saturating_sub(l));
        for i in start..len.saturating_sub(1) {
            grams.push(gram(i, len));
        }
    } else {
        for i in 0..len {
            let max = limit.map_or(len, |l| len.min(i + l));
            for j in (i + MIN_NGRAM)..=max {
                grams.push(gram(i, j));
            }
        }
    }
    grams
}

/// Concurrent word -> n-grams cache
#[derive(Debug, Default)]
pub struct NGramCache {
    entries: DashMap<String, Arc<Vec<String>>>,
}

impl NGramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached n-grams for `word`, computing them on first use
    pub fn get_or_compute(&self, word: &str, flags: &FeatureFlags) -> Arc<Vec<String>> {
        if let Some(hit) = self.entries.get(word) {
            return Arc::clone(hit.value());
        }
        let grams = Arc::new(word_ngrams(word, flags));
        self.entries
            .entry(word.to_string())
            .or_insert_with(|| Arc::clone(&grams));
        grams
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
