use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::constants::BOUNDARY;

/// A single annotated token.
///
/// Every annotation except the word is optional; generators that need a
/// missing annotation contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<String>,
    /// Open-ended key/value annotations for `useGenericFeatures`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub generic: BTreeMap<String, String>,
}

impl Token {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Default::default()
        }
    }

    /// The sentinel returned for offsets outside the sentence
    pub fn boundary() -> Self {
        Self {
            word: BOUNDARY.to_string(),
            shape: Some(BOUNDARY.to_string()),
            tag: Some(BOUNDARY.to_string()),
            lemma: Some(BOUNDARY.to_string()),
            chunk: Some(BOUNDARY.to_string()),
            ..Default::default()
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.word == BOUNDARY
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.chunk = Some(chunk.into());
        self
    }

    pub fn with_abbr(mut self, abbr: impl Into<String>) -> Self {
        self.abbr = Some(abbr.into());
        self
    }

    pub fn with_generic(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.generic.insert(key.into(), value.into());
        self
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref()
    }

    /// Domain label; an empty string counts as absent
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|d| !d.is_empty())
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn chunk(&self) -> Option<&str> {
        self.chunk.as_deref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn abbr(&self) -> Option<&str> {
        self.abbr.as_deref()
    }

    pub fn head_word(&self) -> Option<&str> {
        self.head_word.as_deref()
    }

    pub fn governor(&self) -> Option<&str> {
        self.governor.as_deref()
    }

    pub fn unknown(&self) -> Option<&str> {
        self.unknown.as_deref()
    }

    pub fn generic(&self) -> impl Iterator<Item = (&str, &str)> {
        self.generic.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the POS tag marks a verb
    pub fn is_verb(&self) -> bool {
        self.tag().map(|t| t.starts_with("VB")).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_token() {
        let pad = Token::boundary();
        assert!(pad.is_boundary());
        assert_eq!(pad.tag(), Some(BOUNDARY));
        assert!(!Token::new("John").is_boundary());
    }

    #[test]
    fn test_empty_domain_is_absent() {
        let tok = Token::new("x").with_domain("");
        assert_eq!(tok.domain(), None);
        let tok = Token::new("x").with_domain("news");
        assert_eq!(tok.domain(), Some("news"));
    }

    #[test]
    fn test_is_verb() {
        assert!(Token::new("ran").with_tag("VBD").is_verb());
        assert!(!Token::new("cat").with_tag("NN").is_verb());
        assert!(!Token::new("cat").is_verb());
    }
}
