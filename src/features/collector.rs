//! Feature name builder bound to an output set.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

/// Builds feature strings and commits them to an output set.
///
/// Every committed name is written as `name|suffix`; when a domain is set
/// a second copy `name|domain-suffix` is written as well.
pub struct FeatureCollector<'a> {
    features: &'a mut BTreeSet<String>,
    suffix: String,
    domain: Option<String>,
    buf: String,
}

impl<'a> FeatureCollector<'a> {
    /// # Panics
    /// Panics if `suffix` is empty.
    pub fn new(features: &'a mut BTreeSet<String>, suffix: &str) -> Self {
        let mut collector = Self {
            features,
            suffix: String::new(),
            domain: None,
            buf: String::with_capacity(32),
        };
        collector.set_suffix(suffix);
        collector
    }

    /// # Panics
    /// Panics if `suffix` is empty; an empty suffix is a programming error.
    pub fn set_suffix(&mut self, suffix: &str) -> &mut Self {
        assert!(!suffix.is_empty(), "feature suffix must not be empty");
        self.suffix.clear();
        self.suffix.push_str(suffix);
        self
    }

    /// Set or clear the domain; `None` and `""` disable duplication
    pub fn set_domain(&mut self, domain: Option<&str>) -> &mut Self {
        self.domain = domain.filter(|d| !d.is_empty()).map(str::to_string);
        self
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Start a fresh feature name
    pub fn build(&mut self) -> &mut Self {
        self.buf.clear();
        self
    }

    pub fn append(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self
    }

    pub fn append_char(&mut self, c: char) -> &mut Self {
        self.buf.push(c);
        self
    }

    pub fn append_display(&mut self, value: impl fmt::Display) -> &mut Self {
        // writing into a String cannot fail
        let _ = write!(self.buf, "{}", value);
        self
    }

    pub fn dash(&mut self) -> &mut Self {
        self.buf.push('-');
        self
    }

    /// Commit the current buffer
    pub fn add(&mut self) {
        let mut plain = String::with_capacity(self.buf.len() + self.suffix.len() + 1);
        plain.push_str(&self.buf);
        plain.push('|');

        if let Some(domain) = &self.domain {
            let mut qualified = plain.clone();
            qualified.push_str(domain);
            qualified.push('-');
            qualified.push_str(&self.suffix);
            self.features.insert(qualified);
        }

        plain.push_str(&self.suffix);
        self.features.insert(plain);
    }

    /// Commit `name` directly
    pub fn add_str(&mut self, name: &str) {
        self.build().append(name).add();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_without_domain() {
        let mut features = BTreeSet::new();
        let mut collector = FeatureCollector::new(&mut features, "C");
        collector.build().append("John").dash().append("WORD").add();
        drop(collector);

        assert_eq!(features.len(), 1);
        assert!(features.contains("John-WORD|C"));
    }

    #[test]
    fn test_add_with_domain_writes_two() {
        let mut features = BTreeSet::new();
        let mut collector = FeatureCollector::new(&mut features, "CpC");
        collector.set_domain(Some("bio"));
        collector.add_str("PSEQ");
        drop(collector);

        assert_eq!(features.len(), 2);
        assert!(features.contains("PSEQ|CpC"));
        assert!(features.contains("PSEQ|bio-CpC"));
    }

    #[test]
    fn test_empty_domain_is_no_domain() {
        let mut features = BTreeSet::new();
        let mut collector = FeatureCollector::new(&mut features, "C");
        collector.set_domain(Some(""));
        assert_eq!(collector.domain(), None);
        collector.add_str("###");
        collector.set_domain(None);
        collector.add_str("x");
        drop(collector);
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn test_each_add_inserts_one_or_two() {
        let mut features = BTreeSet::new();
        let mut collector = FeatureCollector::new(&mut features, "C");
        collector.set_domain(Some("news"));
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            collector.add_str(name);
            assert_eq!(collector.features.len(), (i + 1) * 2);
        }
    }

    #[test]
    fn test_build_resets_buffer() {
        let mut features = BTreeSet::new();
        let mut collector = FeatureCollector::new(&mut features, "C");
        collector.build().append("first").add();
        collector.build().append_display(42).append_char('#').add();
        drop(collector);
        assert!(features.contains("first|C"));
        assert!(features.contains("42#|C"));
    }

    #[test]
    #[should_panic(expected = "suffix must not be empty")]
    fn test_empty_suffix_panics() {
        let mut features = BTreeSet::new();
        let mut collector = FeatureCollector::new(&mut features, "C");
        collector.set_suffix("");
    }

    #[test]
    #[should_panic]
    fn test_empty_suffix_in_constructor_panics() {
        let mut features = BTreeSet::new();
        let _ = FeatureCollector::new(&mut features, "");
    }
}
