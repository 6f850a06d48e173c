//! Core FeatureFactory struct and constructor

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;

use crate::data::padded::PaddedSequence;
use crate::data::token::Token;
use crate::engine::config::FeatureFlags;
use crate::error::{FeatureError, Result};
use crate::features::{self, FeatureContext, NGramCache};
use crate::lexicon::{DistSimResolver, LexicalResources, LexiconDescription};
use crate::types::clique::Clique;

/// Entry point for feature generation.
///
/// Holds the flags, the read-only lexical resources and the two
/// opportunistic caches (distsim classes and n-grams). Safe to share
/// across threads.
pub struct FeatureFactory {
    pub(crate) flags: FeatureFlags,
    pub(crate) resources: LexicalResources,
    pub(crate) distsim: DistSimResolver,
    pub(crate) ngram_cache: NGramCache,
    pub(crate) split_word: Option<Regex>,
}

impl FeatureFactory {
    /// Create a factory, loading every resource file the flags name
    pub fn new(flags: FeatureFlags) -> Result<Self> {
        let resources = LexicalResources::load(&flags)?;
        Self::with_resources(flags, resources)
    }

    /// Create a factory over resources the caller already loaded
    pub fn with_resources(flags: FeatureFlags, resources: LexicalResources) -> Result<Self> {
        Self::check_binned_lengths(flags.binned_lengths.as_deref())?;
        let split_word = Self::compile_split_word(flags.split_word_regex.as_deref())?;
        let distsim = DistSimResolver::new(resources.distsim.clone(), &flags);

        log::debug!(
            "Feature factory ready (gazetteer: {}, {})",
            resources.gazetteer.as_ref().map_or(0, |g| g.len()),
            distsim.describe()
        );

        Ok(Self {
            flags,
            resources,
            distsim,
            ngram_cache: NGramCache::new(),
            split_word,
        })
    }

    /// Reconfigure from `flags`, reloading resources and dropping every
    /// cache. Calling it again with the same flags leaves the factory in
    /// the same state.
    pub fn init(&mut self, flags: FeatureFlags) -> Result<()> {
        *self = Self::new(flags)?;
        log::info!("Feature factory initialized");
        Ok(())
    }

    fn compile_split_word(pattern: Option<&str>) -> Result<Option<Regex>> {
        match pattern {
            None | Some("") => Ok(None),
            Some(pattern) => Regex::new(pattern)
                .map(Some)
                .map_err(|source| FeatureError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                }),
        }
    }

    fn check_binned_lengths(bounds: Option<&[usize]>) -> Result<()> {
        let bounds = match bounds {
            Some(bounds) => bounds,
            None => return Ok(()),
        };
        let ascending = bounds.windows(2).all(|w| w[0] < w[1]);
        if !ascending || bounds.first() == Some(&0) {
            return Err(FeatureError::InvalidBinnedLengths {
                bounds: bounds.to_vec(),
            });
        }
        Ok(())
    }

    pub(crate) fn context(&self) -> FeatureContext<'_> {
        FeatureContext {
            flags: &self.flags,
            resources: &self.resources,
            distsim: &self.distsim,
            ngram_cache: self.flags.cache_n_grams.then_some(&self.ngram_cache),
            split_word: self.split_word.as_ref(),
        }
    }

    /// Every feature for `clique` centred at `position`
    pub fn generate_features(
        &self,
        seq: &PaddedSequence<'_>,
        position: usize,
        clique: Clique,
    ) -> Result<BTreeSet<String>> {
        let mut features = BTreeSet::new();
        features::generate(&self.context(), seq, position, clique, &mut features)?;
        Ok(features)
    }

    /// Like `generate_features`, with the clique given by name
    pub fn generate_features_named(
        &self,
        seq: &PaddedSequence<'_>,
        position: usize,
        clique: &str,
    ) -> Result<BTreeSet<String>> {
        let clique: Clique = clique.parse()?;
        self.generate_features(seq, position, clique)
    }

    /// Memoized distsim class for `token`
    pub fn resolve_distsim_class(&self, token: &Token) -> Option<Arc<str>> {
        self.distsim.resolve(token)
    }

    /// Drop memoized distsim classes and n-grams; loaded resources stay
    pub fn clear_caches(&self) {
        log::debug!(
            "Clearing caches ({} distsim, {} n-gram entries)",
            self.distsim.cache_len(),
            self.ngram_cache.len()
        );
        self.distsim.clear();
        self.ngram_cache.clear();
    }

    pub fn describe_lexicon(&self) -> LexiconDescription {
        self.distsim.describe()
    }

    // Accessor methods
    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn resources(&self) -> &LexicalResources {
        &self.resources
    }

    pub fn ngram_cache_len(&self) -> usize {
        self.ngram_cache.len()
    }

    pub fn distsim_cache_len(&self) -> usize {
        self.distsim.cache_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::DistSimLexicon;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_factory_is_send_sync() {
        assert_send_sync::<FeatureFactory>();
    }

    #[test]
    fn test_invalid_split_regex() {
        let flags = FeatureFlags {
            split_word_regex: Some("(".to_string()),
            ..Default::default()
        };
        let err = FeatureFactory::new(flags).err().unwrap();
        assert!(matches!(err, FeatureError::InvalidRegex { .. }));
    }

    #[test]
    fn test_binned_lengths_must_ascend() {
        for bounds in [vec![8, 4], vec![4, 4], vec![0, 3]] {
            let flags = FeatureFlags {
                binned_lengths: Some(bounds.clone()),
                ..Default::default()
            };
            match FeatureFactory::new(flags).err() {
                Some(FeatureError::InvalidBinnedLengths { bounds: got }) => assert_eq!(got, bounds),
                other => panic!("Expected InvalidBinnedLengths for {:?}, got {:?}", bounds, other),
            }
        }

        let flags = FeatureFlags {
            binned_lengths: Some(vec![4, 8]),
            ..Default::default()
        };
        assert!(FeatureFactory::new(flags).is_ok());
    }

    #[test]
    fn test_named_clique_and_unknown_name() {
        let factory = FeatureFactory::new(FeatureFlags {
            use_word: true,
            ..Default::default()
        })
        .unwrap();
        let tokens = vec![Token::new("John")];
        let seq = PaddedSequence::new(&tokens);

        let features = factory.generate_features_named(&seq, 0, "C").unwrap();
        assert!(features.contains("John-WORD|C"));

        let err = factory.generate_features_named(&seq, 0, "CpCpCpC").unwrap_err();
        assert!(matches!(err, FeatureError::UnknownClique(name) if name == "CpCpCpC"));
    }

    #[test]
    fn test_position_out_of_range() {
        let factory = FeatureFactory::new(FeatureFlags::default()).unwrap();
        let tokens = vec![Token::new("a"), Token::new("b")];
        let seq = PaddedSequence::new(&tokens);
        let err = factory.generate_features(&seq, 2, Clique::C).unwrap_err();
        assert!(matches!(err, FeatureError::PositionOutOfRange { position: 2, len: 2 }));
    }

    #[test]
    fn test_clear_caches_keeps_lexicon() {
        let mut lexicon = DistSimLexicon::new();
        lexicon.insert("paris", "C12");
        let flags = FeatureFlags {
            use_dist_sim: true,
            use_n_grams: true,
            cache_n_grams: true,
            ..Default::default()
        };
        let resources = LexicalResources::default().with_distsim(lexicon);
        let factory = FeatureFactory::with_resources(flags, resources).unwrap();

        let tokens = vec![Token::new("Paris")];
        let seq = PaddedSequence::new(&tokens);
        let before = factory.generate_features(&seq, 0, Clique::C).unwrap();
        assert!(factory.distsim_cache_len() > 0);
        assert_eq!(factory.ngram_cache_len(), 1);

        factory.clear_caches();
        assert_eq!(factory.distsim_cache_len(), 0);
        assert_eq!(factory.ngram_cache_len(), 0);

        let after = factory.generate_features(&seq, 0, Clique::C).unwrap();
        assert_eq!(before, after);
        assert!(after.contains("C12-DISTSIM|C"));
        match factory.describe_lexicon() {
            LexiconDescription::Loaded { entries, .. } => assert_eq!(entries, 1),
            other => panic!("Expected loaded lexicon, got {:?}", other),
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let flags = FeatureFlags {
            use_word: true,
            use_prev: true,
            ..Default::default()
        };
        let mut factory = FeatureFactory::new(FeatureFlags::default()).unwrap();
        factory.init(flags.clone()).unwrap();
        let tokens = vec![Token::new("New"), Token::new("York")];
        let seq = PaddedSequence::new(&tokens);
        let first = factory.generate_features(&seq, 1, Clique::C).unwrap();

        factory.init(flags.clone()).unwrap();
        let second = factory.generate_features(&seq, 1, Clique::C).unwrap();
        assert_eq!(first, second);
        assert_eq!(factory.flags(), &flags);
        assert_eq!(factory.describe_lexicon(), LexiconDescription::NotLoaded);
    }
}
