//! Featurization of whole sentences and documents

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::data::document::Document;
use crate::data::padded::PaddedSequence;
use crate::data::token::Token;
use crate::engine::core::FeatureFactory;
use crate::error::Result;
use crate::types::clique::Clique;

/// Features of one token, grouped by clique
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenFeatures {
    pub position: usize,
    pub word: String,
    pub features: BTreeMap<Clique, BTreeSet<String>>,
}

impl TokenFeatures {
    /// Total features across all cliques
    pub fn len(&self) -> usize {
        self.features.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FeatureFactory {
    /// Featurize every position of one sentence under each clique
    pub fn featurize_sentence(&self, tokens: &[Token], cliques: &[Clique]) -> Result<Vec<TokenFeatures>> {
        let seq = PaddedSequence::new(tokens);
        let mut result = Vec::with_capacity(tokens.len());

        for (position, token) in tokens.iter().enumerate() {
            let mut features = BTreeMap::new();
            for &clique in cliques {
                features.insert(clique, self.generate_features(&seq, position, clique)?);
            }
            result.push(TokenFeatures {
                position,
                word: token.word().to_string(),
                features,
            });
        }
        Ok(result)
    }

    /// Featurize every sentence of a document in parallel.
    ///
    /// Sentences come back in document order.
    pub fn featurize_document(&self, doc: &Document, cliques: &[Clique]) -> Result<Vec<Vec<TokenFeatures>>> {
        log::debug!(
            "Featurizing document {} ({} sentences, {} tokens, {} cliques)",
            doc.id,
            doc.sentences.len(),
            doc.num_tokens(),
            cliques.len()
        );
        doc.sentences
            .par_iter()
            .map(|sentence| self.featurize_sentence(&sentence.to_tokens(), cliques))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::DocumentParser;
    use crate::engine::config::FeatureFlags;

    fn factory() -> FeatureFactory {
        FeatureFactory::new(FeatureFlags {
            use_word: true,
            use_sequences: true,
            use_prev_sequences: true,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_featurize_sentence() {
        let tokens = vec![Token::new("John"), Token::new("ran")];
        let result = factory()
            .featurize_sentence(&tokens, &[Clique::C, Clique::CpC])
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].word, "ran");
        assert!(result[1].features[&Clique::C].contains("ran-WORD|C"));
        assert!(result[1].features[&Clique::CpC].contains("John-ran-PSEQW2|CpC"));
        assert!(!result[0].is_empty());
    }

    #[test]
    fn test_featurize_document_keeps_order() {
        let json = r#"{
            "id": "doc1",
            "metadata": [],
            "sentences": [
                {"numTokens": 2, "fields": [{"$type": "TokensField", "name": "word", "tokens": ["John", "ran"]}]},
                {"numTokens": 1, "fields": [{"$type": "TokensField", "name": "word", "tokens": ["Stop"]}]},
                {"numTokens": 3, "fields": [{"$type": "TokensField", "name": "word", "tokens": ["a", "b", "c"]}]}
            ]
        }"#;
        let docs = DocumentParser::new().parse_json(json).unwrap();
        let result = factory().featurize_document(&docs[0], &[Clique::C]).unwrap();

        let lens: Vec<usize> = result.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 1, 3]);
        assert_eq!(result[1][0].word, "Stop");
    }

    #[test]
    fn test_featurize_document_propagates_errors() {
        let json = r#"{"id": "d", "sentences": [
            {"numTokens": 1, "fields": [{"$type": "TokensField", "name": "word", "tokens": ["x"]}]}
        ]}"#;
        let docs = DocumentParser::new().parse_json(json).unwrap();
        let factory = FeatureFactory::new(FeatureFlags {
            use_domain_adaptation: true,
            ..Default::default()
        })
        .unwrap();
        assert!(factory.featurize_document(&docs[0], &[Clique::C]).is_err());
    }
}
