use serde::{Deserialize, Serialize};

use crate::data::token::Token;
use crate::engine::constants::*;

/// Represents a complete document with metadata and sentences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub metadata: Vec<String>,
    pub sentences: Vec<Sentence>,
}

/// Represents a single sentence with its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(rename = "numTokens")]
    pub num_tokens: u32,
    pub fields: Vec<Field>,
}

/// Represents a field in a sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Field {
    #[serde(rename = "ai.lum.odinson.TokensField", alias = "TokensField")]
    TokensField {
        name: String,
        tokens: Vec<String>,
    },
    #[serde(rename = "ai.lum.odinson.GraphField", alias = "GraphField")]
    GraphField {
        name: String,
        edges: Vec<(u32, u32, String)>, // (from, to, relation)
        #[serde(default)]
        roots: Vec<u32>,
    },
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::TokensField { name, .. } => name,
            Field::GraphField { name, .. } => name,
        }
    }
}

impl Document {
    /// Total number of tokens across all sentences
    pub fn num_tokens(&self) -> usize {
        self.sentences.iter().map(|s| s.num_tokens as usize).sum()
    }
}

impl Sentence {
    pub fn get_field(&self, field_name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == field_name)
    }

    pub fn get_tokens(&self, field_name: &str) -> Option<&[String]> {
        match self.get_field(field_name)? {
            Field::TokensField { tokens, .. } => Some(tokens),
            _ => None,
        }
    }

    /// Build annotated tokens from the sentence's fields.
    ///
    /// Known token fields fill the matching annotation, any other token
    /// field becomes a generic annotation, and the `dependencies` graph
    /// supplies each token's governor word.
    pub fn to_tokens(&self) -> Vec<Token> {
        let words = self
            .get_tokens(FIELD_WORD)
            .or_else(|| self.get_tokens(FIELD_RAW))
            .unwrap_or(&[]);
        let len = words.len().max(self.num_tokens as usize);

        let mut tokens: Vec<Token> = (0..len)
            .map(|i| {
                let mut token = Token::new(words.get(i).cloned().unwrap_or_default());
                token.position = Some(i);
                token
            })
            .collect();

        if words.len() != self.num_tokens as usize {
            log::warn!(
                "Sentence declares {} tokens but word field has {}",
                self.num_tokens,
                words.len()
            );
        }

        for field in &self.fields {
            match field {
                Field::TokensField { name, tokens: values } => {
                    for (token, value) in tokens.iter_mut().zip(values) {
                        assign_annotation(token, name, value);
                    }
                }
                Field::GraphField { name, edges, .. } if name == FIELD_DEPENDENCIES => {
                    for (from, to, _rel) in edges {
                        let (from, to) = (*from as usize, *to as usize);
                        if from >= len || to >= len {
                            log::warn!("Skipping dependency edge {}->{} outside sentence", from, to);
                            continue;
                        }
                        if tokens[to].governor.is_none() {
                            tokens[to].governor = Some(tokens[from].word.clone());
                        }
                    }
                }
                Field::GraphField { .. } => {}
            }
        }

        tokens
    }
}

fn assign_annotation(token: &mut Token, field: &str, value: &str) {
    let value = value.to_string();
    match field {
        FIELD_WORD | FIELD_RAW => {}
        FIELD_LEMMA => token.lemma = Some(value),
        FIELD_POS | FIELD_TAG => {
            if token.tag.is_none() || field == FIELD_TAG {
                token.tag = Some(value)
            }
        }
        FIELD_ENTITY => token.entity = Some(value),
        FIELD_CHUNK => token.chunk = Some(value),
        FIELD_SHAPE => token.shape = Some(value),
        FIELD_DOMAIN => token.domain = Some(value),
        FIELD_TOPIC => token.topic = Some(value),
        FIELD_ABBR => token.abbr = Some(value),
        FIELD_HEAD => token.head_word = Some(value),
        FIELD_UNKNOWN => token.unknown = Some(value),
        other => {
            token.generic.insert(other.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_field(name: &str, tokens: &[&str]) -> Field {
        Field::TokensField {
            name: name.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_sentence_to_tokens() {
        let sentence = Sentence {
            num_tokens: 3,
            fields: vec![
                tokens_field("word", &["John", "likes", "Paris"]),
                tokens_field("tag", &["NNP", "VBZ", "NNP"]),
                tokens_field("lemma", &["John", "like", "Paris"]),
                tokens_field("entity", &["PERSON", "O", "LOCATION"]),
                tokens_field("norm", &["john", "likes", "paris"]),
                Field::GraphField {
                    name: "dependencies".to_string(),
                    edges: vec![(1, 0, "nsubj".to_string()), (1, 2, "dobj".to_string())],
                    roots: vec![1],
                },
            ],
        };

        let tokens = sentence.to_tokens();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].word(), "John");
        assert_eq!(tokens[1].tag(), Some("VBZ"));
        assert_eq!(tokens[1].lemma(), Some("like"));
        assert_eq!(tokens[2].entity(), Some("LOCATION"));
        assert_eq!(tokens[2].position(), Some(2));
        assert_eq!(tokens[0].governor(), Some("likes"));
        assert_eq!(tokens[2].governor(), Some("likes"));
        assert_eq!(tokens[1].governor(), None);
        assert_eq!(tokens[0].generic.get("norm").map(String::as_str), Some("john"));
    }

    #[test]
    fn test_tag_field_wins_over_pos() {
        let sentence = Sentence {
            num_tokens: 1,
            fields: vec![
                tokens_field("tag", &["NNP"]),
                tokens_field("pos", &["PROPN"]),
                tokens_field("word", &["Ann"]),
            ],
        };
        assert_eq!(sentence.to_tokens()[0].tag(), Some("NNP"));
    }

    #[test]
    fn test_out_of_range_edges_skipped() {
        let sentence = Sentence {
            num_tokens: 1,
            fields: vec![
                tokens_field("word", &["Hi"]),
                Field::GraphField {
                    name: "dependencies".to_string(),
                    edges: vec![(4, 0, "dep".to_string())],
                    roots: vec![],
                },
            ],
        };
        assert_eq!(sentence.to_tokens()[0].governor(), None);
    }
}
