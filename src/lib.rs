pub mod data;
pub mod engine;
pub mod error;
pub mod features;
pub mod lexicon;
pub mod types;

pub use data::{Document, DocumentParser, PaddedSequence, Token};
pub use engine::{FeatureFactory, FeatureFlags, TokenFeatures};
pub use error::{FeatureError, Result};
pub use features::FeatureCollector;
pub use lexicon::{LexicalResources, LexiconDescription};
pub use types::Clique;
