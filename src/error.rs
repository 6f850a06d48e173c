//! Error types for feature generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running the feature factory
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Unknown clique: {0}")]
    UnknownClique(String),

    #[error("Position {position} out of range for sequence of length {len}")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Token at position {position} is missing required '{annotation}' annotation")]
    MissingAnnotation {
        annotation: &'static str,
        position: usize,
    },

    #[error("Invalid splitWordRegex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("binnedLengths must be positive and strictly ascending, got {bounds:?}")]
    InvalidBinnedLengths { bounds: Vec<usize> },

    #[error("Failed to read {kind} file {path}: {source}")]
    Resource {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FeatureError>;
