//! Engine module for clique-based feature generation
//!
//! This module is organized into the following submodules:
//! - `constants`: Field names, the boundary sentinel and fixed lexical tables
//! - `config`: Feature flag configuration (FeatureFlags) loaded from YAML
//! - `core`: Core FeatureFactory struct, constructor and per-clique entry points
//! - `batch`: Sentence and document featurization (parallel over sentences)

pub mod batch;
pub mod config;
pub mod constants;
pub mod core;

// Re-export main types for convenience
pub use batch::TokenFeatures;
pub use config::{DistSimFormat, FeatureFlags, SlashHyphenTreatment, WordShape};
pub use constants::*;
pub use core::FeatureFactory;
