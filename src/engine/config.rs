//! Feature flag configuration

use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Word-shape classifier granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordShape {
    #[default]
    None,
    Dan1,
    Chris1,
    Chris2,
    Digits,
}

/// How words containing slashes or hyphens are split into fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlashHyphenTreatment {
    #[default]
    None,
    Ignore,
    Wfrag,
    Both,
}

/// Column order of the distsim lexicon file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistSimFormat {
    #[default]
    WordClass,
    ClassWord,
}

/// Flat, immutable set of feature toggles.
///
/// Keys follow the camelCase names used in flag files; unrecognised keys
/// are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureFlags {
    pub use_word: bool,
    pub use_tags: bool,
    pub use_prev: bool,
    pub use_next: bool,
    pub use_word_pairs: bool,
    pub use_lemmas: bool,
    pub use_prev_next_lemmas: bool,

    pub use_sequences: bool,
    pub use_prev_sequences: bool,
    pub use_next_sequences: bool,
    pub use_long_sequences: bool,
    pub use_boundary_sequences: bool,
    pub max_left: usize,

    pub use_n_grams: bool,
    pub max_n_gram_leng: i32,
    pub no_mid_n_grams: bool,
    pub lowercase_n_grams: bool,
    pub dehyphenate_n_grams: bool,
    pub greekify_n_grams: bool,
    pub conjoin_shape_n_grams: bool,
    pub cache_n_grams: bool,

    pub use_disjunctive: bool,
    pub disjunction_width: usize,
    pub use_disjunctive_shape_interaction: bool,
    pub use_wide_disjunctive: bool,
    pub wide_disjunction_width: usize,
    pub use_either_side_disjunctive: bool,
    pub use_disj_shape: bool,

    pub use_paren_matching: bool,
    pub use_ordinal: bool,
    #[serde(rename = "useIsURL")]
    pub use_is_url: bool,
    pub use_title: bool,
    pub use_title2: bool,
    pub use_abbr: bool,
    pub use_minimal_abbr: bool,
    pub use_minimal_abbr1: bool,
    pub use_radical: bool,
    pub radical_map: Option<PathBuf>,

    pub use_gazettes: bool,
    pub sloppy_gazette: bool,
    pub clean_gazette: bool,
    pub gazettes: Vec<PathBuf>,

    pub use_dist_sim: bool,
    pub dist_sim_lexicon: Option<PathBuf>,
    pub dist_sim_file_format: DistSimFormat,
    pub cased_dist_sim: bool,
    pub number_equivalence_dist_sim: bool,
    pub unknown_word_dist_sim_class: Option<String>,

    pub use_shape_strings: bool,
    pub word_shape: WordShape,
    pub use_shape_conjunctions: bool,
    pub use_type_seqs: bool,
    pub use_type_seqs2: bool,

    pub use_taggy_sequences: bool,
    pub use_taggy_sequences_shape_interaction: bool,
    pub dont_extend_taggy: bool,
    pub use_sym_tags: bool,
    pub use_sym_word_pairs: bool,

    pub use_chunks: bool,
    pub use_topics: bool,
    #[serde(rename = "useNPHead")]
    pub use_np_head: bool,
    #[serde(rename = "useNPGovernor")]
    pub use_np_governor: bool,
    pub use_generic_features: bool,

    pub use_class_feature: bool,
    pub use_first_word: bool,
    pub use_begin_sent: bool,
    pub use_position: bool,
    pub split_word_regex: Option<String>,
    pub slash_hyphen_treatment: SlashHyphenTreatment,
    pub binned_lengths: Option<Vec<usize>>,
    #[serde(rename = "useVB")]
    pub use_vb: bool,
    #[serde(rename = "usePrevVB")]
    pub use_prev_vb: bool,
    #[serde(rename = "useNextVB")]
    pub use_next_vb: bool,
    pub use_unknown: bool,

    pub use_domain_tag: bool,
    pub use_domain_adaptation: bool,

    pub intern: bool,
    pub intern2: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            use_word: false,
            use_tags: false,
            use_prev: false,
            use_next: false,
            use_word_pairs: false,
            use_lemmas: false,
            use_prev_next_lemmas: false,
            use_sequences: false,
            use_prev_sequences: false,
            use_next_sequences: false,
            use_long_sequences: false,
            use_boundary_sequences: false,
            max_left: 2,
            use_n_grams: false,
            max_n_gram_leng: -1,
            no_mid_n_grams: false,
            lowercase_n_grams: false,
            dehyphenate_n_grams: false,
            greekify_n_grams: false,
            conjoin_shape_n_grams: false,
            cache_n_grams: false,
            use_disjunctive: false,
            disjunction_width: 4,
            use_disjunctive_shape_interaction: false,
            use_wide_disjunctive: false,
            wide_disjunction_width: 10,
            use_either_side_disjunctive: false,
            use_disj_shape: false,
            use_paren_matching: false,
            use_ordinal: false,
            use_is_url: false,
            use_title: false,
            use_title2: false,
            use_abbr: false,
            use_minimal_abbr: false,
            use_minimal_abbr1: false,
            use_radical: false,
            radical_map: None,
            use_gazettes: false,
            sloppy_gazette: false,
            clean_gazette: false,
            gazettes: Vec::new(),
            use_dist_sim: false,
            dist_sim_lexicon: None,
            dist_sim_file_format: DistSimFormat::WordClass,
            cased_dist_sim: false,
            number_equivalence_dist_sim: false,
            unknown_word_dist_sim_class: None,
            use_shape_strings: false,
            word_shape: WordShape::None,
            use_shape_conjunctions: false,
            use_type_seqs: false,
            use_type_seqs2: false,
            use_taggy_sequences: false,
            use_taggy_sequences_shape_interaction: false,
            dont_extend_taggy: false,
            use_sym_tags: false,
            use_sym_word_pairs: false,
            use_chunks: false,
            use_topics: false,
            use_np_head: false,
            use_np_governor: false,
            use_generic_features: false,
            use_class_feature: false,
            use_first_word: false,
            use_begin_sent: false,
            use_position: false,
            split_word_regex: None,
            slash_hyphen_treatment: SlashHyphenTreatment::None,
            binned_lengths: None,
            use_vb: false,
            use_prev_vb: false,
            use_next_vb: false,
            use_unknown: false,
            use_domain_tag: false,
            use_domain_adaptation: false,
            intern: false,
            intern2: false,
        }
    }
}

impl FeatureFlags {
    /// Load flags from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("Flag file not found: {}", path.display()));
        }

        let yaml_str = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read flag file {}: {}", path.display(), e))?;

        Self::from_yaml_str(&yaml_str)
            .map_err(|e| anyhow!("Invalid flag file {}: {}", path.display(), e))
    }

    /// Parse flags from YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let flags: Self = serde_yaml::from_str(yaml)?;
        Ok(flags)
    }

    /// True when any shape-based family can fire
    pub fn shapes_enabled(&self) -> bool {
        self.use_shape_strings || self.word_shape != WordShape::None
    }

    /// N-gram length cap, `None` when unbounded
    pub fn n_gram_limit(&self) -> Option<usize> {
        usize::try_from(self.max_n_gram_leng).ok()
    }
}
