//! Feature generation.
//!
//! This module contains:
//! - `collector`: the feature-name builder bound to an output set
//! - `shape`, `ngrams`, `patterns`: pure word-level helpers
//! - `local`: single-position generators for the `C` clique
//! - `relational`: generators spanning two or more positions
//!
//! `generate` is the dispatcher: it validates the call, configures one
//! collector for the clique and fans out to the generators the clique
//! permits.

pub mod collector;
pub mod local;
pub mod ngrams;
pub mod patterns;
pub mod relational;
pub mod shape;


pub use collector::FeatureCollector;
pub use ngrams::{dehyphenate, greekify, NGramCache};
pub use patterns::{is_name_case, is_ordinal};

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;

use crate::data::padded::PaddedSequence;
use crate::data::token::Token;
use crate::engine::config::FeatureFlags;
use crate::error::{FeatureError, Result};
use crate::lexicon::{DistSimResolver, LexicalResources};
use crate::types::clique::Clique;

/// Everything a generator may read besides the sequence itself
#[derive(Clone, Copy)]
pub struct FeatureContext<'a> {
    pub flags: &'a FeatureFlags,
    pub resources: &'a LexicalResources,
    pub distsim: &'a DistSimResolver,
    pub ngram_cache: Option<&'a NGramCache>,
    pub split_word: Option<&'a Regex>,
}

impl<'a> FeatureContext<'a> {
    /// Resolved shape: the token's annotation, else the configured
    /// classifier. `None` when shapes are off or nothing resolves.
    pub fn shape<'t>(&self, token: &'t Token) -> Option<Cow<'t, str>> {
        if !self.flags.shapes_enabled() {
            return None;
        }
        match token.shape() {
            Some(shape) => Some(Cow::Borrowed(shape)),
            None => shape::word_shape(token.word(), self.flags.word_shape).map(Cow::Owned),
        }
    }

    /// Distsim class, only when `useDistSim` is on
    pub fn distsim_class(&self, token: &Token) -> Option<Arc<str>> {
        if !self.flags.use_dist_sim {
            return None;
        }
        self.distsim.resolve(token)
    }

    pub fn ngrams(&self, word: &str) -> Arc<Vec<String>> {
        match self.ngram_cache {
            Some(cache) => cache.get_or_compute(word, self.flags),
            None => Arc::new(ngrams::word_ngrams(word, self.flags)),
        }
    }
}

/// Generate every feature for `clique` centred at `position` into `out`.
///
/// Fails when `position` is outside the sequence, or when domain
/// adaptation is on and the center token has no domain.
pub fn generate(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    clique: Clique,
    out: &mut BTreeSet<String>,
) -> Result<()> {
    if position >= seq.len() {
        return Err(FeatureError::PositionOutOfRange {
            position,
            len: seq.len(),
        });
    }

    let mut collector = FeatureCollector::new(out, clique.suffix());
    if ctx.flags.use_domain_adaptation {
        let domain = seq
            .at(position, 0)
            .domain()
            .ok_or(FeatureError::MissingAnnotation {
                annotation: "domain",
                position,
            })?;
        collector.set_domain(Some(domain));
    }

    match clique {
        Clique::C => {
            local::clique_c(ctx, seq, position, &mut collector);
            relational::head_conjunctions(ctx, seq, position, &mut collector);
        }
        Clique::CpC => relational::clique_cpc(ctx, seq, position, &mut collector),
        Clique::Cp2C | Clique::Cp3C | Clique::Cp4C | Clique::Cp5C => {
            relational::clique_skip(ctx, seq, position, clique.max_left(), &mut collector)
        }
        Clique::CpCp2C | Clique::CpCp2Cp3C | Clique::CpCp2Cp3Cp4C | Clique::CpCp2Cp3Cp4Cp5C => {
            relational::clique_chain(ctx, seq, position, clique.max_left(), &mut collector)
        }
        Clique::CnC => relational::clique_cnc(ctx, seq, position, &mut collector),
        Clique::CpCnC => relational::clique_cpcnc(ctx, seq, position, &mut collector),
    }
    Ok(())
}
