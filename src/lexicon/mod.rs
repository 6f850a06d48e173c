//! Lexical resources shared read-only by every feature call.
//!
//! This module contains:
//! - `gazetteer`: sloppy and clean gazette tables
//! - `distsim`: the distributional-similarity lexicon and class resolver
//! - `radical`: the character radical map

pub mod distsim;
pub mod gazetteer;
pub mod radical;

pub use distsim::{DistSimLexicon, DistSimResolver, KeyFolding, LexiconDescription};
pub use gazetteer::{GazetteInfo, Gazetteer};
pub use radical::RadicalMap;

use std::sync::Arc;

use crate::engine::config::FeatureFlags;
use crate::error::Result;

/// Every resource the flags ask for, loaded once
#[derive(Debug, Clone, Default)]
pub struct LexicalResources {
    pub gazetteer: Option<Arc<Gazetteer>>,
    pub distsim: Option<Arc<DistSimLexicon>>,
    pub radicals: Arc<RadicalMap>,
}

impl LexicalResources {
    /// Load the files named in `flags`.
    ///
    /// A resource whose flag is off is not loaded even if a path is set.
    pub fn load(flags: &FeatureFlags) -> Result<Self> {
        let mut resources = Self::default();

        if flags.use_gazettes && !flags.gazettes.is_empty() {
            let mut gazetteer = Gazetteer::new();
            for path in &flags.gazettes {
                gazetteer.load_file(path)?;
            }
            resources.gazetteer = Some(Arc::new(gazetteer));
        } else if flags.use_gazettes {
            log::warn!("useGazettes is set but no gazette files are configured");
        }

        if flags.use_dist_sim {
            if let Some(path) = &flags.dist_sim_lexicon {
                let folding = KeyFolding::from_flags(flags);
                let lexicon = DistSimLexicon::load(path, flags.dist_sim_file_format, folding)?;
                resources.distsim = Some(Arc::new(lexicon));
            }
        }

        if flags.use_radical {
            if let Some(path) = &flags.radical_map {
                resources.radicals = Arc::new(RadicalMap::load(path)?);
            }
        }

        Ok(resources)
    }

    pub fn with_gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = Some(Arc::new(gazetteer));
        self
    }

    pub fn with_distsim(mut self, lexicon: DistSimLexicon) -> Self {
        self.distsim = Some(Arc::new(lexicon));
        self
    }

    pub fn with_radicals(mut self, radicals: RadicalMap) -> Self {
        self.radicals = Arc::new(radicals);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_respects_flags() {
        let mut gaz = tempfile::NamedTempFile::new().unwrap();
        writeln!(gaz, "CITY Paris").unwrap();

        let mut flags = FeatureFlags {
            gazettes: vec![gaz.path().to_path_buf()],
            ..Default::default()
        };
        let resources = LexicalResources::load(&flags).unwrap();
        assert!(resources.gazetteer.is_none());

        flags.use_gazettes = true;
        let resources = LexicalResources::load(&flags).unwrap();
        assert_eq!(resources.gazetteer.map(|g| g.len()), Some(1));
        assert!(resources.distsim.is_none());
    }

    #[test]
    fn test_missing_lexicon_file_is_error() {
        let flags = FeatureFlags {
            use_dist_sim: true,
            dist_sim_lexicon: Some("/no/such/lexicon.txt".into()),
            ..Default::default()
        };
        assert!(LexicalResources::load(&flags).is_err());
    }

    #[test]
    fn test_load_survives_undecodable_lines_and_folds_digits() {
        let mut gaz = tempfile::NamedTempFile::new().unwrap();
        gaz.write_all(b"CITY Paris\nCITY \xff\nCITY Rome\n").unwrap();
        let mut lexicon = tempfile::NamedTempFile::new().unwrap();
        lexicon.write_all(b"1999\tC5\n\xfe\tC0\nParis\tC12\n").unwrap();

        let flags = FeatureFlags {
            use_gazettes: true,
            gazettes: vec![gaz.path().to_path_buf()],
            use_dist_sim: true,
            dist_sim_lexicon: Some(lexicon.path().to_path_buf()),
            number_equivalence_dist_sim: true,
            ..Default::default()
        };
        let resources = LexicalResources::load(&flags).unwrap();
        assert_eq!(resources.gazetteer.as_ref().map(|g| g.len()), Some(2));

        let distsim = resources.distsim.clone().unwrap();
        assert_eq!(distsim.len(), 2);
        let resolver = DistSimResolver::new(Some(distsim), &flags);
        let token = crate::data::token::Token::new("1984");
        assert_eq!(resolver.resolve(&token).as_deref(), Some("C5"));
    }
}
