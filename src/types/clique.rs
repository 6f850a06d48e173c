use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// A fixed relative window of positions around the center token.
///
/// Each variant has a fixed offset list and a unique suffix that ends
/// every feature name generated under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Clique {
    C,
    CpC,
    Cp2C,
    Cp3C,
    Cp4C,
    Cp5C,
    CpCp2C,
    CpCp2Cp3C,
    CpCp2Cp3Cp4C,
    CpCp2Cp3Cp4Cp5C,
    CnC,
    CpCnC,
}

impl Clique {
    pub const ALL: [Clique; 12] = [
        Clique::C,
        Clique::CpC,
        Clique::Cp2C,
        Clique::Cp3C,
        Clique::Cp4C,
        Clique::Cp5C,
        Clique::CpCp2C,
        Clique::CpCp2Cp3C,
        Clique::CpCp2Cp3Cp4C,
        Clique::CpCp2Cp3Cp4Cp5C,
        Clique::CnC,
        Clique::CpCnC,
    ];

    /// Relative offsets this clique may reference, in ascending order
    pub fn offsets(self) -> &'static [isize] {
        match self {
            Clique::C => &[0],
            Clique::CpC => &[-1, 0],
            Clique::Cp2C => &[-2, 0],
            Clique::Cp3C => &[-3, 0],
            Clique::Cp4C => &[-4, 0],
            Clique::Cp5C => &[-5, 0],
            Clique::CpCp2C => &[-2, -1, 0],
            Clique::CpCp2Cp3C => &[-3, -2, -1, 0],
            Clique::CpCp2Cp3Cp4C => &[-4, -3, -2, -1, 0],
            Clique::CpCp2Cp3Cp4Cp5C => &[-5, -4, -3, -2, -1, 0],
            Clique::CnC => &[0, 1],
            Clique::CpCnC => &[-1, 0, 1],
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Clique::C => "C",
            Clique::CpC => "CpC",
            Clique::Cp2C => "Cp2C",
            Clique::Cp3C => "Cp3C",
            Clique::Cp4C => "Cp4C",
            Clique::Cp5C => "Cp5C",
            Clique::CpCp2C => "CpCp2C",
            Clique::CpCp2Cp3C => "CpCp2Cp3C",
            Clique::CpCp2Cp3Cp4C => "CpCp2Cp3Cp4C",
            Clique::CpCp2Cp3Cp4Cp5C => "CpCp2Cp3Cp4Cp5C",
            Clique::CnC => "CnC",
            Clique::CpCnC => "CpCnC",
        }
    }

    /// Maximum look-back distance
    pub fn max_left(self) -> usize {
        self.offsets().first().map(|o| o.unsigned_abs()).unwrap_or(0)
    }

    /// Parse a clique from its suffix, failing on anything unrecognised
    pub fn from_suffix(name: &str) -> Result<Self, FeatureError> {
        Clique::ALL
            .iter()
            .copied()
            .find(|c| c.suffix() == name)
            .ok_or_else(|| FeatureError::UnknownClique(name.to_string()))
    }
}

impl FromStr for Clique {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Clique::from_suffix(s.trim())
    }
}

impl fmt::Display for Clique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
