//! Field names and fixed marker strings shared across the codebase

/// Word of the sentinel token returned outside the sentence
pub const BOUNDARY: &str = "*BOUNDARY*";

pub const FIELD_WORD: &str = "word";
pub const FIELD_RAW: &str = "raw";
pub const FIELD_LEMMA: &str = "lemma";
pub const FIELD_POS: &str = "pos";
pub const FIELD_TAG: &str = "tag";
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_CHUNK: &str = "chunk";
pub const FIELD_SHAPE: &str = "shape";
pub const FIELD_DOMAIN: &str = "domain";
pub const FIELD_TOPIC: &str = "topic";
pub const FIELD_ABBR: &str = "abbr";
pub const FIELD_HEAD: &str = "head";
pub const FIELD_UNKNOWN: &str = "unknown";
pub const FIELD_DEPENDENCIES: &str = "dependencies";

/// Abbreviation class that `useMinimalAbbr1` skips
pub const NO_ABBR: &str = "XX";

/// Bracket pairs recognised by parenthesis matching, as (open, close)
pub const BRACKET_PAIRS: [(&str, &str); 6] = [
    ("(", ")"),
    ("[", "]"),
    ("{", "}"),
    ("-LRB-", "-RRB-"),
    ("-LSB-", "-RSB-"),
    ("-LCB-", "-RCB-"),
];

/// Greek letter names replaced by `greekify`
pub const GREEK_LETTERS: [&str; 13] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "kappa", "lambda", "rho", "sigma",
    "tau", "upsilon", "omega",
];
