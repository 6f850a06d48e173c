//! Pure word-level detectors: ordinals, URLs, titles and name casing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::padded::PaddedSequence;

const TENS: &str = "twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety";
const UNIT_ORDINALS: &str = "first|second|third|fourth|fifth|sixth|seventh|eighth|ninth";
const OTHER_ORDINALS: &str = "tenth|eleventh|twelfth|thirteenth|fourteenth|fifteenth|sixteenth|\
    seventeenth|eighteenth|nineteenth|twentieth|thirtieth|fortieth|fiftieth|sixtieth|\
    seventieth|eightieth|ninetieth|hundredth|thousandth|millionth|billionth";

static ORDINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?:(?:{TENS})-)?(?:{UNIT_ORDINALS})|{OTHER_ORDINALS}|\d+(?:st|nd|rd|th))$"
    ))
    .expect("ordinal pattern is valid")
});
static UNIT_ORDINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(?:{UNIT_ORDINALS})$")).expect("unit ordinal pattern is valid")
});
static TENS_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^(?:{TENS})$")).expect("tens pattern is valid"));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("number pattern is valid"));
static ORDINAL_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:st|nd|rd|th)$").expect("ordinal suffix pattern is valid"));

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:https?|ftp)://\S+|www\.\S+\.\S+|[a-z0-9][a-z0-9.-]*\.(?:com|org|net|edu|gov|io|info|biz)(?:/\S*)?)$",
    )
    .expect("url pattern is valid")
});

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Mr|Ms|Mrs|Dr|Miss|Sen|Judge|Sir)\.?$").expect("title pattern is valid")
});
static TITLE2: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:Mr|Mrs|Ms|Miss|Drs?|Profs?|Sens?|Reps?|Attys?|Lt|Col|Gen|Messrs|Govs?|Adm|Rev|Maj|Sgt|Cpl|Pvt|Capt|Ste?|Ave|Pres|Lieut|Hon|Brig|Co?mdr|Pfc|Spc|Supts?|Det|M|MM|Mme|Mmes|Mlle|Mlles)\.?$",
    )
    .expect("title2 pattern is valid")
});

/// True when the token at `index` is an ordinal on its own or together
/// with an adjacent token (`21 st`, `twenty - first`).
pub fn is_ordinal(seq: &PaddedSequence<'_>, index: isize) -> bool {
    if !seq.in_bounds(index) {
        return false;
    }
    let word = seq.get(index).word();
    let prev = seq.in_bounds(index - 1).then(|| seq.get(index - 1).word());
    let next = seq.in_bounds(index + 1).then(|| seq.get(index + 1).word());

    if ORDINAL.is_match(word) {
        return true;
    }
    if NUMBER.is_match(word) {
        return next.map_or(false, |n| ORDINAL_END.is_match(n));
    }
    if ORDINAL_END.is_match(word) {
        return prev.map_or(false, |p| NUMBER.is_match(p));
    }

    if word == "-" {
        return matches!((prev, next), (Some(p), Some(n)) if TENS_WORD.is_match(p) && UNIT_ORDINAL.is_match(n));
    }
    if TENS_WORD.is_match(word) && next == Some("-") {
        let after = seq.in_bounds(index + 2).then(|| seq.get(index + 2).word());
        return after.map_or(false, |a| UNIT_ORDINAL.is_match(a));
    }
    if UNIT_ORDINAL.is_match(word) && prev == Some("-") {
        let before = seq.in_bounds(index - 2).then(|| seq.get(index - 2).word());
        return before.map_or(false, |b| TENS_WORD.is_match(b));
    }
    false
}

pub fn is_url(word: &str) -> bool {
    URL.is_match(word)
}

/// Short courtesy titles (`Mr.`, `Dr`, `Judge`)
pub fn is_title(word: &str) -> bool {
    TITLE.is_match(word)
}

/// The extended, case-insensitive title list
pub fn is_title2(word: &str) -> bool {
    TITLE2.is_match(word)
}

/// At least two characters, an uppercase first letter and no other
/// uppercase letters
pub fn is_name_case(word: &str) -> bool {
    let mut chars = word.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if word.chars().count() < 2 || !first.is_uppercase() {
        return false;
    }
    chars.all(|c| !c.is_uppercase())
}
