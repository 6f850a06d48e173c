//! Word-shape classifiers.

use std::collections::BTreeSet;

use crate::engine::config::WordShape;

/// Characters kept verbatim at each end by the `chris2` shaper
const CHRIS2_BOUNDARY: usize = 2;

/// Classify `word` with the given shaper; `None` when shaping is off
pub fn word_shape(word: &str, shaper: WordShape) -> Option<String> {
    match shaper {
        WordShape::None => None,
        WordShape::Dan1 => Some(dan1(word).to_string()),
        WordShape::Chris1 => Some(chris1(word)),
        WordShape::Chris2 => Some(chris2(word)),
        WordShape::Digits => Some(digits(word)),
    }
}

fn char_class(c: char) -> char {
    if c.is_uppercase() {
        'X'
    } else if c.is_lowercase() {
        'x'
    } else if c.is_ascii_digit() {
        'd'
    } else {
        c
    }
}

fn dan1(word: &str) -> &'static str {
    if word.is_empty() {
        return "EMPTY";
    }
    let mut digit = true;
    let mut upper = true;
    let mut lower = true;
    let mut mixed = true;
    for (i, c) in word.chars().enumerate() {
        if !c.is_ascii_digit() {
            digit = false;
        }
        if !c.is_lowercase() {
            lower = false;
        }
        if !c.is_uppercase() {
            upper = false;
        }
        if (i == 0 && !c.is_uppercase()) || (i > 0 && !c.is_lowercase()) {
            mixed = false;
        }
    }
    if digit {
        "ALL-DIGITS"
    } else if upper {
        "ALL-UPPER"
    } else if lower {
        "ALL-LOWER"
    } else if mixed {
        "MIXED-CASE"
    } else {
        "OTHER"
    }
}

/// Character classes with runs collapsed: `Hello-World` -> `Xx-Xx`
fn chris1(word: &str) -> String {
    let mut shape = String::with_capacity(word.len());
    let mut last = None;
    for c in word.chars().map(char_class) {
        if last != Some(c) {
            shape.push(c);
            last = Some(c);
        }
    }
    shape
}

/// Exact classes for the first and last two characters, the sorted set of
/// classes in between
fn chris2(word: &str) -> String {
    let classes: Vec<char> = word.chars().map(char_class).collect();
    if classes.len() <= CHRIS2_BOUNDARY * 2 {
        return classes.into_iter().collect();
    }

    let end_start = classes.len() - CHRIS2_BOUNDARY;
    let middle: BTreeSet<char> = classes[CHRIS2_BOUNDARY..end_start].iter().copied().collect();

    let mut shape = String::with_capacity(CHRIS2_BOUNDARY * 2 + middle.len());
    shape.extend(&classes[..CHRIS2_BOUNDARY]);
    shape.extend(middle);
    shape.extend(&classes[end_start..]);
    shape
}

/// Every ASCII digit becomes `9`, everything else is kept
pub fn digits(word: &str) -> String {
    word.chars()
        .map(|c| if c.is_ascii_digit() { '9' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_shaper() {
        assert_eq!(word_shape("Word", WordShape::None), None);
    }

    #[test]
    fn test_dan1() {
        assert_eq!(dan1("1999"), "ALL-DIGITS");
        assert_eq!(dan1("IBM"), "ALL-UPPER");
        assert_eq!(dan1("cat"), "ALL-LOWER");
        assert_eq!(dan1("Paris"), "MIXED-CASE");
        assert_eq!(dan1("iPhone"), "OTHER");
        assert_eq!(dan1(""), "EMPTY");
    }

    #[test]
    fn test_chris1() {
        assert_eq!(chris1("Hello-World"), "Xx-Xx");
        assert_eq!(chris1("1999"), "d");
        assert_eq!(chris1("iPhone"), "xXx");
    }

    #[test]
    fn test_chris2() {
        assert_eq!(chris2("Ab1"), "Xxd");
        assert_eq!(chris2("Abcd"), "Xxxx");
        assert_eq!(chris2("McDonald's"), "XxXx'x");
        assert_eq!(chris2("B-52s"), "X-ddx");
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits("A1-2003"), "A9-9999");
        assert_eq!(word_shape("42nd", WordShape::Digits).as_deref(), Some("99nd"));
    }
}
