use crate::data::token::Token;

/// Read-only view over a sentence that answers any offset.
///
/// Indices outside `[0, len)` return the boundary sentinel instead of
/// panicking, so generators can look left and right freely.
#[derive(Debug, Clone)]
pub struct PaddedSequence<'a> {
    tokens: &'a [Token],
    pad: Token,
}

impl<'a> PaddedSequence<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_pad(tokens, Token::boundary())
    }

    /// Use a custom sentinel token
    pub fn with_pad(tokens: &'a [Token], pad: Token) -> Self {
        Self { tokens, pad }
    }

    /// Token at `index`, or the sentinel when out of range
    pub fn get(&self, index: isize) -> &Token {
        if index < 0 {
            return &self.pad;
        }
        self.tokens.get(index as usize).unwrap_or(&self.pad)
    }

    /// Token at `position + offset`
    pub fn at(&self, position: usize, offset: isize) -> &Token {
        self.get(position as isize + offset)
    }

    /// True when `index` lies inside the underlying sentence
    pub fn in_bounds(&self, index: isize) -> bool {
        index >= 0 && (index as usize) < self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    pub fn pad(&self) -> &Token {
        &self.pad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_returns_pad() {
        let tokens = vec![Token::new("a"), Token::new("b")];
        let seq = PaddedSequence::new(&tokens);

        assert_eq!(seq.get(0).word(), "a");
        assert_eq!(seq.get(1).word(), "b");
        assert!(seq.get(-1).is_boundary());
        assert!(seq.get(2).is_boundary());
        assert!(seq.get(-100).is_boundary());
        assert_eq!(seq.at(1, -1).word(), "a");
        assert!(seq.at(0, -3).is_boundary());
    }

    #[test]
    fn test_bounds() {
        let tokens = vec![Token::new("a")];
        let seq = PaddedSequence::new(&tokens);
        assert!(seq.in_bounds(0));
        assert!(!seq.in_bounds(-1));
        assert!(!seq.in_bounds(1));
        assert_eq!(seq.len(), 1);
    }
}
