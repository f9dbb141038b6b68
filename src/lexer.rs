//! Lexical analysis: splitting a line into space-delimited tokens.
//!
//! There is no quoting, escaping or expansion. A token is any maximal run of
//! characters other than the space character; tabs are ordinary characters.

use crate::config::MAX_TOKENS;
use crate::error::{CapacityError, TokenizeError};
use crate::expression::BoundedVec;

/// A token borrowed from the input line. Never contains a space.
pub type Token<'a> = &'a str;

/// The tokens of one line, in left-to-right order, bounded in number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenArray<'a> {
    tokens: BoundedVec<Token<'a>>,
}

impl<'a> TokenArray<'a> {
    /// Creates an empty array that holds at most `max_tokens` tokens.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            tokens: BoundedVec::new("tokens", max_tokens),
        }
    }

    pub fn push(&mut self, token: Token<'a>) -> Result<(), CapacityError> {
        self.tokens.push(token)
    }

    pub fn as_slice(&self) -> &[Token<'a>] {
        self.tokens.as_slice()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenArray<'_> {
    fn default() -> Self {
        Self::new(MAX_TOKENS)
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Splits `line` on spaces, dropping the empty pieces between consecutive
/// spaces. Fails with [`TokenizeError::Overflow`] when the line holds more
/// than `max_tokens` tokens; no partial result is returned in that case.
pub fn split_into_tokens(line: &str, max_tokens: usize) -> Result<TokenArray<'_>, TokenizeError> {
    let mut tokens = TokenArray::new(max_tokens);
    for token in line.split(' ').filter(|t| !t.is_empty()) {
        tokens
            .push(token)
            .map_err(|_| TokenizeError::Overflow { limit: max_tokens })?;
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pipeline_into_tokens() {
        let tokens = split_into_tokens("ls -la | wc -l", MAX_TOKENS).unwrap();
        assert_eq!(tokens.as_slice(), &["ls", "-la", "|", "wc", "-l"]);
    }

    #[test]
    fn consecutive_spaces_do_not_produce_empty_tokens() {
        let tokens = split_into_tokens("  echo   hello  ", MAX_TOKENS).unwrap();
        assert_eq!(tokens.as_slice(), &["echo", "hello"]);
    }

    #[test]
    fn tabs_are_not_delimiters() {
        let tokens = split_into_tokens("a\tb c", MAX_TOKENS).unwrap();
        assert_eq!(tokens.as_slice(), &["a\tb", "c"]);
    }

    #[test]
    fn pipe_needs_surrounding_spaces_to_be_its_own_token() {
        let tokens = split_into_tokens("ls|wc", MAX_TOKENS).unwrap();
        assert_eq!(tokens.as_slice(), &["ls|wc"]);
    }

    #[test]
    fn empty_and_blank_lines_give_no_tokens() {
        assert!(split_into_tokens("", MAX_TOKENS).unwrap().is_empty());
        assert!(split_into_tokens("    ", MAX_TOKENS).unwrap().is_empty());
    }

    #[test]
    fn exactly_the_limit_is_accepted() {
        let tokens = split_into_tokens("a b c", 3).unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn one_token_over_the_limit_overflows() {
        let err = split_into_tokens("a b c d", 3).unwrap_err();
        assert_eq!(err, TokenizeError::Overflow { limit: 3 });
    }
}
