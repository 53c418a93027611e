//! Error types.
//!
//! Parsing a partially typed command has two kinds of failure: the buffer may
//! simply need more keys ([`ParseError::Incomplete`]), or it can never become
//! a valid command (every other variant). Callers keep the key buffer in the
//! first case and discard it in the second.

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Failure to parse or resolve the keys typed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The buffer ends before a required follow-up key. Not an error for the
    /// user: wait for the next key.
    #[error("incomplete command")]
    Incomplete,
    /// The numeric prefix could not be parsed.
    #[error("bad number")]
    InvalidNumber,
    /// A count was given where the grammar forbids one (e.g. before `$`).
    #[error("no count allowed")]
    NoNumberAllowed,
    /// Unknown motion or text object, or a motion that found no target.
    #[error("bad motion: {0}")]
    InvalidMotion(&'static str),
    /// Unknown operator or sub-key.
    #[error("bad command: {0}")]
    InvalidCommand(&'static str),
}

impl ParseError {
    /// True for the "wait for more keys" signal.
    #[inline]
    #[must_use]
    pub const fn is_incomplete(self) -> bool {
        matches!(self, Self::Incomplete)
    }
}

/// Errors surfaced by a session to its host.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("clipboard: {0}")]
    Clipboard(#[from] ClipboardError),
    #[error("search pattern: {0}")]
    SearchPattern(#[from] regex::Error),
    #[error("substitute: {0}")]
    Substitute(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_is_distinguished() {
        assert!(ParseError::Incomplete.is_incomplete());
        assert!(!ParseError::InvalidNumber.is_incomplete());
        assert!(!ParseError::InvalidMotion("x").is_incomplete());
    }

    #[test]
    fn messages() {
        assert_eq!(
            ParseError::InvalidMotion("no match").to_string(),
            "bad motion: no match"
        );
        let err: Error = ParseError::NoNumberAllowed.into();
        assert_eq!(err.to_string(), "no count allowed");
        let err: Error = ClipboardError::Unavailable.into();
        assert!(err.to_string().starts_with("clipboard: "));
    }
}
