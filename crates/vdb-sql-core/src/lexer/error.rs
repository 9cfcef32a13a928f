//! Lexer error types.

use thiserror::Error;

/// Maximum number of characters of source text echoed in an error message.
pub const MAX_FRAGMENT_CHARS: usize = 64;

/// Truncates `text` to [`MAX_FRAGMENT_CHARS`] characters, appending `...`
/// when anything was cut.
#[must_use]
pub fn clip_fragment(text: &str) -> String {
    match text.char_indices().nth(MAX_FRAGMENT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// A malformed token.
///
/// Messages carry no position; `line` and `column` are 1-based and are
/// appended by [`crate::QueryParserError`] when the error surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated string literal")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Unterminated quoted identifier")]
    UnterminatedIdentifier { line: u32, column: u32 },

    #[error("Unterminated comment")]
    UnterminatedComment { line: u32, column: u32 },

    #[error("Invalid {kind} literal '{text}'")]
    InvalidLiteral {
        kind: &'static str,
        text: String,
        line: u32,
        column: u32,
    },

    #[error("Invalid numeric literal '{text}'")]
    InvalidNumber { text: String, line: u32, column: u32 },

    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, line: u32, column: u32 },
}

impl LexError {
    /// Returns the 1-based `(line, column)` of the offending character.
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        match self {
            Self::UnterminatedString { line, column }
            | Self::UnterminatedIdentifier { line, column }
            | Self::UnterminatedComment { line, column }
            | Self::InvalidLiteral { line, column, .. }
            | Self::InvalidNumber { line, column, .. }
            | Self::UnexpectedCharacter { line, column, .. } => (*line, *column),
        }
    }
}
