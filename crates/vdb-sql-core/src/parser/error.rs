//! Parser error types.

use thiserror::Error;

use crate::lexer::{clip_fragment, LexError, Span};

/// A failed parse.
///
/// The rendered message always begins with `Parsing error: ` and ends with
/// ` (line L, column C)` when the position is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parsing error: {message}{}", position_suffix(.position))]
pub struct QueryParserError {
    /// The error message, without prefix or position.
    pub message: String,
    /// 1-based `(line, column)` of the offending token, when known.
    pub position: Option<(u32, u32)>,
}

fn position_suffix(position: &Option<(u32, u32)>) -> String {
    position.map_or_else(String::new, |(line, column)| {
        format!(" (line {line}, column {column})")
    })
}

impl QueryParserError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, position: Option<(u32, u32)>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Creates an error positioned at the start of `span`.
    #[must_use]
    pub fn at(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, Some(span.position()))
    }

    /// The error for empty, blank or absent input.
    #[must_use]
    pub fn empty_input() -> Self {
        Self::new("Query text is empty", None)
    }

    /// Creates an "unexpected token" error, echoing the (clipped) token text.
    #[must_use]
    pub fn unexpected(expected: &str, found: &str, span: Span) -> Self {
        Self::at(
            format!(
                "Encountered \"{}\"; was expecting {expected}",
                clip_fragment(found)
            ),
            span,
        )
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: &str, span: Span) -> Self {
        Self::at(
            format!("Unexpected end of input; was expecting {expected}"),
            span,
        )
    }
}

impl From<LexError> for QueryParserError {
    fn from(err: LexError) -> Self {
        Self::new(err.to_string(), Some(err.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_position() {
        let err = QueryParserError::new("Something broke", Some((3, 14)));
        assert_eq!(
            err.to_string(),
            "Parsing error: Something broke (line 3, column 14)"
        );
    }

    #[test]
    fn test_display_without_position() {
        assert_eq!(
            QueryParserError::empty_input().to_string(),
            "Parsing error: Query text is empty"
        );
    }

    #[test]
    fn test_unexpected_clips_fragment() {
        let found = "x".repeat(1000);
        let err = QueryParserError::unexpected("\")\"", &found, Span::new(0, 1000, 1, 1));
        assert!(err.message.len() < 120);
        assert!(err.message.contains("...\""));
    }

    #[test]
    fn test_from_lex_error() {
        let err: QueryParserError = LexError::UnterminatedString { line: 2, column: 5 }.into();
        assert_eq!(
            err.to_string(),
            "Parsing error: Unterminated string literal (line 2, column 5)"
        );
    }
}
