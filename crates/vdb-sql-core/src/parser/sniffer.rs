//! Lightweight command classification without a full parse.

use tracing::trace;

use crate::ast::CommandType;
use crate::lexer::{tokenize, Keyword, TokenKind};

/// Returns true for text handled as an opaque XQuery: its first non-blank
/// character is `<`, or its first word is `declare` or `xquery`.
pub(crate) fn is_xquery(text: &str) -> bool {
    let text = text.trim_start();
    if text.starts_with('<') {
        return true;
    }
    let word_end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    let word = &text[..word_end];
    word.eq_ignore_ascii_case("declare") || word.eq_ignore_ascii_case("xquery")
}

/// Classifies `text` by its leading tokens.
///
/// Never fails: absent, blank, unlexable or unrecognized input is
/// [`CommandType::Unknown`]. Whenever the full parser accepts `text`, the
/// result equals the parsed command's [`command_type`].
///
/// [`command_type`]: crate::ast::Command::command_type
#[must_use]
pub fn get_command_type<'a>(text: impl Into<Option<&'a str>>) -> CommandType {
    let Some(text) = text.into().filter(|t| !t.trim().is_empty()) else {
        return CommandType::Unknown;
    };

    if is_xquery(text) {
        trace!("classified as XQuery");
        return CommandType::XQuery;
    }

    let tokens = match tokenize(text) {
        Ok(tokens) => tokens,
        Err(err) => {
            trace!(error = %err, "lexing failed, command type unknown");
            return CommandType::Unknown;
        }
    };

    let start = tokens
        .iter()
        .position(|t| t.kind != TokenKind::LeftParen)
        .unwrap_or(0);
    let first = tokens.get(start).and_then(|t| t.as_keyword());
    let second = tokens.get(start + 1).and_then(|t| t.as_keyword());

    let command_type = if start > 0 {
        // Only a query may start with parentheses
        match first {
            Some(Keyword::Select) => CommandType::Query,
            _ => CommandType::Unknown,
        }
    } else if tokens.first().map(|t| &t.kind) == Some(&TokenKind::LeftBrace) {
        CommandType::StoredProcedure
    } else {
        match (first, second) {
            (Some(Keyword::Select), _) => CommandType::Query,
            (Some(Keyword::Insert), _) => CommandType::Insert,
            (Some(Keyword::Update), _) => CommandType::Update,
            (Some(Keyword::Delete), _) => CommandType::Delete,
            (Some(Keyword::Exec | Keyword::Execute), Some(Keyword::String)) => CommandType::Dynamic,
            (Some(Keyword::Exec | Keyword::Execute), _) => CommandType::StoredProcedure,
            (Some(Keyword::Create), Some(Keyword::Local)) => CommandType::Create,
            (Some(Keyword::Create), Some(Keyword::Virtual | Keyword::Procedure)) => {
                CommandType::UpdateProcedure
            }
            (Some(Keyword::Drop), _) => CommandType::Drop,
            _ => CommandType::Unknown,
        }
    };

    trace!(%command_type, "classified command");
    command_type
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_blank() {
        assert_eq!(get_command_type(None), CommandType::Unknown);
        assert_eq!(get_command_type(""), CommandType::Unknown);
        assert_eq!(get_command_type("  \n\t"), CommandType::Unknown);
    }

    #[test]
    fn test_basic_types() {
        assert_eq!(get_command_type("select * from g"), CommandType::Query);
        assert_eq!(get_command_type("((SELECT 1))"), CommandType::Query);
        assert_eq!(get_command_type("INSERT INTO g VALUES (1)"), CommandType::Insert);
        assert_eq!(get_command_type("UPDATE g SET a = 1"), CommandType::Update);
        assert_eq!(get_command_type("DELETE FROM g"), CommandType::Delete);
        assert_eq!(get_command_type("exec p()"), CommandType::StoredProcedure);
        assert_eq!(get_command_type("{call p}"), CommandType::StoredProcedure);
        assert_eq!(get_command_type("EXECUTE STRING 'x'"), CommandType::Dynamic);
        assert_eq!(
            get_command_type("CREATE LOCAL TEMPORARY TABLE #t (a string)"),
            CommandType::Create
        );
        assert_eq!(
            get_command_type("CREATE VIRTUAL PROCEDURE BEGIN END"),
            CommandType::UpdateProcedure
        );
        assert_eq!(get_command_type("DROP TABLE #t"), CommandType::Drop);
        assert_eq!(get_command_type("<a/>"), CommandType::XQuery);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(get_command_type("(INSERT INTO g VALUES (1))"), CommandType::Unknown);
        assert_eq!(get_command_type("WITH x AS y"), CommandType::Unknown);
        assert_eq!(get_command_type("'unterminated"), CommandType::Unknown);
        assert_eq!(get_command_type("(((("), CommandType::Unknown);
    }

    #[test]
    fn test_is_xquery() {
        assert!(is_xquery("  <doc/>"));
        assert!(is_xquery("DECLARE namespace x = 'y'; <a/>"));
        assert!(is_xquery("xquery version '1.0'; <a/>"));
        assert!(!is_xquery("declared"));
        assert!(!is_xquery("SELECT '<a/>'"));
    }
}
