//! Canonical SQL rendering via `fmt::Display` for AST nodes.
//!
//! Every AST type renders deterministic SQL text: keywords uppercase,
//! binary operators fully parenthesized and identifiers quoted only where
//! the lexer requires it. Parsing the rendered text yields an equal tree.

mod command;
mod criteria;
mod expression;
mod from;
mod procedure;

use core::fmt;

use crate::ast::{
    Block, Command, Criteria, CriteriaSelector, Expression, FromClause, GroupSymbol, QueryOption,
    Statement,
};
use crate::lexer::Keyword;

/// A node that renders to canonical SQL.
pub trait AstNode: fmt::Display {}

impl AstNode for Command {}
impl AstNode for Criteria {}
impl AstNode for Expression {}
impl AstNode for Statement {}
impl AstNode for Block {}
impl AstNode for CriteriaSelector {}
impl AstNode for FromClause {}
impl AstNode for QueryOption {}
impl AstNode for GroupSymbol {}

/// Renders any AST node to its canonical SQL text.
#[must_use]
pub fn to_canonical_string(node: &dyn AstNode) -> String {
    node.to_string()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Returns true if the name segment must be double-quoted to lex back as
/// the same identifier.
pub(crate) fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_alphabetic() || first == '_' || first == '#') {
        return true;
    }
    if chars.any(|c| !(c.is_alphanumeric() || c == '_')) {
        return true;
    }
    Keyword::is_reserved(name)
}

pub(crate) fn write_ident(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if needs_quoting(name) {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    } else {
        f.write_str(name)
    }
}

/// Writes a dotted name, quoting each segment independently.
pub(crate) fn write_dotted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write_ident(f, segment)?;
    }
    Ok(())
}

pub(crate) fn write_dotted_list(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_dotted(f, name)?;
    }
    Ok(())
}

pub(crate) fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    write!(f, "'{}'", value.replace('\'', "''"))
}

impl fmt::Display for GroupSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.name)
    }
}
