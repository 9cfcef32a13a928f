//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default bound on grammar nesting (parentheses, subqueries, blocks).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Depth charged for each nested query expression or procedure statement.
/// A parenthesis, function call, unary operator or `NOT` costs two.
///
/// A query or statement level recurses through many more stack frames than
/// an expression level, so it uses up `max_depth` faster.
pub const COMMAND_DEPTH_COST: usize = 8;

/// Options a host passes to every parse.
///
/// Deserializes from partial documents; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseInfo {
    /// Accept double-quoted names for declared, assigned and cursor variables.
    pub allow_double_quoted_variable: bool,
    /// Maximum nesting depth before the parse fails, in the units described
    /// at [`COMMAND_DEPTH_COST`].
    pub max_depth: usize,
}

impl Default for ParseInfo {
    fn default() -> Self {
        Self {
            allow_double_quoted_variable: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_allow_double_quoted_variable(mut self, allow: bool) -> Self {
        self.allow_double_quoted_variable = allow;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
