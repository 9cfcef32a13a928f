//! FROM clause AST types.

use serde::{Deserialize, Serialize};

use super::{Command, Criteria, GroupSymbol};

/// Planner hints attachable to any FROM item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FromHints {
    /// Preceded by `/* optional */`.
    pub optional: bool,
    /// Followed by `MAKEDEP`.
    pub make_dep: bool,
    /// Followed by `MAKENOTDEP`.
    pub make_not_dep: bool,
}

impl FromHints {
    /// Returns true if any hint is set.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.optional || self.make_dep || self.make_not_dep
    }
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Cross,
    LeftOuter,
    RightOuter,
    FullOuter,
    Union,
}

impl JoinType {
    /// Returns the canonical SQL for the join keyword(s).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::Union => "UNION JOIN",
        }
    }

    /// Returns true for the join types that take an `ON` clause.
    #[must_use]
    pub const fn requires_criteria(&self) -> bool {
        !matches!(self, Self::Cross | Self::Union)
    }
}

/// `group [AS alias]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaryFromClause {
    pub group: GroupSymbol,
    pub alias: Option<String>,
    pub hints: FromHints,
}

/// `left <join type> right [ON criteria]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left: Box<FromClause>,
    pub right: Box<FromClause>,
    pub join_type: JoinType,
    /// Conjuncts of the ON clause; empty for cross and union joins.
    pub criteria: Vec<Criteria>,
    pub hints: FromHints,
}

/// `(command) [AS] alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryFromClause {
    pub alias: String,
    pub command: Box<Command>,
    pub hints: FromHints,
}

/// An item of a FROM list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromClause {
    Unary(UnaryFromClause),
    Join(JoinPredicate),
    Subquery(SubqueryFromClause),
}

impl FromClause {
    /// Creates an unhinted group reference.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::Unary(UnaryFromClause {
            group: GroupSymbol::new(name),
            alias: None,
            hints: FromHints::default(),
        })
    }

    /// Creates an unhinted aliased group reference.
    #[must_use]
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Unary(UnaryFromClause {
            group: GroupSymbol::new(name),
            alias: Some(alias.into()),
            hints: FromHints::default(),
        })
    }

    /// Creates an unhinted join.
    #[must_use]
    pub fn join(self, join_type: JoinType, right: Self, criteria: Vec<Criteria>) -> Self {
        Self::Join(JoinPredicate {
            left: Box::new(self),
            right: Box::new(right),
            join_type,
            criteria,
            hints: FromHints::default(),
        })
    }

    /// Returns the item's hints.
    #[must_use]
    pub const fn hints(&self) -> &FromHints {
        match self {
            Self::Unary(unary) => &unary.hints,
            Self::Join(join) => &join.hints,
            Self::Subquery(subquery) => &subquery.hints,
        }
    }

    /// Returns the item's hints for modification.
    pub fn hints_mut(&mut self) -> &mut FromHints {
        match self {
            Self::Unary(unary) => &mut unary.hints,
            Self::Join(join) => &mut join.hints,
            Self::Subquery(subquery) => &mut subquery.hints,
        }
    }
}
