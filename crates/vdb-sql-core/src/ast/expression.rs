//! Expression AST types.

use serde::{Deserialize, Serialize};

use super::{Command, Criteria, Value};

/// Function names rendered as infix operators.
pub const INFIX_OPERATORS: [&str; 5] = ["+", "-", "*", "/", "||"];

/// A reference to a column or procedure variable, by dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementSymbol {
    /// Canonical unquoted dotted name, e.g. `pm1.g1.e1`.
    pub name: String,
    /// Set by the resolver for references bound outside the command; the
    /// parser always produces `false`.
    pub external: bool,
}

impl ElementSymbol {
    /// Creates a new element symbol.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external: false,
        }
    }
}

/// A scalar function call. Operators are functions named by their symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub args: Vec<Expression>,
}

impl Function {
    /// Returns true if the function renders as `(left op right)`.
    #[must_use]
    pub fn is_infix(&self) -> bool {
        self.args.len() == 2 && INFIX_OPERATORS.contains(&self.name.as_str())
    }
}

/// Aggregate function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}

/// An aggregate call; `arg` is `None` only for `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSymbol {
    pub function: AggregateFunction,
    pub distinct: bool,
    pub arg: Option<Box<Expression>>,
}

/// `CASE operand WHEN v THEN r ... [ELSE e] END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpression {
    pub operand: Box<Expression>,
    pub whens: Vec<Expression>,
    pub thens: Vec<Expression>,
    pub else_expr: Option<Box<Expression>>,
}

/// `CASE WHEN criteria THEN r ... [ELSE e] END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchedCaseExpression {
    pub whens: Vec<Criteria>,
    pub thens: Vec<Expression>,
    pub else_expr: Option<Box<Expression>>,
}

/// A named select-list entry for an expression that has no name of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSymbol {
    pub name: String,
    pub expression: Box<Expression>,
}

/// `symbol AS alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasSymbol {
    pub alias: String,
    pub symbol: Box<Expression>,
}

/// Scalar expressions and select-list symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Constant(Value),
    Element(ElementSymbol),
    Function(Function),
    Aggregate(AggregateSymbol),
    Case(CaseExpression),
    SearchedCase(SearchedCaseExpression),
    ExpressionSymbol(ExpressionSymbol),
    Alias(AliasSymbol),
    /// `*`
    All,
    /// `group.*`
    AllInGroup(String),
    /// The 0-based position of a `?` in the parsed text.
    Reference(usize),
    ScalarSubquery(Box<Command>),
}

impl Expression {
    /// Creates an element reference.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::Element(ElementSymbol::new(name))
    }

    /// Creates an integer constant.
    #[must_use]
    pub const fn integer(value: i32) -> Self {
        Self::Constant(Value::Integer(value))
    }

    /// Creates a string constant.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Constant(Value::String(value.into()))
    }

    /// Creates the `NULL` constant.
    #[must_use]
    pub const fn null() -> Self {
        Self::Constant(Value::Null)
    }

    /// Creates a function call.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(Function {
            name: name.into(),
            args,
        })
    }

    /// Creates a binary operator application, e.g. `binary("+", a, b)`.
    #[must_use]
    pub fn binary(op: &str, left: Self, right: Self) -> Self {
        Self::function(op, vec![left, right])
    }

    /// Creates an aggregate call.
    #[must_use]
    pub fn aggregate(function: AggregateFunction, distinct: bool, arg: Option<Self>) -> Self {
        Self::Aggregate(AggregateSymbol {
            function,
            distinct,
            arg: arg.map(Box::new),
        })
    }

    /// Wraps the expression in an alias.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Self::Alias(AliasSymbol {
            alias: alias.into(),
            symbol: Box::new(self),
        })
    }

    /// Wraps the expression in a generated select-list name.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        Self::ExpressionSymbol(ExpressionSymbol {
            name: name.into(),
            expression: Box::new(self),
        })
    }

    /// Returns true for symbols that stand in a select list without a
    /// generated name.
    #[must_use]
    pub const fn is_named_symbol(&self) -> bool {
        matches!(
            self,
            Self::Element(_)
                | Self::Aggregate(_)
                | Self::ExpressionSymbol(_)
                | Self::Alias(_)
                | Self::All
                | Self::AllInGroup(_)
        )
    }
}
