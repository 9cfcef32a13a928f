//! Abstract Syntax Tree (AST) types for commands, criteria, expressions and
//! procedure statements.
//!
//! Nodes are plain data with structural equality. Every type serializes with
//! serde so hosts can persist or ship trees.

mod command;
mod criteria;
mod expression;
mod from;
mod procedure;
mod types;
pub mod visit;

pub use command::{
    Command, CommandType, Create, CreateUpdateProcedureCommand, Delete, Drop, DynamicCommand,
    GroupSymbol, Insert, InsertSource, Limit, OrderBy, OrderByItem, ParameterDirection, Query,
    QueryOption, Select, SetClause, SetOperation, SetQuery, SpParameter, StoredProcedure, Update,
    UpdateCount, XQuery,
};
pub use criteria::{
    BetweenCriteria, CompareCriteria, CompareOperator, CompoundCriteria, Criteria,
    CriteriaSelector, HasCriteria, IsNullCriteria, LogicalOperator, MatchCriteria, Quantifier,
    SelectorType, SetCriteria, SubqueryCompareCriteria, SubquerySetCriteria, TranslateCriteria,
};
pub use expression::{
    AggregateFunction, AggregateSymbol, AliasSymbol, CaseExpression, ElementSymbol, Expression,
    ExpressionSymbol, Function, SearchedCaseExpression, INFIX_OPERATORS,
};
pub use from::{FromClause, FromHints, JoinPredicate, JoinType, SubqueryFromClause, UnaryFromClause};
pub use procedure::{
    AssignmentStatement, AssignmentValue, Block, DeclareStatement, IfStatement, LoopStatement,
    Statement, WhileStatement,
};
pub use types::{ColumnDefinition, DataType, Value};
