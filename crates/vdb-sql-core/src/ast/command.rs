//! Command AST types.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Block, ColumnDefinition, Criteria, ElementSymbol, Expression, FromClause};

/// A (possibly dotted) group name, stored unquoted, e.g. `pm1.g1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupSymbol {
    pub name: String,
}

impl GroupSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `SELECT [DISTINCT] symbols`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub distinct: bool,
    pub symbols: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expression: Expression,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub items: Vec<OrderByItem>,
}

/// `LIMIT [offset,] row_limit`; each position is an integer constant or a
/// `?` reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub offset: Option<Expression>,
    pub row_limit: Expression,
}

/// The `OPTION` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOption {
    pub show_plan: bool,
    pub plan_only: bool,
    pub debug: bool,
    pub no_cache: bool,
    pub no_cache_groups: Vec<String>,
    pub make_dep_groups: Vec<String>,
    pub make_not_dep_groups: Vec<String>,
}

impl QueryOption {
    /// Returns true if no flag or list is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `SELECT ... [INTO g] [FROM ...] [WHERE ...] [GROUP BY ...] [HAVING ...]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub select: Select,
    pub into: Option<GroupSymbol>,
    /// Comma-separated FROM items; empty when there is no FROM clause.
    pub from: Vec<FromClause>,
    pub criteria: Option<Criteria>,
    /// Empty when there is no GROUP BY clause.
    pub group_by: Vec<Expression>,
    pub having: Option<Criteria>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<Limit>,
    pub option: Option<QueryOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOperation {
    Union,
    Intersect,
    Except,
}

impl SetOperation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// `left UNION|INTERSECT|EXCEPT [ALL] right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetQuery {
    pub operation: SetOperation,
    pub all: bool,
    pub left: Box<Command>,
    pub right: Box<Command>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<Limit>,
    pub option: Option<QueryOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Vec<Expression>),
    Query(Box<Command>),
}

/// `INSERT INTO g [(e1, ...)] VALUES (...) | query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub group: GroupSymbol,
    pub variables: Vec<ElementSymbol>,
    pub source: InsertSource,
    pub option: Option<QueryOption>,
}

/// `element = value`, as in UPDATE SET and EXECUTE ... USING.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetClause {
    pub symbol: ElementSymbol,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub group: GroupSymbol,
    pub changes: Vec<SetClause>,
    pub criteria: Option<Criteria>,
    pub option: Option<QueryOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub group: GroupSymbol,
    pub criteria: Option<Criteria>,
    pub option: Option<QueryOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
    Return,
}

/// A stored procedure argument; `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpParameter {
    pub index: usize,
    pub name: Option<String>,
    /// `None` for the return parameter of `{? = call ...}`.
    pub value: Option<Expression>,
    pub direction: ParameterDirection,
}

/// `EXEC name(args)` or `{[? =] call name(args)}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProcedure {
    pub name: String,
    pub parameters: Vec<SpParameter>,
    pub option: Option<QueryOption>,
    pub display_named_parameters: bool,
}

impl StoredProcedure {
    /// Returns true if the call was written in `{? = call ...}` form.
    #[must_use]
    pub fn has_return_parameter(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| p.direction == ParameterDirection::Return)
    }
}

/// `UPDATE n` or `UPDATE *` on a dynamic command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateCount {
    Count(u32),
    Any,
}

/// `EXECUTE STRING sql [AS cols] [INTO g] [USING ...] [UPDATE n|*]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicCommand {
    pub sql: Expression,
    pub as_columns: Option<Vec<ColumnDefinition>>,
    pub into_group: Option<GroupSymbol>,
    pub using: Option<Vec<SetClause>>,
    pub update_count: Option<UpdateCount>,
}

/// `CREATE LOCAL TEMPORARY TABLE g (name type, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Create {
    pub table: GroupSymbol,
    pub columns: Vec<ColumnDefinition>,
}

/// `DROP TABLE g`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drop {
    pub table: GroupSymbol,
}

/// `CREATE [VIRTUAL] PROCEDURE block`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUpdateProcedureCommand {
    pub block: Block,
    /// False for `CREATE VIRTUAL PROCEDURE`.
    pub update_procedure: bool,
}

/// Opaque XQuery text with an optional trailing OPTION clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XQuery {
    pub text: String,
    pub option: Option<QueryOption>,
}

/// Top-level parse result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Query(Query),
    SetQuery(SetQuery),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    StoredProcedure(StoredProcedure),
    Dynamic(DynamicCommand),
    Create(Create),
    Drop(Drop),
    UpdateProcedure(CreateUpdateProcedureCommand),
    XQuery(XQuery),
}

/// Coarse classification of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Query,
    Insert,
    Update,
    Delete,
    StoredProcedure,
    Dynamic,
    Create,
    Drop,
    UpdateProcedure,
    XQuery,
    Unknown,
}

impl CommandType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::StoredProcedure => "STORED_PROCEDURE",
            Self::Dynamic => "DYNAMIC",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::UpdateProcedure => "UPDATE_PROCEDURE",
            Self::XQuery => "XQUERY",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Command {
    /// Returns the command's classification. Set queries are queries.
    #[must_use]
    pub const fn command_type(&self) -> CommandType {
        match self {
            Self::Query(_) | Self::SetQuery(_) => CommandType::Query,
            Self::Insert(_) => CommandType::Insert,
            Self::Update(_) => CommandType::Update,
            Self::Delete(_) => CommandType::Delete,
            Self::StoredProcedure(_) => CommandType::StoredProcedure,
            Self::Dynamic(_) => CommandType::Dynamic,
            Self::Create(_) => CommandType::Create,
            Self::Drop(_) => CommandType::Drop,
            Self::UpdateProcedure(_) => CommandType::UpdateProcedure,
            Self::XQuery(_) => CommandType::XQuery,
        }
    }

    /// Returns the command's OPTION clause, if it can carry one.
    #[must_use]
    pub const fn option(&self) -> Option<&QueryOption> {
        match self {
            Self::Query(query) => query.option.as_ref(),
            Self::SetQuery(query) => query.option.as_ref(),
            Self::Insert(insert) => insert.option.as_ref(),
            Self::Update(update) => update.option.as_ref(),
            Self::Delete(delete) => delete.option.as_ref(),
            Self::StoredProcedure(procedure) => procedure.option.as_ref(),
            Self::XQuery(xquery) => xquery.option.as_ref(),
            Self::Dynamic(_) | Self::Create(_) | Self::Drop(_) | Self::UpdateProcedure(_) => None,
        }
    }

    /// Creates a plain query over the given symbols and FROM items.
    #[must_use]
    pub fn select(symbols: Vec<Expression>, from: Vec<FromClause>) -> Self {
        Self::Query(Query {
            select: Select {
                distinct: false,
                symbols,
            },
            from,
            ..Query::default()
        })
    }
}
