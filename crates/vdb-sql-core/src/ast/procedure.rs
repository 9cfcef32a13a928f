//! Procedure language AST types.

use serde::{Deserialize, Serialize};

use super::{Command, Criteria, DataType, ElementSymbol, Expression};

/// `BEGIN statement; ... END`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    #[must_use]
    pub const fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// Right-hand side of an assignment or declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignmentValue {
    Expression(Expression),
    Command(Box<Command>),
}

/// `DECLARE type variable [= value];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclareStatement {
    pub variable: ElementSymbol,
    pub data_type: DataType,
    pub value: Option<AssignmentValue>,
}

/// `variable = value;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStatement {
    pub variable: ElementSymbol,
    pub value: AssignmentValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Criteria,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Criteria,
    pub block: Block,
}

/// `LOOP ON (command) AS cursor block`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStatement {
    pub cursor: String,
    pub command: Box<Command>,
    pub block: Block,
}

/// Procedure statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Declare(DeclareStatement),
    Assignment(AssignmentStatement),
    If(IfStatement),
    While(WhileStatement),
    Loop(LoopStatement),
    Break,
    Continue,
    /// `ERROR message;`
    RaiseError(Expression),
    Command(Box<Command>),
}
