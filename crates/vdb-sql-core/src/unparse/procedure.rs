//! Rendering of procedure blocks, one statement per line.

use core::fmt;

use super::write_dotted;
use crate::ast::{AssignmentValue, Block, Statement};

impl fmt::Display for AssignmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression(expression) => write!(f, "{expression}"),
            Self::Command(command) => write!(f, "{command}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BEGIN\n")?;
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        f.write_str("END")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declare(declare) => {
                write!(f, "DECLARE {} {}", declare.data_type, declare.variable)?;
                if let Some(value) = &declare.value {
                    write!(f, " = {value}")?;
                }
                f.write_str(";")
            }
            Self::Assignment(assignment) => {
                write!(f, "{} = {};", assignment.variable, assignment.value)
            }
            Self::If(statement) => {
                write!(f, "IF({})\n{}", statement.condition, statement.then_block)?;
                if let Some(else_block) = &statement.else_block {
                    write!(f, "\nELSE\n{else_block}")?;
                }
                Ok(())
            }
            Self::While(statement) => {
                write!(f, "WHILE({})\n{}", statement.condition, statement.block)
            }
            Self::Loop(statement) => {
                write!(f, "LOOP ON ({}) AS ", statement.command)?;
                write_dotted(f, &statement.cursor)?;
                write!(f, "\n{}", statement.block)
            }
            Self::Break => f.write_str("BREAK;"),
            Self::Continue => f.write_str("CONTINUE;"),
            Self::RaiseError(message) => write!(f, "ERROR {message};"),
            Self::Command(command) => write!(f, "{command};"),
        }
    }
}
