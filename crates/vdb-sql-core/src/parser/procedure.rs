//! Procedure language parsing: blocks and statements.

use super::error::QueryParserError;
use super::parser::Parser;
use crate::ast::{
    AssignmentStatement, AssignmentValue, Block, DeclareStatement, ElementSymbol, IfStatement,
    LoopStatement, Statement, WhileStatement,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses `BEGIN statement* END`.
    pub(super) fn parse_block(&mut self) -> Result<Block, QueryParserError> {
        self.nested(|p| {
            p.expect_keyword(Keyword::Begin)?;
            let mut statements = vec![];
            while !p.check_keyword(Keyword::End) {
                if p.current().is_eof() {
                    return Err(p.error_expected("\"END\""));
                }
                statements.push(p.parse_statement()?);
            }
            p.expect_keyword(Keyword::End)?;
            Ok(Block::new(statements))
        })
    }

    /// Parses a single statement, including its terminating `;` where the
    /// statement form has one.
    pub(super) fn parse_statement(&mut self) -> Result<Statement, QueryParserError> {
        self.nested_command(|p| match p.current().as_keyword() {
            Some(Keyword::If) => p.parse_if(),
            Some(Keyword::While) => {
                p.advance();
                let condition = p.parse_condition()?;
                let block = p.parse_branch()?;
                Ok(Statement::While(WhileStatement { condition, block }))
            }
            Some(Keyword::Loop) => p.parse_loop(),
            Some(Keyword::Declare) => p.parse_declare(),
            Some(Keyword::Break) => {
                p.advance();
                p.expect(&TokenKind::Semicolon)?;
                Ok(Statement::Break)
            }
            Some(Keyword::Continue) => {
                p.advance();
                p.expect(&TokenKind::Semicolon)?;
                Ok(Statement::Continue)
            }
            Some(Keyword::Error) => {
                p.advance();
                let message = p.parse_expression()?;
                p.expect(&TokenKind::Semicolon)?;
                Ok(Statement::RaiseError(message))
            }
            _ if p.assignment_follows() => {
                let variable = p.parse_variable("Assignment target")?;
                p.expect(&TokenKind::Eq)?;
                let value = p.parse_assignment_value()?;
                p.expect(&TokenKind::Semicolon)?;
                Ok(Statement::Assignment(AssignmentStatement { variable, value }))
            }
            _ => {
                let command = p.parse_command_with_option()?;
                p.expect(&TokenKind::Semicolon)?;
                Ok(Statement::Command(Box::new(command)))
            }
        })
    }

    /// Parses `IF (criteria) branch [ELSE branch]`.
    fn parse_if(&mut self) -> Result<Statement, QueryParserError> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.parse_condition()?;
        let then_block = self.parse_branch()?;
        let else_block = if self.eat_keyword(Keyword::Else) {
            Some(self.parse_branch()?)
        } else {
            None
        };
        Ok(Statement::If(IfStatement {
            condition,
            then_block,
            else_block,
        }))
    }

    /// Parses `LOOP ON (command) AS cursor branch`.
    fn parse_loop(&mut self) -> Result<Statement, QueryParserError> {
        self.expect_keyword(Keyword::Loop)?;
        self.expect_keyword(Keyword::On)?;
        let command = self.parse_parenthesized_subquery()?;
        self.expect_keyword(Keyword::As)?;
        let cursor = self.parse_variable("Cursor name")?.name;
        let block = self.parse_branch()?;
        Ok(Statement::Loop(LoopStatement {
            cursor,
            command: Box::new(command),
            block,
        }))
    }

    /// Parses `DECLARE type variable [= value];`.
    fn parse_declare(&mut self) -> Result<Statement, QueryParserError> {
        self.expect_keyword(Keyword::Declare)?;
        let data_type = self.parse_data_type()?;
        let variable = self.parse_variable("Declared variable")?;
        let value = if self.eat(&TokenKind::Eq) {
            Some(self.parse_assignment_value()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(Statement::Declare(DeclareStatement {
            variable,
            data_type,
            value,
        }))
    }

    /// Parses `(criteria)`.
    fn parse_condition(&mut self) -> Result<crate::ast::Criteria, QueryParserError> {
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_criteria()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(condition)
    }

    /// Parses a block, or a single statement wrapped in one.
    fn parse_branch(&mut self) -> Result<Block, QueryParserError> {
        if self.check_keyword(Keyword::Begin) {
            self.parse_block()
        } else {
            Ok(Block::new(vec![self.parse_statement()?]))
        }
    }

    /// Parses the right side of `=` in an assignment or declaration.
    ///
    /// A parenthesized query is a scalar subquery unless a set operator or
    /// trailing query clause follows the closing parenthesis, in which case
    /// the whole query expression is the value.
    fn parse_assignment_value(&mut self) -> Result<AssignmentValue, QueryParserError> {
        match self.current().as_keyword() {
            Some(
                Keyword::Select
                | Keyword::Exec
                | Keyword::Execute
                | Keyword::Insert
                | Keyword::Update
                | Keyword::Delete,
            ) => return self.parse_assignment_command(),
            _ if self.call_escape_follows() => return self.parse_assignment_command(),
            _ => {}
        }

        if self.command_follows() {
            let checkpoint = self.checkpoint();
            let expression = self.parse_expression()?;
            if !self.query_continues() {
                return Ok(AssignmentValue::Expression(expression));
            }
            self.restore(checkpoint);
            return self.parse_assignment_command();
        }

        Ok(AssignmentValue::Expression(self.parse_expression()?))
    }

    fn parse_assignment_command(&mut self) -> Result<AssignmentValue, QueryParserError> {
        Ok(AssignmentValue::Command(Box::new(
            self.parse_command_with_option()?,
        )))
    }

    /// Parses a variable name, rejecting double quotes unless
    /// `allow_double_quoted_variable` is set.
    fn parse_variable(&mut self, role: &str) -> Result<ElementSymbol, QueryParserError> {
        let span = self.current().span;
        let (name, quoted) = self.parse_dotted_name()?;
        if quoted && !self.info.allow_double_quoted_variable {
            return Err(QueryParserError::at(
                format!("{role} \"{name}\" must not be double-quoted"),
                span,
            ));
        }
        Ok(ElementSymbol::new(name))
    }

    /// True at `name[.name]* =`.
    fn assignment_follows(&self) -> bool {
        let mut offset = 0;
        loop {
            if self.peek_at(offset).as_identifier().is_none() {
                return false;
            }
            match self.peek_at(offset + 1).kind {
                TokenKind::Dot => offset += 2,
                TokenKind::Eq => return true,
                _ => return false,
            }
        }
    }
}
