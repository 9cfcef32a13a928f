//! FROM clause parsing: joins, subqueries and planner hints.

use super::error::QueryParserError;
use super::parser::Parser;
use crate::ast::{FromClause, FromHints, JoinType, SubqueryFromClause, UnaryFromClause};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses the comma-separated items of a FROM clause.
    pub(super) fn parse_from_list(&mut self) -> Result<Vec<FromClause>, QueryParserError> {
        let mut items = vec![self.parse_joined_table()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_joined_table()?);
        }
        Ok(items)
    }

    /// Parses a left-associative chain of joins.
    fn parse_joined_table(&mut self) -> Result<FromClause, QueryParserError> {
        let mut left = self.parse_table_primary()?;

        while let Some(join_type) = self.parse_join_type()? {
            let right = self.parse_table_primary()?;

            let criteria = if join_type.requires_criteria() {
                self.expect_keyword(Keyword::On)?;
                self.parse_criteria()?.into_conjuncts()
            } else {
                if self.check_keyword(Keyword::On) {
                    return Err(QueryParserError::at(
                        format!("{} does not take an ON clause", join_type.as_str()),
                        self.current().span,
                    ));
                }
                vec![]
            };

            left = left.join(join_type, right, criteria);
        }

        Ok(left)
    }

    /// Consumes join keywords, if present.
    fn parse_join_type(&mut self) -> Result<Option<JoinType>, QueryParserError> {
        let join_type = match self.current().as_keyword() {
            Some(Keyword::Join) => {
                self.advance();
                return Ok(Some(JoinType::Inner));
            }
            Some(Keyword::Inner) => JoinType::Inner,
            Some(Keyword::Cross) => JoinType::Cross,
            Some(Keyword::Left) => JoinType::LeftOuter,
            Some(Keyword::Right) => JoinType::RightOuter,
            Some(Keyword::Full) => JoinType::FullOuter,
            // UNION alone starts a set operation
            Some(Keyword::Union) if self.peek_at(1).as_keyword() == Some(Keyword::Join) => {
                JoinType::Union
            }
            _ => return Ok(None),
        };
        self.advance();

        if matches!(
            join_type,
            JoinType::LeftOuter | JoinType::RightOuter | JoinType::FullOuter
        ) {
            self.eat_keyword(Keyword::Outer);
        }
        self.expect_keyword(Keyword::Join)?;
        Ok(Some(join_type))
    }

    /// Parses a group, a parenthesized join or a subquery, with its hints.
    fn parse_table_primary(&mut self) -> Result<FromClause, QueryParserError> {
        let optional = self.current().optional_hint;

        let mut clause = if self.check(&TokenKind::LeftParen) {
            match self.parse_from_subquery()? {
                Some(subquery) => subquery,
                None => self.nested(|p| {
                    p.advance();
                    let inner = p.parse_joined_table()?;
                    p.expect(&TokenKind::RightParen)?;
                    Ok(inner)
                })?,
            }
        } else {
            let group = self.parse_group_symbol()?;
            let alias = self.parse_alias()?;
            FromClause::Unary(UnaryFromClause {
                group,
                alias,
                hints: FromHints::default(),
            })
        };

        clause.hints_mut().optional |= optional;
        loop {
            if self.eat_keyword(Keyword::Makedep) {
                clause.hints_mut().make_dep = true;
            } else if self.eat_keyword(Keyword::Makenotdep) {
                clause.hints_mut().make_not_dep = true;
            } else {
                return Ok(clause);
            }
        }
    }

    /// Parses `(command) [AS] alias` when the parentheses hold a command.
    fn parse_from_subquery(&mut self) -> Result<Option<FromClause>, QueryParserError> {
        if !self.command_follows() {
            return Ok(None);
        }
        let Some(command) = self.attempt(Parser::parse_parenthesized_subquery)? else {
            return Ok(None);
        };
        let span = self.current().span;
        let Some(alias) = self.parse_alias()? else {
            return Err(QueryParserError::at(
                "Subquery in FROM requires an alias",
                span,
            ));
        };
        Ok(Some(FromClause::Subquery(SubqueryFromClause {
            alias,
            command: Box::new(command),
            hints: FromHints::default(),
        })))
    }
}
