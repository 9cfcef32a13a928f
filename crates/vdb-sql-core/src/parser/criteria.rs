//! Criteria (boolean predicate) parsing.

use super::error::QueryParserError;
use super::parser::Parser;
use crate::ast::{
    BetweenCriteria, CompareOperator, CompoundCriteria, Criteria, CriteriaSelector, ElementSymbol,
    HasCriteria, IsNullCriteria, LogicalOperator, MatchCriteria, Quantifier, SelectorType,
    SetCriteria, SubqueryCompareCriteria, SubquerySetCriteria, TranslateCriteria,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses an OR of ANDs of predicates.
    pub(super) fn parse_criteria(&mut self) -> Result<Criteria, QueryParserError> {
        self.nested(|p| p.parse_or())
    }

    fn parse_or(&mut self) -> Result<Criteria, QueryParserError> {
        let first = self.parse_and()?;
        if !self.check_keyword(Keyword::Or) {
            return Ok(first);
        }
        let mut criteria = vec![first];
        while self.eat_keyword(Keyword::Or) {
            criteria.push(self.parse_and()?);
        }
        Ok(Criteria::Compound(CompoundCriteria {
            operator: LogicalOperator::Or,
            criteria,
        }))
    }

    fn parse_and(&mut self) -> Result<Criteria, QueryParserError> {
        let first = self.parse_not()?;
        if !self.check_keyword(Keyword::And) {
            return Ok(first);
        }
        let mut criteria = vec![first];
        while self.eat_keyword(Keyword::And) {
            criteria.push(self.parse_not()?);
        }
        Ok(Criteria::Compound(CompoundCriteria {
            operator: LogicalOperator::And,
            criteria,
        }))
    }

    fn parse_not(&mut self) -> Result<Criteria, QueryParserError> {
        if self.eat_keyword(Keyword::Not) {
            let inner = self.nested_by(2, Parser::parse_not)?;
            return Ok(inner.negate());
        }
        self.parse_criteria_primary()
    }

    fn parse_criteria_primary(&mut self) -> Result<Criteria, QueryParserError> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                let command = self.parse_parenthesized_subquery()?;
                Ok(Criteria::Exists(Box::new(command)))
            }
            TokenKind::Keyword(Keyword::Has) => {
                self.advance();
                let selector = self.parse_criteria_selector()?;
                Ok(Criteria::Has(HasCriteria { selector }))
            }
            TokenKind::Keyword(Keyword::Translate)
                if self.peek_at(1).kind != TokenKind::LeftParen =>
            {
                self.advance();
                let selector = self.parse_criteria_selector()?;
                let mut translations = vec![];
                if self.eat_keyword(Keyword::With) {
                    self.expect(&TokenKind::LeftParen)?;
                    loop {
                        translations.push(self.parse_criteria()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(&TokenKind::RightParen)?;
                }
                Ok(Criteria::Translate(TranslateCriteria {
                    selector,
                    translations,
                }))
            }
            TokenKind::LeftParen if self.parenthesized_criteria_follows() => self.nested(|p| {
                p.advance();
                let criteria = p.parse_criteria()?;
                p.expect(&TokenKind::RightParen)?;
                Ok(criteria)
            }),
            _ => self.parse_predicate(),
        }
    }

    /// Decides whether the `(` at the cursor opens nested criteria rather
    /// than the left operand of a predicate, by looking at the token after
    /// the matching `)`.
    fn parenthesized_criteria_follows(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        loop {
            match self.peek_at(offset).kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eof => return true,
                _ => {}
            }
            offset += 1;
        }

        let after = &self.peek_at(offset + 1).kind;
        let continues_operand = match after {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Concat
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::Keyword(Keyword::Is | Keyword::In | Keyword::Like | Keyword::Between) => {
                true
            }
            TokenKind::Keyword(Keyword::Not) => matches!(
                self.peek_at(offset + 2).as_keyword(),
                Some(Keyword::In | Keyword::Like | Keyword::Between)
            ),
            _ => false,
        };
        !continues_operand
    }

    /// Parses `expr <comparison|BETWEEN|LIKE|IN|IS NULL> ...`.
    fn parse_predicate(&mut self) -> Result<Criteria, QueryParserError> {
        let expression = self.parse_expression()?;

        if let Some(operator) = compare_operator(&self.current().kind) {
            self.advance();
            let quantifier = match self.current().as_keyword() {
                Some(Keyword::Any) => Some(Quantifier::Any),
                Some(Keyword::Some) => Some(Quantifier::Some),
                Some(Keyword::All) => Some(Quantifier::All),
                _ => None,
            };
            if let Some(quantifier) = quantifier {
                self.advance();
                let command = self.parse_parenthesized_subquery()?;
                return Ok(Criteria::SubqueryCompare(SubqueryCompareCriteria {
                    expression,
                    operator,
                    quantifier,
                    command: Box::new(command),
                }));
            }
            let right = self.parse_expression()?;
            return Ok(Criteria::compare(expression, operator, right));
        }

        let negated = self.check_keyword(Keyword::Not)
            && matches!(
                self.peek_at(1).as_keyword(),
                Some(Keyword::Between | Keyword::Like | Keyword::In)
            );
        if negated {
            self.advance();
        }

        match self.current().as_keyword() {
            Some(Keyword::Between) => {
                self.advance();
                let lower = self.parse_expression()?;
                self.expect_keyword(Keyword::And)?;
                let upper = self.parse_expression()?;
                Ok(Criteria::Between(BetweenCriteria {
                    expression,
                    lower,
                    upper,
                    negated,
                }))
            }
            Some(Keyword::Like) => {
                self.advance();
                let pattern = self.parse_expression()?;
                let escape = if self.eat_keyword(Keyword::Escape) {
                    Some(self.parse_escape_char()?)
                } else {
                    None
                };
                Ok(Criteria::Match(MatchCriteria {
                    expression,
                    pattern,
                    escape,
                    negated,
                }))
            }
            Some(Keyword::In) => {
                self.advance();
                if self.command_follows() {
                    if let Some(command) = self.attempt(Parser::parse_parenthesized_subquery)? {
                        return Ok(Criteria::SubquerySet(SubquerySetCriteria {
                            expression,
                            command: Box::new(command),
                            negated,
                        }));
                    }
                }
                self.expect(&TokenKind::LeftParen)?;
                let values = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Criteria::Set(SetCriteria {
                    expression,
                    values,
                    negated,
                }))
            }
            Some(Keyword::Is) if !negated => {
                self.advance();
                let negated = self.eat_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                Ok(Criteria::IsNull(IsNullCriteria {
                    expression,
                    negated,
                }))
            }
            _ => Err(self.error_expected("a comparison operator, BETWEEN, IN, LIKE or IS")),
        }
    }

    /// Parses the single-character string after `ESCAPE`.
    fn parse_escape_char(&mut self) -> Result<char, QueryParserError> {
        let token = self.current();
        let TokenKind::String(text) = &token.kind else {
            return Err(self.error_expected("a string literal"));
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                self.advance();
                Ok(c)
            }
            _ => Err(QueryParserError::at(
                format!("LIKE ESCAPE must be a single character, found '{text}'"),
                token.span,
            )),
        }
    }

    /// Parses `[selector] CRITERIA [ON (e1, ...)]`.
    pub(super) fn parse_criteria_selector(&mut self) -> Result<CriteriaSelector, QueryParserError> {
        let selector_type = match self.current().kind {
            TokenKind::Eq => SelectorType::CompareEq,
            TokenKind::NotEq => SelectorType::CompareNe,
            TokenKind::Lt => SelectorType::CompareLt,
            TokenKind::LtEq => SelectorType::CompareLe,
            TokenKind::Gt => SelectorType::CompareGt,
            TokenKind::GtEq => SelectorType::CompareGe,
            TokenKind::Keyword(Keyword::Like) => SelectorType::Like,
            TokenKind::Keyword(Keyword::In) => SelectorType::In,
            TokenKind::Keyword(Keyword::Between) => SelectorType::Between,
            TokenKind::Keyword(Keyword::Is) => {
                self.advance();
                if !self.check_keyword(Keyword::Null) {
                    return Err(self.error_expected("\"NULL\""));
                }
                SelectorType::IsNull
            }
            TokenKind::Keyword(Keyword::Criteria) => SelectorType::Any,
            _ => return Err(self.error_expected("a criteria selector or \"CRITERIA\"")),
        };
        if selector_type != SelectorType::Any {
            self.advance();
        }
        self.expect_keyword(Keyword::Criteria)?;

        let mut elements = vec![];
        if self.eat_keyword(Keyword::On) {
            self.expect(&TokenKind::LeftParen)?;
            loop {
                elements.push(ElementSymbol::new(self.parse_dotted_name()?.0));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }

        Ok(CriteriaSelector {
            selector_type,
            elements,
        })
    }
}

const fn compare_operator(kind: &TokenKind) -> Option<CompareOperator> {
    match kind {
        TokenKind::Eq => Some(CompareOperator::Eq),
        TokenKind::NotEq => Some(CompareOperator::Ne),
        TokenKind::Lt => Some(CompareOperator::Lt),
        TokenKind::LtEq => Some(CompareOperator::Le),
        TokenKind::Gt => Some(CompareOperator::Gt),
        TokenKind::GtEq => Some(CompareOperator::Ge),
        _ => None,
    }
}
