//! Scalar expression parsing.

use super::error::QueryParserError;
use super::parser::Parser;
use super::pratt::{infix_binding_power, operator_name, PREFIX_MINUS_BINDING_POWER};
use crate::ast::visit::contains_aggregate;
use crate::ast::{
    AggregateFunction, CaseExpression, Expression, SearchedCaseExpression, Value,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses an expression using Pratt parsing.
    pub(super) fn parse_expression(&mut self) -> Result<Expression, QueryParserError> {
        self.nested(|p| p.parse_expression_bp(0))
    }

    /// Parses an expression with the given minimum binding power.
    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Expression, QueryParserError> {
        let mut left = self.parse_prefix()?;

        loop {
            let kind = &self.current().kind;
            let (Some((l_bp, r_bp)), Some(op)) = (infix_binding_power(kind), operator_name(kind))
            else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let right = self.parse_expression_bp(r_bp)?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parses a prefix expression (literals, names, unary minus, etc.).
    #[allow(clippy::too_many_lines)]
    fn parse_prefix(&mut self) -> Result<Expression, QueryParserError> {
        let token = self.current().clone();

        match &token.kind {
            // Literals
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expression::integer(*n))
            }
            TokenKind::Long(n) => {
                self.advance();
                Ok(Expression::Constant(Value::Long(*n)))
            }
            TokenKind::BigInteger(digits) => {
                self.advance();
                Ok(Expression::Constant(Value::BigInteger(digits.clone())))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Expression::Constant(Value::Double(*n)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expression::string(s.clone()))
            }
            TokenKind::Date(d) => {
                self.advance();
                Ok(Expression::Constant(Value::Date(*d)))
            }
            TokenKind::Time(t) => {
                self.advance();
                Ok(Expression::Constant(Value::Time(*t)))
            }
            TokenKind::Timestamp(ts) => {
                self.advance();
                Ok(Expression::Constant(Value::Timestamp(*ts)))
            }
            TokenKind::Boolean(b) => {
                self.advance();
                Ok(Expression::Constant(Value::Boolean(*b)))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expression::Constant(Value::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expression::Constant(Value::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expression::null())
            }

            // Parameter reference
            TokenKind::Question => {
                self.advance();
                Ok(self.next_reference())
            }

            // Unary minus
            TokenKind::Minus => {
                self.advance();
                if let Some(value) = self.negative_literal() {
                    self.advance();
                    return Ok(Expression::Constant(value));
                }
                let operand =
                    self.nested_by(2, |p| p.parse_expression_bp(PREFIX_MINUS_BINDING_POWER))?;
                Ok(Expression::binary("*", Expression::integer(-1), operand))
            }

            // Parenthesized expression or scalar subquery
            TokenKind::LeftParen => {
                if self.command_follows() {
                    if let Some(command) = self.attempt(Parser::parse_parenthesized_subquery)? {
                        return Ok(Expression::ScalarSubquery(Box::new(command)));
                    }
                }
                self.nested(|p| {
                    p.advance();
                    let expr = p.parse_expression()?;
                    p.expect(&TokenKind::RightParen)?;
                    Ok(expr)
                })
            }

            // {fn function(...)}
            TokenKind::LeftBrace => {
                self.advance();
                if !self.check_word("fn") {
                    return Err(self.error_expected("\"fn\""));
                }
                self.advance();
                let span = self.current().span;
                // A bare call only: no operators, no wrapping parentheses.
                let expr = if self.check(&TokenKind::LeftParen) {
                    None
                } else {
                    Some(self.nested(Parser::parse_prefix)?)
                };
                let Some(expr @ Expression::Function(_)) = expr else {
                    return Err(QueryParserError::at(
                        "{fn ...} must contain a function call",
                        span,
                    ));
                };
                self.expect(&TokenKind::RightBrace)?;
                Ok(expr)
            }

            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast(),
            TokenKind::Keyword(Keyword::Convert) => self.parse_convert(),

            TokenKind::Keyword(
                kw @ (Keyword::Count | Keyword::Sum | Keyword::Avg | Keyword::Min | Keyword::Max),
            ) => self.parse_aggregate(*kw),

            // Functions whose names are reserved words
            TokenKind::Keyword(
                Keyword::Left | Keyword::Right | Keyword::Char | Keyword::Insert | Keyword::Translate,
            ) if self.peek_at(1).kind == TokenKind::LeftParen => {
                let name = self
                    .input
                    .get(token.span.start..token.span.end)
                    .unwrap_or_default()
                    .to_string();
                self.advance();
                self.parse_function_call(name)
            }

            // Element or function call
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                let (name, _) = self.parse_dotted_name()?;
                if self.check(&TokenKind::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(Expression::element(name))
                }
            }

            _ => Err(self.error_expected("an expression")),
        }
    }

    /// If the current token is a numeric literal, returns it negated at the
    /// narrowest width that holds it.
    fn negative_literal(&self) -> Option<Value> {
        let token = self.current();
        let text = self.input.get(token.span.start..token.span.end)?;
        match &token.kind {
            TokenKind::Integer(_) | TokenKind::Long(_) | TokenKind::BigInteger(_) => {
                let negative = format!("-{text}");
                if let Ok(n) = negative.parse::<i32>() {
                    Some(Value::Integer(n))
                } else if let Ok(n) = negative.parse::<i64>() {
                    Some(Value::Long(n))
                } else {
                    let digits = text.trim_start_matches('0');
                    Some(Value::BigInteger(format!("-{digits}")))
                }
            }
            TokenKind::Float(n) => Some(Value::Double(-n)),
            _ => None,
        }
    }

    /// Parses `(args)` after a function name.
    fn parse_function_call(&mut self, name: String) -> Result<Expression, QueryParserError> {
        self.nested(|p| {
            p.expect(&TokenKind::LeftParen)?;
            let args = if p.check(&TokenKind::RightParen) {
                vec![]
            } else {
                p.parse_expression_list()?
            };
            p.expect(&TokenKind::RightParen)?;
            Ok(Expression::function(name, args))
        })
    }

    /// Parses `COUNT(*)`, `SUM([DISTINCT|ALL] expr)` and friends.
    fn parse_aggregate(&mut self, keyword: Keyword) -> Result<Expression, QueryParserError> {
        let function = match keyword {
            Keyword::Count => AggregateFunction::Count,
            Keyword::Sum => AggregateFunction::Sum,
            Keyword::Avg => AggregateFunction::Avg,
            Keyword::Min => AggregateFunction::Min,
            _ => AggregateFunction::Max,
        };
        self.advance();

        self.nested(|p| {
            p.expect(&TokenKind::LeftParen)?;

            if function == AggregateFunction::Count && p.eat(&TokenKind::Star) {
                p.expect(&TokenKind::RightParen)?;
                return Ok(Expression::aggregate(function, false, None));
            }

            let distinct = if p.eat_keyword(Keyword::Distinct) {
                true
            } else {
                p.eat_keyword(Keyword::All);
                false
            };

            let span = p.current().span;
            let arg = p.parse_expression()?;
            if contains_aggregate(&arg) {
                return Err(QueryParserError::at(
                    format!(
                        "Aggregate function {} cannot contain another aggregate function",
                        function.as_str()
                    ),
                    span,
                ));
            }
            p.expect(&TokenKind::RightParen)?;
            Ok(Expression::aggregate(function, distinct, Some(arg)))
        })
    }

    /// Parses simple `CASE x WHEN ...` and searched `CASE WHEN crit ...`.
    fn parse_case(&mut self) -> Result<Expression, QueryParserError> {
        self.expect_keyword(Keyword::Case)?;

        self.nested(|p| {
            let operand = if p.check_keyword(Keyword::When) {
                None
            } else {
                Some(p.parse_expression()?)
            };

            if !p.check_keyword(Keyword::When) {
                return Err(p.error_expected("\"WHEN\""));
            }

            let expr = if let Some(operand) = operand {
                let mut whens = vec![];
                let mut thens = vec![];
                while p.eat_keyword(Keyword::When) {
                    whens.push(p.parse_expression()?);
                    p.expect_keyword(Keyword::Then)?;
                    thens.push(p.parse_expression()?);
                }
                let else_expr = p.parse_case_else()?;
                Expression::Case(CaseExpression {
                    operand: Box::new(operand),
                    whens,
                    thens,
                    else_expr,
                })
            } else {
                let mut whens = vec![];
                let mut thens = vec![];
                while p.eat_keyword(Keyword::When) {
                    whens.push(p.parse_criteria()?);
                    p.expect_keyword(Keyword::Then)?;
                    thens.push(p.parse_expression()?);
                }
                let else_expr = p.parse_case_else()?;
                Expression::SearchedCase(SearchedCaseExpression {
                    whens,
                    thens,
                    else_expr,
                })
            };

            p.expect_keyword(Keyword::End)?;
            Ok(expr)
        })
    }

    fn parse_case_else(&mut self) -> Result<Option<Box<Expression>>, QueryParserError> {
        if self.eat_keyword(Keyword::Else) {
            Ok(Some(Box::new(self.parse_expression()?)))
        } else {
            Ok(None)
        }
    }

    /// Parses `CAST(expr AS type)` into the `cast` function.
    fn parse_cast(&mut self) -> Result<Expression, QueryParserError> {
        self.expect_keyword(Keyword::Cast)?;
        self.nested(|p| {
            p.expect(&TokenKind::LeftParen)?;
            let expr = p.parse_expression()?;
            p.expect_keyword(Keyword::As)?;
            let data_type = p.parse_data_type()?;
            p.expect(&TokenKind::RightParen)?;
            Ok(Expression::function(
                "cast",
                vec![expr, Expression::string(data_type.as_str())],
            ))
        })
    }

    /// Parses `CONVERT(expr, type)` into the `convert` function.
    fn parse_convert(&mut self) -> Result<Expression, QueryParserError> {
        self.expect_keyword(Keyword::Convert)?;
        self.nested(|p| {
            p.expect(&TokenKind::LeftParen)?;
            let expr = p.parse_expression()?;
            p.expect(&TokenKind::Comma)?;
            let data_type = p.parse_data_type()?;
            p.expect(&TokenKind::RightParen)?;
            Ok(Expression::function(
                "convert",
                vec![expr, Expression::string(data_type.as_str())],
            ))
        })
    }
}
