//! SQL Parser implementation: token cursor, entry points and commands.
//!
//! Expressions, criteria, FROM clauses and procedure statements are parsed
//! by sibling modules that add `impl Parser` blocks.

use tracing::{debug, trace};

use super::error::QueryParserError;
use super::info::{ParseInfo, COMMAND_DEPTH_COST};
use crate::ast::{
    ColumnDefinition, Command, Create, CreateUpdateProcedureCommand, DataType, Delete, Drop,
    DynamicCommand, ElementSymbol, Expression, GroupSymbol, Insert, InsertSource, Limit, OrderBy,
    OrderByItem, ParameterDirection, Query, QueryOption, Select, SetClause, SetOperation,
    SetQuery, SpParameter, StoredProcedure, Update, UpdateCount, XQuery,
};
use crate::ast::visit::contains_aggregate;
use crate::lexer::{tokenize, Keyword, Span, Token, TokenKind};

/// SQL Parser over a fully tokenized input.
pub struct Parser<'a> {
    pub(super) input: &'a str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) info: ParseInfo,
    /// Current grammar nesting depth.
    pub(super) depth: usize,
    /// Number of `?` references seen so far.
    pub(super) reference_count: usize,
    /// Set once `max_depth` is hit; backtracking never hides that error.
    pub(super) depth_exceeded: bool,
}

/// Saved cursor state for backtracking.
#[derive(Clone, Copy)]
pub(super) struct Checkpoint {
    pos: usize,
    reference_count: usize,
}

impl<'a> Parser<'a> {
    /// Tokenizes `input` and creates a parser over it.
    ///
    /// # Errors
    ///
    /// Returns the lexer's error, converted to a `QueryParserError`.
    pub fn new(input: &'a str, info: ParseInfo) -> Result<Self, QueryParserError> {
        let tokens = tokenize(input)?;
        Ok(Self {
            input,
            tokens,
            pos: 0,
            info,
            depth: 0,
            reference_count: 0,
            depth_exceeded: false,
        })
    }

    /// Parses a complete command, requiring the input to end after it.
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` if the input is not a single valid command.
    pub fn parse_command(&mut self) -> Result<Command, QueryParserError> {
        let command = self.parse_command_with_option()?;
        self.expect_eof()?;
        Ok(command)
    }

    /// Parses any command, including a trailing OPTION clause.
    pub(super) fn parse_command_with_option(&mut self) -> Result<Command, QueryParserError> {
        let span = self.current().span;
        let mut command = match self.current().kind {
            TokenKind::Keyword(Keyword::Select) | TokenKind::LeftParen => {
                self.parse_query_expression()?
            }
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert()?,
            TokenKind::Keyword(Keyword::Update) => self.parse_update()?,
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete()?,
            TokenKind::Keyword(Keyword::Exec | Keyword::Execute) => self.parse_execute()?,
            TokenKind::LeftBrace => self.parse_call()?,
            TokenKind::Keyword(Keyword::Create) => self.parse_create()?,
            TokenKind::Keyword(Keyword::Drop) => self.parse_drop()?,
            _ => {
                return Err(self.error_expected(
                    "SELECT, INSERT, UPDATE, DELETE, EXEC, CREATE or DROP",
                ));
            }
        };

        if self.check_keyword(Keyword::Option) {
            let option = self.parse_option()?;
            attach_option(&mut command, option, span)?;
        }
        Ok(command)
    }

    /// Parses a command in subquery position: a query expression or a
    /// stored procedure call, without OPTION.
    pub(super) fn parse_subquery_command(&mut self) -> Result<Command, QueryParserError> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::Exec | Keyword::Execute) => {
                self.nested_command(Parser::parse_execute)
            }
            TokenKind::LeftBrace => self.nested_command(Parser::parse_call),
            _ => self.parse_query_expression(),
        }
    }

    /// Parses `( command )`.
    pub(super) fn parse_parenthesized_subquery(&mut self) -> Result<Command, QueryParserError> {
        self.nested(|p| {
            p.expect(&TokenKind::LeftParen)?;
            let command = p.parse_subquery_command()?;
            p.expect(&TokenKind::RightParen)?;
            Ok(command)
        })
    }

    // --- Queries ---

    /// Parses UNION/EXCEPT chains of INTERSECT terms, then ORDER BY and LIMIT.
    pub(super) fn parse_query_expression(&mut self) -> Result<Command, QueryParserError> {
        self.nested_command(|p| {
            let mut left = p.parse_query_term()?;
            loop {
                let operation = if p.check_keyword(Keyword::Union) {
                    SetOperation::Union
                } else if p.check_keyword(Keyword::Except) {
                    SetOperation::Except
                } else {
                    break;
                };
                p.advance();
                let all = p.eat_keyword(Keyword::All);
                let right = p.parse_query_term()?;
                left = set_query(operation, all, left, right);
            }

            if p.check_keyword(Keyword::Order) {
                let span = p.current().span;
                let order_by = p.parse_order_by()?;
                match &mut left {
                    Command::Query(Query { order_by: slot, .. })
                    | Command::SetQuery(SetQuery { order_by: slot, .. })
                        if slot.is_none() =>
                    {
                        *slot = Some(order_by);
                    }
                    _ => return Err(QueryParserError::at("ORDER BY is specified twice", span)),
                }
            }

            if p.check_keyword(Keyword::Limit) {
                let span = p.current().span;
                let limit = p.parse_limit()?;
                match &mut left {
                    Command::Query(Query { limit: slot, .. })
                    | Command::SetQuery(SetQuery { limit: slot, .. })
                        if slot.is_none() =>
                    {
                        *slot = Some(limit);
                    }
                    _ => return Err(QueryParserError::at("LIMIT is specified twice", span)),
                }
            }

            Ok(left)
        })
    }

    fn parse_query_term(&mut self) -> Result<Command, QueryParserError> {
        let mut left = self.parse_query_primary()?;
        while self.eat_keyword(Keyword::Intersect) {
            let all = self.eat_keyword(Keyword::All);
            let right = self.parse_query_primary()?;
            left = set_query(SetOperation::Intersect, all, left, right);
        }
        Ok(left)
    }

    fn parse_query_primary(&mut self) -> Result<Command, QueryParserError> {
        if self.check(&TokenKind::LeftParen) {
            return self.nested(|p| {
                p.advance();
                let command = p.parse_query_expression()?;
                p.expect(&TokenKind::RightParen)?;
                Ok(command)
            });
        }
        if self.check_keyword(Keyword::Select) {
            return Ok(Command::Query(self.parse_query()?));
        }
        Err(self.error_expected("SELECT"))
    }

    /// Parses a single SELECT without set operations or trailing clauses.
    fn parse_query(&mut self) -> Result<Query, QueryParserError> {
        self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.eat_keyword(Keyword::Distinct) {
            true
        } else {
            self.eat_keyword(Keyword::All);
            false
        };

        let symbols = self.parse_select_symbols()?;

        let into = if self.eat_keyword(Keyword::Into) {
            Some(self.parse_group_symbol()?)
        } else {
            None
        };

        // FROM clause (optional for expressions like SELECT 1+1)
        let from = if self.eat_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            vec![]
        };

        if from.is_empty() {
            for clause in [Keyword::Where, Keyword::Group, Keyword::Having] {
                if self.check_keyword(clause) {
                    return Err(QueryParserError::at(
                        format!("{} requires a FROM clause", clause.as_str()),
                        self.current().span,
                    ));
                }
            }
        }

        let criteria = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_criteria()?)
        } else {
            None
        };

        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            let mut symbols = vec![];
            loop {
                let span = self.current().span;
                let symbol = self.parse_expression()?;
                if contains_aggregate(&symbol) {
                    return Err(QueryParserError::at(
                        "GROUP BY cannot contain an aggregate function",
                        span,
                    ));
                }
                symbols.push(symbol);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            symbols
        } else {
            vec![]
        };

        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.parse_criteria()?)
        } else {
            None
        };

        Ok(Query {
            select: Select { distinct, symbols },
            into,
            from,
            criteria,
            group_by,
            having,
            order_by: None,
            limit: None,
            option: None,
        })
    }

    /// Parses the select list, naming unnamed expressions `expr`, `expr1`, ...
    fn parse_select_symbols(&mut self) -> Result<Vec<Expression>, QueryParserError> {
        let mut symbols = vec![];
        let mut generated = 0usize;

        loop {
            let symbol = if self.eat(&TokenKind::Star) {
                Expression::All
            } else if self.group_star_follows() {
                let name = self.parse_dotted_name()?.0;
                self.expect(&TokenKind::Dot)?;
                self.expect(&TokenKind::Star)?;
                Expression::AllInGroup(name)
            } else {
                let expression = self.parse_expression()?;
                let expression = if matches!(
                    expression,
                    Expression::Element(_) | Expression::Aggregate(_)
                ) {
                    expression
                } else {
                    let name = if generated == 0 {
                        "expr".to_string()
                    } else {
                        format!("expr{generated}")
                    };
                    generated += 1;
                    expression.named(name)
                };
                match self.parse_alias()? {
                    Some(alias) => expression.alias(alias),
                    None => expression,
                }
            };
            symbols.push(symbol);

            if !self.eat(&TokenKind::Comma) {
                return Ok(symbols);
            }
        }
    }

    /// Parses `[AS] alias`, rejecting dotted aliases.
    pub(super) fn parse_alias(&mut self) -> Result<Option<String>, QueryParserError> {
        let explicit = self.eat_keyword(Keyword::As);
        if !explicit && self.current().as_identifier().is_none() {
            return Ok(None);
        }
        let span = self.current().span;
        let (alias, _) = self.parse_dotted_name()?;
        if alias.contains('.') {
            return Err(QueryParserError::at(
                format!("Alias \"{alias}\" must not contain a '.'"),
                span,
            ));
        }
        Ok(Some(alias))
    }

    /// True at `name.*`.
    fn group_star_follows(&self) -> bool {
        let mut offset = 0;
        loop {
            if self.peek_at(offset).as_identifier().is_none() {
                return false;
            }
            match (&self.peek_at(offset + 1).kind, &self.peek_at(offset + 2).kind) {
                (TokenKind::Dot, TokenKind::Star) => return true,
                (TokenKind::Dot, _) => offset += 2,
                _ => return false,
            }
        }
    }

    fn parse_order_by(&mut self) -> Result<OrderBy, QueryParserError> {
        self.expect_keyword(Keyword::Order)?;
        self.expect_keyword(Keyword::By)?;
        let mut items = vec![];
        loop {
            let expression = self.parse_expression()?;
            let ascending = if self.eat_keyword(Keyword::Desc) {
                false
            } else {
                self.eat_keyword(Keyword::Asc);
                true
            };
            items.push(OrderByItem {
                expression,
                ascending,
            });
            if !self.eat(&TokenKind::Comma) {
                return Ok(OrderBy { items });
            }
        }
    }

    /// Parses `LIMIT n` or `LIMIT offset, n`.
    fn parse_limit(&mut self) -> Result<Limit, QueryParserError> {
        self.expect_keyword(Keyword::Limit)?;
        let first = self.parse_limit_value()?;
        if self.eat(&TokenKind::Comma) {
            let row_limit = self.parse_limit_value()?;
            Ok(Limit {
                offset: Some(first),
                row_limit,
            })
        } else {
            Ok(Limit {
                offset: None,
                row_limit: first,
            })
        }
    }

    fn parse_limit_value(&mut self) -> Result<Expression, QueryParserError> {
        match self.current().kind {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(Expression::integer(value))
            }
            TokenKind::Question => {
                self.advance();
                Ok(self.next_reference())
            }
            _ => Err(self.error_expected("an integer or ?")),
        }
    }

    /// Parses `OPTION` followed by any number of flags and group lists.
    pub(super) fn parse_option(&mut self) -> Result<QueryOption, QueryParserError> {
        self.expect_keyword(Keyword::Option)?;
        let mut option = QueryOption::default();
        loop {
            match self.current().as_keyword() {
                Some(Keyword::Showplan) => {
                    self.advance();
                    option.show_plan = true;
                }
                Some(Keyword::Planonly) => {
                    self.advance();
                    option.plan_only = true;
                }
                Some(Keyword::Debug) => {
                    self.advance();
                    option.debug = true;
                }
                Some(Keyword::Makedep) => {
                    self.advance();
                    let groups = self.parse_group_name_list()?;
                    option.make_dep_groups.extend(groups);
                }
                Some(Keyword::Makenotdep) => {
                    self.advance();
                    let groups = self.parse_group_name_list()?;
                    option.make_not_dep_groups.extend(groups);
                }
                Some(Keyword::Nocache) => {
                    self.advance();
                    option.no_cache = true;
                    if self.current().as_identifier().is_some() {
                        let groups = self.parse_group_name_list()?;
                        option.no_cache_groups.extend(groups);
                    }
                }
                _ => return Ok(option),
            }
        }
    }

    fn parse_group_name_list(&mut self) -> Result<Vec<String>, QueryParserError> {
        let mut names = vec![self.parse_group_name()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.parse_group_name()?);
        }
        Ok(names)
    }

    // --- Data manipulation ---

    fn parse_insert(&mut self) -> Result<Command, QueryParserError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let group = self.parse_group_symbol()?;

        let mut variables = vec![];
        if self.check(&TokenKind::LeftParen) && !self.command_follows() {
            self.advance();
            loop {
                variables.push(ElementSymbol::new(self.parse_dotted_name()?.0));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }

        let source = if self.eat_keyword(Keyword::Values) {
            self.expect(&TokenKind::LeftParen)?;
            let values = self.parse_expression_list()?;
            self.expect(&TokenKind::RightParen)?;
            InsertSource::Values(values)
        } else if self.check_keyword(Keyword::Select) || self.check(&TokenKind::LeftParen) {
            InsertSource::Query(Box::new(self.parse_query_expression()?))
        } else {
            return Err(self.error_expected("VALUES or a query"));
        };

        Ok(Command::Insert(Insert {
            group,
            variables,
            source,
            option: None,
        }))
    }

    fn parse_update(&mut self) -> Result<Command, QueryParserError> {
        self.expect_keyword(Keyword::Update)?;
        let group = self.parse_group_symbol()?;
        self.expect_keyword(Keyword::Set)?;
        let changes = self.parse_set_clauses()?;
        let criteria = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_criteria()?)
        } else {
            None
        };
        Ok(Command::Update(Update {
            group,
            changes,
            criteria,
            option: None,
        }))
    }

    /// Parses `element = expression, ...`.
    fn parse_set_clauses(&mut self) -> Result<Vec<SetClause>, QueryParserError> {
        let mut clauses = vec![];
        loop {
            let symbol = ElementSymbol::new(self.parse_dotted_name()?.0);
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression()?;
            clauses.push(SetClause { symbol, value });
            if !self.eat(&TokenKind::Comma) {
                return Ok(clauses);
            }
        }
    }

    fn parse_delete(&mut self) -> Result<Command, QueryParserError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let group = self.parse_group_symbol()?;
        let criteria = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_criteria()?)
        } else {
            None
        };
        Ok(Command::Delete(Delete {
            group,
            criteria,
            option: None,
        }))
    }

    // --- Procedure execution ---

    /// Parses `EXEC|EXECUTE name(args)` or `EXEC|EXECUTE STRING ...`.
    fn parse_execute(&mut self) -> Result<Command, QueryParserError> {
        self.advance();
        if self.eat_keyword(Keyword::String) {
            return self.parse_dynamic_command();
        }
        let name = self.parse_group_name()?;
        self.expect(&TokenKind::LeftParen)?;
        let (parameters, named) = self.parse_procedure_arguments(1)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Command::StoredProcedure(StoredProcedure {
            name,
            parameters,
            option: None,
            display_named_parameters: named,
        }))
    }

    /// Parses the JDBC `{[? =] call name[(args)]}` form.
    fn parse_call(&mut self) -> Result<Command, QueryParserError> {
        self.expect(&TokenKind::LeftBrace)?;

        let mut parameters = vec![];
        if self.eat(&TokenKind::Question) {
            self.expect(&TokenKind::Eq)?;
            parameters.push(SpParameter {
                index: 1,
                name: None,
                value: None,
                direction: ParameterDirection::Return,
            });
        }

        if !self.check_word("call") {
            return Err(self.error_expected("\"call\""));
        }
        self.advance();

        let name = self.parse_group_name()?;
        let mut named = false;
        if self.eat(&TokenKind::LeftParen) {
            let (arguments, is_named) = self.parse_procedure_arguments(parameters.len() + 1)?;
            parameters.extend(arguments);
            named = is_named;
            self.expect(&TokenKind::RightParen)?;
        }
        self.expect(&TokenKind::RightBrace)?;

        Ok(Command::StoredProcedure(StoredProcedure {
            name,
            parameters,
            option: None,
            display_named_parameters: named,
        }))
    }

    /// Parses call arguments up to (not including) the closing parenthesis.
    /// Returns the parameters, indexed from `first_index`, and whether the
    /// named form was used.
    fn parse_procedure_arguments(
        &mut self,
        first_index: usize,
    ) -> Result<(Vec<SpParameter>, bool), QueryParserError> {
        let mut parameters = vec![];
        let mut named: Option<bool> = None;
        if self.check(&TokenKind::RightParen) {
            return Ok((parameters, false));
        }

        loop {
            let span = self.current().span;
            let is_named = self.current().as_identifier().is_some()
                && self.peek_at(1).kind == TokenKind::Eq;
            if named.is_some_and(|n| n != is_named) {
                return Err(QueryParserError::at(
                    "Named and positional procedure arguments cannot be mixed",
                    span,
                ));
            }
            named = Some(is_named);

            let name = if is_named {
                if let TokenKind::QuotedIdentifier(name) = &self.current().kind {
                    return Err(QueryParserError::at(
                        format!("Named parameter \"{name}\" must not be quoted"),
                        span,
                    ));
                }
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::Eq)?;
                Some(name)
            } else {
                None
            };

            let value = self.parse_expression()?;
            parameters.push(SpParameter {
                index: first_index + parameters.len(),
                name,
                value: Some(value),
                direction: ParameterDirection::In,
            });

            if !self.eat(&TokenKind::Comma) {
                return Ok((parameters, named.unwrap_or(false)));
            }
        }
    }

    /// Parses the remainder of `EXECUTE STRING`.
    fn parse_dynamic_command(&mut self) -> Result<Command, QueryParserError> {
        let sql = self.parse_expression()?;

        let as_columns = if self.eat_keyword(Keyword::As) {
            Some(self.parse_column_definitions()?)
        } else {
            None
        };

        let into_group = if self.eat_keyword(Keyword::Into) {
            Some(self.parse_group_symbol()?)
        } else {
            None
        };

        let using = if self.eat_keyword(Keyword::Using) {
            Some(self.parse_set_clauses()?)
        } else {
            None
        };

        let update_count = if self.eat_keyword(Keyword::Update) {
            if self.eat(&TokenKind::Star) {
                Some(UpdateCount::Any)
            } else if let TokenKind::Integer(count) = self.current().kind {
                let count = u32::try_from(count).map_err(|_| {
                    QueryParserError::at("UPDATE count must not be negative", self.current().span)
                })?;
                self.advance();
                Some(UpdateCount::Count(count))
            } else {
                return Err(self.error_expected("an integer or *"));
            }
        } else {
            None
        };

        Ok(Command::Dynamic(DynamicCommand {
            sql,
            as_columns,
            into_group,
            using,
            update_count,
        }))
    }

    /// Parses `name type, name type, ...`.
    fn parse_column_definitions(&mut self) -> Result<Vec<ColumnDefinition>, QueryParserError> {
        let mut columns = vec![];
        loop {
            let name = self.parse_dotted_name()?.0;
            let data_type = self.parse_data_type()?;
            columns.push(ColumnDefinition { name, data_type });
            if !self.eat(&TokenKind::Comma) {
                return Ok(columns);
            }
        }
    }

    // --- Definition ---

    fn parse_create(&mut self) -> Result<Command, QueryParserError> {
        self.expect_keyword(Keyword::Create)?;
        match self.current().as_keyword() {
            Some(Keyword::Local) => {
                self.advance();
                self.expect_keyword(Keyword::Temporary)?;
                self.expect_keyword(Keyword::Table)?;
                let table = self.parse_group_symbol()?;
                self.expect(&TokenKind::LeftParen)?;
                let columns = self.parse_column_definitions()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Command::Create(Create { table, columns }))
            }
            Some(Keyword::Virtual) => {
                self.advance();
                self.expect_keyword(Keyword::Procedure)?;
                let block = self.parse_block()?;
                Ok(Command::UpdateProcedure(CreateUpdateProcedureCommand {
                    block,
                    update_procedure: false,
                }))
            }
            Some(Keyword::Procedure) => {
                self.advance();
                let block = self.parse_block()?;
                Ok(Command::UpdateProcedure(CreateUpdateProcedureCommand {
                    block,
                    update_procedure: true,
                }))
            }
            _ => Err(self.error_expected("LOCAL, VIRTUAL or PROCEDURE")),
        }
    }

    fn parse_drop(&mut self) -> Result<Command, QueryParserError> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_group_symbol()?;
        Ok(Command::Drop(Drop { table }))
    }

    /// Parses a type name keyword.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType, QueryParserError> {
        match self.current().as_keyword().and_then(DataType::from_keyword) {
            Some(data_type) => {
                self.advance();
                Ok(data_type)
            }
            None => Err(self.error_expected("a data type")),
        }
    }

    // --- Names ---

    /// Parses a dotted name. Returns the canonical unquoted name and whether
    /// any segment was double-quoted.
    pub(super) fn parse_dotted_name(&mut self) -> Result<(String, bool), QueryParserError> {
        let mut quoted = matches!(self.current().kind, TokenKind::QuotedIdentifier(_));
        let mut name = self.expect_identifier()?;
        while self.check(&TokenKind::Dot) && self.peek_at(1).as_identifier().is_some() {
            self.advance();
            quoted |= matches!(self.current().kind, TokenKind::QuotedIdentifier(_));
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
        Ok((name, quoted))
    }

    /// Parses a group name, folding adjacent `/` separators into `.`.
    pub(super) fn parse_group_name(&mut self) -> Result<String, QueryParserError> {
        let mut name = self.expect_identifier()?;
        loop {
            let separator = &self.current().kind;
            let joins_path = matches!(separator, TokenKind::Slash) && self.slash_is_path_separator();
            if !(matches!(separator, TokenKind::Dot) || joins_path)
                || self.peek_at(1).as_identifier().is_none()
            {
                return Ok(name);
            }
            self.advance();
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
    }

    pub(super) fn parse_group_symbol(&mut self) -> Result<GroupSymbol, QueryParserError> {
        Ok(GroupSymbol::new(self.parse_group_name()?))
    }

    /// True if the current `/` touches an identifier on both sides.
    fn slash_is_path_separator(&self) -> bool {
        let Some(previous) = self.pos.checked_sub(1).map(|i| &self.tokens[i]) else {
            return false;
        };
        let slash = self.current();
        let next = self.peek_at(1);
        previous.as_identifier().is_some()
            && previous.span.end == slash.span.start
            && slash.span.end == next.span.start
    }

    /// Parses a comma-separated list of expressions.
    pub(super) fn parse_expression_list(&mut self) -> Result<Vec<Expression>, QueryParserError> {
        let mut expressions = vec![self.parse_expression()?];
        while self.eat(&TokenKind::Comma) {
            expressions.push(self.parse_expression()?);
        }
        Ok(expressions)
    }

    /// Returns the next `?` reference.
    pub(super) fn next_reference(&mut self) -> Expression {
        let index = self.reference_count;
        self.reference_count += 1;
        Expression::Reference(index)
    }

    // --- Helper methods ---

    /// Returns the current token.
    pub(super) fn current(&self) -> &Token {
        self.peek_at(0)
    }

    /// Returns the token `offset` positions ahead, or the final `Eof`.
    pub(super) fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Advances to the next token; never moves past `Eof`.
    pub(super) fn advance(&mut self) {
        if !self.current().is_eof() {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current().kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().as_keyword() == Some(keyword)
    }

    /// Checks if the current token is the unquoted identifier `word`
    /// (case-insensitive).
    pub(super) fn check_word(&self, word: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<(), QueryParserError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error_expected(&describe(kind)))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), QueryParserError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_expected(&format!("\"{}\"", keyword.as_str())))
        }
    }

    /// Expects and returns a quoted or unquoted identifier.
    pub(super) fn expect_identifier(&mut self) -> Result<String, QueryParserError> {
        let token = self.current();
        if let Some(name) = token.as_identifier() {
            let name = name.to_string();
            self.advance();
            return Ok(name);
        }
        if let Some(keyword) = token.as_keyword() {
            return Err(QueryParserError::at(
                format!(
                    "\"{}\" is a reserved word and must be double-quoted when used as an identifier",
                    keyword.as_str()
                ),
                token.span,
            ));
        }
        Err(self.error_expected("an identifier"))
    }

    pub(super) fn expect_eof(&self) -> Result<(), QueryParserError> {
        if self.current().is_eof() {
            Ok(())
        } else {
            Err(self.error_expected("end of input"))
        }
    }

    /// Builds an error describing the current token against `expected`.
    pub(super) fn error_expected(&self, expected: &str) -> QueryParserError {
        let token = self.current();
        if token.is_eof() {
            QueryParserError::unexpected_eof(expected, token.span)
        } else {
            QueryParserError::unexpected(expected, self.token_text(token.span), token.span)
        }
    }

    fn token_text(&self, span: Span) -> &str {
        self.input.get(span.start..span.end).unwrap_or_default()
    }

    /// True if the tokens after any opening parentheses start a command.
    pub(super) fn command_follows(&self) -> bool {
        let mut offset = 0;
        while self.peek_at(offset).kind == TokenKind::LeftParen {
            offset += 1;
        }
        match &self.peek_at(offset).kind {
            TokenKind::Keyword(Keyword::Select | Keyword::Exec | Keyword::Execute) => true,
            TokenKind::LeftBrace => self.call_escape_at(offset + 1),
            _ => false,
        }
    }

    /// True if the tokens at `offset` continue `{` as `? = call` or `call`.
    fn call_escape_at(&self, offset: usize) -> bool {
        match &self.peek_at(offset).kind {
            TokenKind::Question => true,
            TokenKind::Identifier(word) => word.eq_ignore_ascii_case("call"),
            _ => false,
        }
    }

    /// True at a set operator or a clause that can only continue a query.
    pub(super) fn query_continues(&self) -> bool {
        matches!(
            self.current().as_keyword(),
            Some(
                Keyword::Union
                    | Keyword::Except
                    | Keyword::Intersect
                    | Keyword::Order
                    | Keyword::Limit
                    | Keyword::Option
            )
        )
    }

    /// True at `{` opening a procedure call escape.
    pub(super) fn call_escape_follows(&self) -> bool {
        self.check(&TokenKind::LeftBrace) && self.call_escape_at(1)
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` is exceeded.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, QueryParserError>,
    ) -> Result<T, QueryParserError> {
        self.nested_by(1, f)
    }

    /// Runs `f` one command level deeper.
    pub(super) fn nested_command<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, QueryParserError>,
    ) -> Result<T, QueryParserError> {
        self.nested_by(COMMAND_DEPTH_COST, f)
    }

    /// Runs `f` `cost` nesting levels deeper.
    pub(super) fn nested_by<T>(
        &mut self,
        cost: usize,
        f: impl FnOnce(&mut Self) -> Result<T, QueryParserError>,
    ) -> Result<T, QueryParserError> {
        if self.depth + cost > self.info.max_depth {
            self.depth_exceeded = true;
            return Err(QueryParserError::at(
                format!(
                    "Statement is nested too deeply (maximum depth {})",
                    self.info.max_depth
                ),
                self.current().span,
            ));
        }
        self.depth += cost;
        let result = f(self);
        self.depth -= cost;
        result
    }

    pub(super) const fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            reference_count: self.reference_count,
        }
    }

    pub(super) fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.reference_count = checkpoint.reference_count;
    }

    /// Runs `f`, rewinding the cursor and returning `None` if it fails.
    ///
    /// A depth error is returned as is: no alternative parse can succeed at
    /// the same depth.
    pub(super) fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, QueryParserError>,
    ) -> Result<Option<T>, QueryParserError> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.depth_exceeded => Err(err),
            Err(err) => {
                trace!(error = %err, "backtracking");
                self.restore(checkpoint);
                Ok(None)
            }
        }
    }

    /// Returns the ParseInfo this parser was created with.
    #[must_use]
    pub const fn info(&self) -> &ParseInfo {
        &self.info
    }
}

fn set_query(operation: SetOperation, all: bool, left: Command, right: Command) -> Command {
    Command::SetQuery(SetQuery {
        operation,
        all,
        left: Box::new(left),
        right: Box::new(right),
        order_by: None,
        limit: None,
        option: None,
    })
}

/// Attaches a parsed OPTION clause to the command that owns it.
fn attach_option(
    command: &mut Command,
    option: QueryOption,
    span: Span,
) -> Result<(), QueryParserError> {
    let slot = match command {
        Command::Query(query) => &mut query.option,
        Command::SetQuery(query) => &mut query.option,
        Command::Insert(insert) => &mut insert.option,
        Command::Update(update) => &mut update.option,
        Command::Delete(delete) => &mut delete.option,
        Command::StoredProcedure(procedure) => &mut procedure.option,
        Command::XQuery(xquery) => &mut xquery.option,
        Command::Dynamic(_) | Command::Create(_) | Command::Drop(_) | Command::UpdateProcedure(_) => {
            return Err(QueryParserError::at(
                "OPTION is not allowed on this command",
                span,
            ));
        }
    };
    if slot.is_some() {
        return Err(QueryParserError::at("OPTION is specified twice", span));
    }
    *slot = Some(option);
    Ok(())
}

/// Describes a token kind for "was expecting" messages.
fn describe(kind: &TokenKind) -> String {
    let text = match kind {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Concat => "||",
        TokenKind::Eq => "=",
        TokenKind::NotEq => "<>",
        TokenKind::Lt => "<",
        TokenKind::LtEq => "<=",
        TokenKind::Gt => ">",
        TokenKind::GtEq => ">=",
        TokenKind::LeftParen => "(",
        TokenKind::RightParen => ")",
        TokenKind::LeftBrace => "{",
        TokenKind::RightBrace => "}",
        TokenKind::Comma => ",",
        TokenKind::Semicolon => ";",
        TokenKind::Dot => ".",
        TokenKind::Question => "?",
        TokenKind::Keyword(keyword) => keyword.as_str(),
        TokenKind::Eof => return "end of input".to_string(),
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
            return "an identifier".to_string();
        }
        _ => return "a literal".to_string(),
    };
    format!("\"{text}\"")
}

// --- Entry points ---

/// Resolves absent, empty and blank input to the same error.
fn require_text<'a>(text: impl Into<Option<&'a str>>) -> Result<&'a str, QueryParserError> {
    text.into()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(QueryParserError::empty_input)
}

/// Parses a complete command.
///
/// # Errors
///
/// Returns a `QueryParserError` if `text` is absent, blank or not exactly one
/// valid command.
pub fn parse_command<'a>(
    text: impl Into<Option<&'a str>>,
    info: &ParseInfo,
) -> Result<Command, QueryParserError> {
    let text = require_text(text)?;
    trace!(len = text.len(), "parsing command");

    if super::sniffer::is_xquery(text) {
        let command = parse_xquery(text, info);
        debug!("parsed XQuery passthrough");
        return Ok(command);
    }

    let command = Parser::new(text, info.clone())?.parse_command()?;
    debug!(command_type = %command.command_type(), "parsed command");
    Ok(command)
}

/// Splits a trailing OPTION clause off XQuery text, when one parses.
fn parse_xquery(text: &str, info: &ParseInfo) -> Command {
    let text = text.trim();
    let option = find_last_word(text, "option").and_then(|index| {
        let mut parser = Parser::new(&text[index..], info.clone()).ok()?;
        let option = parser.parse_option().ok()?;
        parser.expect_eof().ok()?;
        Some((index, option))
    });

    match option {
        Some((index, option)) => Command::XQuery(XQuery {
            text: text[..index].trim_end().to_string(),
            option: Some(option),
        }),
        None => Command::XQuery(XQuery {
            text: text.to_string(),
            option: None,
        }),
    }
}

/// Finds the byte index of the last whole-word, case-insensitive `word`.
fn find_last_word(text: &str, word: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    lower.rmatch_indices(word).map(|(index, _)| index).find(|&index| {
        let before = lower[..index].chars().next_back();
        let after = lower[index + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Parses a standalone criteria, such as a HAVING fragment.
///
/// # Errors
///
/// Returns a `QueryParserError` if `text` is not exactly one criteria.
pub fn parse_criteria<'a>(
    text: impl Into<Option<&'a str>>,
    info: &ParseInfo,
) -> Result<crate::ast::Criteria, QueryParserError> {
    let text = require_text(text)?;
    let mut parser = Parser::new(text, info.clone())?;
    let criteria = parser.parse_criteria()?;
    parser.expect_eof()?;
    Ok(criteria)
}

/// Parses a standalone scalar expression.
///
/// # Errors
///
/// Returns a `QueryParserError` if `text` is not exactly one expression.
pub fn parse_expression<'a>(
    text: impl Into<Option<&'a str>>,
    info: &ParseInfo,
) -> Result<Expression, QueryParserError> {
    let text = require_text(text)?;
    let mut parser = Parser::new(text, info.clone())?;
    let expression = parser.parse_expression()?;
    parser.expect_eof()?;
    Ok(expression)
}

/// Parses a single procedure statement.
///
/// # Errors
///
/// Returns a `QueryParserError` if `text` is not exactly one statement.
pub fn parse_statement<'a>(
    text: impl Into<Option<&'a str>>,
    info: &ParseInfo,
) -> Result<crate::ast::Statement, QueryParserError> {
    let text = require_text(text)?;
    let mut parser = Parser::new(text, info.clone())?;
    let statement = parser.parse_statement()?;
    parser.expect_eof()?;
    Ok(statement)
}

/// Parses a `BEGIN ... END` block.
///
/// # Errors
///
/// Returns a `QueryParserError` if `text` is not exactly one block.
pub fn parse_block<'a>(
    text: impl Into<Option<&'a str>>,
    info: &ParseInfo,
) -> Result<crate::ast::Block, QueryParserError> {
    let text = require_text(text)?;
    let mut parser = Parser::new(text, info.clone())?;
    let block = parser.parse_block()?;
    parser.expect_eof()?;
    Ok(block)
}

/// Parses a HAS/TRANSLATE criteria selector, e.g. `= CRITERIA ON (e1)`.
///
/// # Errors
///
/// Returns a `QueryParserError` if `text` is not exactly one selector.
pub fn parse_criteria_selector<'a>(
    text: impl Into<Option<&'a str>>,
    info: &ParseInfo,
) -> Result<crate::ast::CriteriaSelector, QueryParserError> {
    let text = require_text(text)?;
    let mut parser = Parser::new(text, info.clone())?;
    let selector = parser.parse_criteria_selector()?;
    parser.expect_eof()?;
    Ok(selector)
}

/// Reusable parser front-end holding a [`ParseInfo`].
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    info: ParseInfo,
}

impl QueryParser {
    #[must_use]
    pub const fn new(info: ParseInfo) -> Self {
        Self { info }
    }

    #[must_use]
    pub const fn info(&self) -> &ParseInfo {
        &self.info
    }

    /// See [`parse_command`].
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` on invalid input.
    pub fn parse_command<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Result<Command, QueryParserError> {
        parse_command(text, &self.info)
    }

    /// See [`parse_criteria`].
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` on invalid input.
    pub fn parse_criteria<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Result<crate::ast::Criteria, QueryParserError> {
        parse_criteria(text, &self.info)
    }

    /// See [`parse_expression`].
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` on invalid input.
    pub fn parse_expression<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Result<Expression, QueryParserError> {
        parse_expression(text, &self.info)
    }

    /// See [`parse_statement`].
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` on invalid input.
    pub fn parse_statement<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Result<crate::ast::Statement, QueryParserError> {
        parse_statement(text, &self.info)
    }

    /// See [`parse_block`].
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` on invalid input.
    pub fn parse_block<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Result<crate::ast::Block, QueryParserError> {
        parse_block(text, &self.info)
    }

    /// See [`parse_criteria_selector`].
    ///
    /// # Errors
    ///
    /// Returns a `QueryParserError` on invalid input.
    pub fn parse_criteria_selector<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Result<crate::ast::CriteriaSelector, QueryParserError> {
        parse_criteria_selector(text, &self.info)
    }
}
