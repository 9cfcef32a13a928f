//! Read-only traversal of the AST.
//!
//! A [`Visitor`] receives every node in pre-order through its hooks; the
//! `walk_*` functions drive the traversal. Hooks default to no-ops, so a
//! visitor only implements what it inspects.

use super::{
    AssignmentValue, Block, Command, Criteria, Expression, FromClause, GroupSymbol, InsertSource,
    Statement,
};

/// Hooks called by the `walk_*` functions.
pub trait Visitor {
    fn visit_command(&mut self, _command: &Command) {}
    fn visit_criteria(&mut self, _criteria: &Criteria) {}
    fn visit_expression(&mut self, _expression: &Expression) {}
    fn visit_from_clause(&mut self, _clause: &FromClause) {}
    fn visit_group(&mut self, _group: &GroupSymbol) {}
    fn visit_statement(&mut self, _statement: &Statement) {}

    /// Called before descending into a nested command (subqueries, loop
    /// sources, assignment commands). Returning false skips it.
    fn enter_subquery(&mut self, _command: &Command) -> bool {
        true
    }
}

fn walk_nested<V: Visitor + ?Sized>(visitor: &mut V, command: &Command) {
    if visitor.enter_subquery(command) {
        walk_command(visitor, command);
    }
}

/// Walks a command and everything beneath it.
pub fn walk_command<V: Visitor + ?Sized>(visitor: &mut V, command: &Command) {
    visitor.visit_command(command);
    match command {
        Command::Query(query) => {
            for symbol in &query.select.symbols {
                walk_expression(visitor, symbol);
            }
            if let Some(into) = &query.into {
                visitor.visit_group(into);
            }
            for clause in &query.from {
                walk_from_clause(visitor, clause);
            }
            if let Some(criteria) = &query.criteria {
                walk_criteria(visitor, criteria);
            }
            for expression in &query.group_by {
                walk_expression(visitor, expression);
            }
            if let Some(having) = &query.having {
                walk_criteria(visitor, having);
            }
            if let Some(order_by) = &query.order_by {
                for item in &order_by.items {
                    walk_expression(visitor, &item.expression);
                }
            }
        }
        Command::SetQuery(query) => {
            walk_command(visitor, &query.left);
            walk_command(visitor, &query.right);
            if let Some(order_by) = &query.order_by {
                for item in &order_by.items {
                    walk_expression(visitor, &item.expression);
                }
            }
        }
        Command::Insert(insert) => {
            visitor.visit_group(&insert.group);
            match &insert.source {
                InsertSource::Values(values) => {
                    for value in values {
                        walk_expression(visitor, value);
                    }
                }
                InsertSource::Query(query) => walk_nested(visitor, query),
            }
        }
        Command::Update(update) => {
            visitor.visit_group(&update.group);
            for change in &update.changes {
                walk_expression(visitor, &change.value);
            }
            if let Some(criteria) = &update.criteria {
                walk_criteria(visitor, criteria);
            }
        }
        Command::Delete(delete) => {
            visitor.visit_group(&delete.group);
            if let Some(criteria) = &delete.criteria {
                walk_criteria(visitor, criteria);
            }
        }
        Command::StoredProcedure(procedure) => {
            for value in procedure.parameters.iter().filter_map(|p| p.value.as_ref()) {
                walk_expression(visitor, value);
            }
        }
        Command::Dynamic(dynamic) => {
            walk_expression(visitor, &dynamic.sql);
            if let Some(group) = &dynamic.into_group {
                visitor.visit_group(group);
            }
            for clause in dynamic.using.iter().flatten() {
                walk_expression(visitor, &clause.value);
            }
        }
        Command::Create(create) => visitor.visit_group(&create.table),
        Command::Drop(drop) => visitor.visit_group(&drop.table),
        Command::UpdateProcedure(procedure) => walk_block(visitor, &procedure.block),
        Command::XQuery(_) => {}
    }
}

/// Walks a FROM item.
pub fn walk_from_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &FromClause) {
    visitor.visit_from_clause(clause);
    match clause {
        FromClause::Unary(unary) => visitor.visit_group(&unary.group),
        FromClause::Join(join) => {
            walk_from_clause(visitor, &join.left);
            walk_from_clause(visitor, &join.right);
            for criteria in &join.criteria {
                walk_criteria(visitor, criteria);
            }
        }
        FromClause::Subquery(subquery) => walk_nested(visitor, &subquery.command),
    }
}

/// Walks a criteria tree.
pub fn walk_criteria<V: Visitor + ?Sized>(visitor: &mut V, criteria: &Criteria) {
    visitor.visit_criteria(criteria);
    match criteria {
        Criteria::Compare(compare) => {
            walk_expression(visitor, &compare.left);
            walk_expression(visitor, &compare.right);
        }
        Criteria::Between(between) => {
            walk_expression(visitor, &between.expression);
            walk_expression(visitor, &between.lower);
            walk_expression(visitor, &between.upper);
        }
        Criteria::Match(matcher) => {
            walk_expression(visitor, &matcher.expression);
            walk_expression(visitor, &matcher.pattern);
        }
        Criteria::IsNull(is_null) => walk_expression(visitor, &is_null.expression),
        Criteria::Set(set) => {
            walk_expression(visitor, &set.expression);
            for value in &set.values {
                walk_expression(visitor, value);
            }
        }
        Criteria::SubquerySet(set) => {
            walk_expression(visitor, &set.expression);
            walk_nested(visitor, &set.command);
        }
        Criteria::SubqueryCompare(compare) => {
            walk_expression(visitor, &compare.expression);
            walk_nested(visitor, &compare.command);
        }
        Criteria::Exists(command) => walk_nested(visitor, command),
        Criteria::Compound(compound) => {
            for child in &compound.criteria {
                walk_criteria(visitor, child);
            }
        }
        Criteria::Not(child) => walk_criteria(visitor, child),
        Criteria::Has(_) => {}
        Criteria::Translate(translate) => {
            for child in &translate.translations {
                walk_criteria(visitor, child);
            }
        }
    }
}

/// Walks an expression tree.
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    visitor.visit_expression(expression);
    match expression {
        Expression::Function(function) => {
            for arg in &function.args {
                walk_expression(visitor, arg);
            }
        }
        Expression::Aggregate(aggregate) => {
            if let Some(arg) = &aggregate.arg {
                walk_expression(visitor, arg);
            }
        }
        Expression::Case(case) => {
            walk_expression(visitor, &case.operand);
            for (when, then) in case.whens.iter().zip(&case.thens) {
                walk_expression(visitor, when);
                walk_expression(visitor, then);
            }
            if let Some(else_expr) = &case.else_expr {
                walk_expression(visitor, else_expr);
            }
        }
        Expression::SearchedCase(case) => {
            for (when, then) in case.whens.iter().zip(&case.thens) {
                walk_criteria(visitor, when);
                walk_expression(visitor, then);
            }
            if let Some(else_expr) = &case.else_expr {
                walk_expression(visitor, else_expr);
            }
        }
        Expression::ExpressionSymbol(symbol) => walk_expression(visitor, &symbol.expression),
        Expression::Alias(alias) => walk_expression(visitor, &alias.symbol),
        Expression::ScalarSubquery(command) => walk_nested(visitor, command),
        Expression::Constant(_)
        | Expression::Element(_)
        | Expression::All
        | Expression::AllInGroup(_)
        | Expression::Reference(_) => {}
    }
}

/// Walks every statement of a block.
pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) {
    for statement in &block.statements {
        walk_statement(visitor, statement);
    }
}

/// Walks a procedure statement.
pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    visitor.visit_statement(statement);
    match statement {
        Statement::Declare(declare) => {
            if let Some(value) = &declare.value {
                walk_assignment_value(visitor, value);
            }
        }
        Statement::Assignment(assignment) => walk_assignment_value(visitor, &assignment.value),
        Statement::If(if_statement) => {
            walk_criteria(visitor, &if_statement.condition);
            walk_block(visitor, &if_statement.then_block);
            if let Some(else_block) = &if_statement.else_block {
                walk_block(visitor, else_block);
            }
        }
        Statement::While(while_statement) => {
            walk_criteria(visitor, &while_statement.condition);
            walk_block(visitor, &while_statement.block);
        }
        Statement::Loop(loop_statement) => {
            walk_nested(visitor, &loop_statement.command);
            walk_block(visitor, &loop_statement.block);
        }
        Statement::RaiseError(message) => walk_expression(visitor, message),
        Statement::Command(command) => walk_nested(visitor, command),
        Statement::Break | Statement::Continue => {}
    }
}

fn walk_assignment_value<V: Visitor + ?Sized>(visitor: &mut V, value: &AssignmentValue) {
    match value {
        AssignmentValue::Expression(expression) => walk_expression(visitor, expression),
        AssignmentValue::Command(command) => walk_nested(visitor, command),
    }
}

/// Collects the distinct group names a command references, in first-seen
/// order, including those of nested commands.
#[must_use]
pub fn collect_groups(command: &Command) -> Vec<String> {
    struct Groups(Vec<String>);

    impl Visitor for Groups {
        fn visit_group(&mut self, group: &GroupSymbol) {
            if !self.0.contains(&group.name) {
                self.0.push(group.name.clone());
            }
        }
    }

    let mut groups = Groups(Vec::new());
    walk_command(&mut groups, command);
    groups.0
}

/// Returns true if the expression contains an aggregate outside of any
/// nested subquery.
#[must_use]
pub fn contains_aggregate(expression: &Expression) -> bool {
    struct Aggregates(bool);

    impl Visitor for Aggregates {
        fn visit_expression(&mut self, expression: &Expression) {
            if matches!(expression, Expression::Aggregate(_)) {
                self.0 = true;
            }
        }

        fn enter_subquery(&mut self, _command: &Command) -> bool {
            false
        }
    }

    let mut found = Aggregates(false);
    walk_expression(&mut found, expression);
    found.0
}
