//! Rendering of commands and their clauses.

use core::fmt;

use super::{comma_list, write_dotted, write_dotted_list, write_ident};
use crate::ast::{
    ColumnDefinition, Command, InsertSource, Limit, OrderBy, OrderByItem, ParameterDirection,
    Query, QueryOption, SetClause, SetQuery, SpParameter, StoredProcedure, UpdateCount,
};

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)?;
        if !self.ascending {
            f.write_str(" DESC")?;
        }
        Ok(())
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ORDER BY ")?;
        comma_list(f, &self.items)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LIMIT ")?;
        if let Some(offset) = &self.offset {
            write!(f, "{offset}, ")?;
        }
        write!(f, "{}", self.row_limit)
    }
}

impl fmt::Display for QueryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OPTION")?;
        if self.show_plan {
            f.write_str(" SHOWPLAN")?;
        }
        if self.plan_only {
            f.write_str(" PLANONLY")?;
        }
        if self.debug {
            f.write_str(" DEBUG")?;
        }
        if !self.make_dep_groups.is_empty() {
            f.write_str(" MAKEDEP ")?;
            write_dotted_list(f, &self.make_dep_groups)?;
        }
        if !self.make_not_dep_groups.is_empty() {
            f.write_str(" MAKENOTDEP ")?;
            write_dotted_list(f, &self.make_not_dep_groups)?;
        }
        if self.no_cache || !self.no_cache_groups.is_empty() {
            f.write_str(" NOCACHE")?;
            if !self.no_cache_groups.is_empty() {
                f.write_str(" ")?;
                write_dotted_list(f, &self.no_cache_groups)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SetClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.symbol, self.value)
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.name)?;
        write!(f, " {}", self.data_type)
    }
}

/// Writes the ORDER BY, LIMIT and OPTION clauses shared by queries and set
/// queries.
fn write_tail(
    f: &mut fmt::Formatter<'_>,
    order_by: Option<&OrderBy>,
    limit: Option<&Limit>,
    option: Option<&QueryOption>,
) -> fmt::Result {
    if let Some(order_by) = order_by {
        write!(f, " {order_by}")?;
    }
    if let Some(limit) = limit {
        write!(f, " {limit}")?;
    }
    write_option(f, option)
}

fn write_option(f: &mut fmt::Formatter<'_>, option: Option<&QueryOption>) -> fmt::Result {
    match option {
        Some(option) => write!(f, " {option}"),
        None => Ok(()),
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.select.distinct {
            f.write_str("DISTINCT ")?;
        }
        comma_list(f, &self.select.symbols)?;
        if let Some(into) = &self.into {
            write!(f, " INTO {into}")?;
        }
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(criteria) = &self.criteria {
            write!(f, " WHERE {criteria}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            comma_list(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        write_tail(
            f,
            self.order_by.as_ref(),
            self.limit.as_ref(),
            self.option.as_ref(),
        )
    }
}

/// Writes a set operation operand, parenthesized when its own clauses
/// would otherwise bind to the enclosing set query.
fn write_set_operand(f: &mut fmt::Formatter<'_>, command: &Command) -> fmt::Result {
    let needs_parens = match command {
        Command::SetQuery(_) => true,
        Command::Query(query) => {
            query.order_by.is_some() || query.limit.is_some() || query.option.is_some()
        }
        _ => false,
    };
    if needs_parens {
        write!(f, "({command})")
    } else {
        write!(f, "{command}")
    }
}

impl fmt::Display for SetQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_set_operand(f, &self.left)?;
        write!(f, " {} ", self.operation.as_str())?;
        if self.all {
            f.write_str("ALL ")?;
        }
        write_set_operand(f, &self.right)?;
        write_tail(
            f,
            self.order_by.as_ref(),
            self.limit.as_ref(),
            self.option.as_ref(),
        )
    }
}

impl fmt::Display for SpParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write_ident(f, name)?;
            f.write_str(" = ")?;
        }
        match &self.value {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for StoredProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arguments: Vec<&SpParameter> = self
            .parameters
            .iter()
            .filter(|p| p.direction != ParameterDirection::Return && p.value.is_some())
            .collect();

        let has_return = self.has_return_parameter();
        if has_return {
            f.write_str("{? = call ")?;
        } else {
            f.write_str("EXEC ")?;
        }
        write_dotted(f, &self.name)?;
        f.write_str("(")?;
        comma_list(f, &arguments)?;
        f.write_str(")")?;
        if has_return {
            f.write_str("}")?;
        }
        write_option(f, self.option.as_ref())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(query) => write!(f, "{query}"),
            Self::SetQuery(query) => write!(f, "{query}"),
            Self::Insert(insert) => {
                write!(f, "INSERT INTO {}", insert.group)?;
                if !insert.variables.is_empty() {
                    f.write_str(" (")?;
                    comma_list(f, &insert.variables)?;
                    f.write_str(")")?;
                }
                match &insert.source {
                    InsertSource::Values(values) => {
                        f.write_str(" VALUES (")?;
                        comma_list(f, values)?;
                        f.write_str(")")?;
                    }
                    InsertSource::Query(query) => write!(f, " {query}")?,
                }
                write_option(f, insert.option.as_ref())
            }
            Self::Update(update) => {
                write!(f, "UPDATE {} SET ", update.group)?;
                comma_list(f, &update.changes)?;
                if let Some(criteria) = &update.criteria {
                    write!(f, " WHERE {criteria}")?;
                }
                write_option(f, update.option.as_ref())
            }
            Self::Delete(delete) => {
                write!(f, "DELETE FROM {}", delete.group)?;
                if let Some(criteria) = &delete.criteria {
                    write!(f, " WHERE {criteria}")?;
                }
                write_option(f, delete.option.as_ref())
            }
            Self::StoredProcedure(procedure) => write!(f, "{procedure}"),
            Self::Dynamic(dynamic) => {
                write!(f, "EXECUTE STRING {}", dynamic.sql)?;
                if let Some(columns) = &dynamic.as_columns {
                    f.write_str(" AS ")?;
                    comma_list(f, columns)?;
                }
                if let Some(group) = &dynamic.into_group {
                    write!(f, " INTO {group}")?;
                }
                if let Some(using) = &dynamic.using {
                    f.write_str(" USING ")?;
                    comma_list(f, using)?;
                }
                match dynamic.update_count {
                    Some(UpdateCount::Count(n)) => write!(f, " UPDATE {n}"),
                    Some(UpdateCount::Any) => f.write_str(" UPDATE *"),
                    None => Ok(()),
                }
            }
            Self::Create(create) => {
                write!(f, "CREATE LOCAL TEMPORARY TABLE {} (", create.table)?;
                comma_list(f, &create.columns)?;
                f.write_str(")")
            }
            Self::Drop(drop) => write!(f, "DROP TABLE {}", drop.table),
            Self::UpdateProcedure(procedure) => {
                if procedure.update_procedure {
                    f.write_str("CREATE PROCEDURE\n")?;
                } else {
                    f.write_str("CREATE VIRTUAL PROCEDURE\n")?;
                }
                write!(f, "{}", procedure.block)
            }
            Self::XQuery(xquery) => {
                f.write_str(&xquery.text)?;
                write_option(f, xquery.option.as_ref())
            }
        }
    }
}
