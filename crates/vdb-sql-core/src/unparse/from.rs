//! Rendering of FROM items.

use core::fmt;

use super::criteria::write_nested;
use super::write_ident;
use crate::ast::{FromClause, FromHints, JoinPredicate};

fn write_optional(f: &mut fmt::Formatter<'_>, hints: FromHints) -> fmt::Result {
    if hints.optional {
        f.write_str("/* optional */ ")?;
    }
    Ok(())
}

fn write_dependent(f: &mut fmt::Formatter<'_>, hints: FromHints) -> fmt::Result {
    if hints.make_dep {
        f.write_str(" MAKEDEP")?;
    }
    if hints.make_not_dep {
        f.write_str(" MAKENOTDEP")?;
    }
    Ok(())
}

/// Writes a join operand; unhinted nested joins need parentheses.
fn write_operand(f: &mut fmt::Formatter<'_>, clause: &FromClause) -> fmt::Result {
    match clause {
        FromClause::Join(join) if !join.hints.any() => write!(f, "({clause})"),
        _ => write!(f, "{clause}"),
    }
}

fn write_join_body(f: &mut fmt::Formatter<'_>, join: &JoinPredicate) -> fmt::Result {
    write_operand(f, &join.left)?;
    write!(f, " {} ", join.join_type.as_str())?;
    write_operand(f, &join.right)?;
    for (i, criteria) in join.criteria.iter().enumerate() {
        f.write_str(if i == 0 { " ON " } else { " AND " })?;
        write_nested(f, criteria)?;
    }
    Ok(())
}

impl fmt::Display for FromClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(unary) => {
                write_optional(f, unary.hints)?;
                write!(f, "{}", unary.group)?;
                if let Some(alias) = &unary.alias {
                    f.write_str(" AS ")?;
                    write_ident(f, alias)?;
                }
                write_dependent(f, unary.hints)
            }
            Self::Subquery(subquery) => {
                write_optional(f, subquery.hints)?;
                write!(f, "({}) AS ", subquery.command)?;
                write_ident(f, &subquery.alias)?;
                write_dependent(f, subquery.hints)
            }
            Self::Join(join) if join.hints.any() => {
                write_optional(f, join.hints)?;
                f.write_str("(")?;
                write_join_body(f, join)?;
                f.write_str(")")?;
                write_dependent(f, join.hints)
            }
            Self::Join(join) => write_join_body(f, join),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Criteria, Expression, FromClause, JoinType};

    fn on(left: &str, right: &str) -> Criteria {
        Criteria::eq(Expression::element(left), Expression::element(right))
    }

    #[test]
    fn test_nested_joins_parenthesized() {
        let left = FromClause::group("a").join(JoinType::Cross, FromClause::group("b"), vec![]);
        let join = left.join(
            JoinType::LeftOuter,
            FromClause::aliased("c", "x"),
            vec![on("a.e", "x.e"), Criteria::or(vec![on("b.e", "x.e"), on("b.f", "x.f")])],
        );
        assert_eq!(
            join.to_string(),
            "(a CROSS JOIN b) LEFT OUTER JOIN c AS x ON a.e = x.e AND (b.e = x.e OR b.f = x.f)"
        );
    }

    #[test]
    fn test_hinted_join_renders_own_parentheses() {
        let mut join = FromClause::group("a").join(JoinType::Cross, FromClause::group("b"), vec![]);
        join.hints_mut().optional = true;
        join.hints_mut().make_dep = true;
        let outer = FromClause::group("c").join(JoinType::Cross, join, vec![]);
        assert_eq!(
            outer.to_string(),
            "c CROSS JOIN /* optional */ (a CROSS JOIN b) MAKEDEP"
        );
    }

    #[test]
    fn test_unary_hints() {
        let mut clause = FromClause::aliased("pm1.g1", "Y");
        clause.hints_mut().optional = true;
        clause.hints_mut().make_not_dep = true;
        assert_eq!(clause.to_string(), "/* optional */ pm1.g1 AS Y MAKENOTDEP");
    }
}
