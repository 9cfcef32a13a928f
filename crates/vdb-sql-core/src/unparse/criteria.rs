//! Rendering of criteria and criteria selectors.

use core::fmt;

use super::{comma_list, write_string};
use crate::ast::{CompareOperator, Criteria, CriteriaSelector, Quantifier, SelectorType};

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes a criteria that sits inside a compound, parenthesizing nested
/// compounds.
pub(crate) fn write_nested(f: &mut fmt::Formatter<'_>, criteria: &Criteria) -> fmt::Result {
    if matches!(criteria, Criteria::Compound(_)) {
        write!(f, "({criteria})")
    } else {
        write!(f, "{criteria}")
    }
}

fn not(negated: bool) -> &'static str {
    if negated { "NOT " } else { "" }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare(c) => write!(f, "{} {} {}", c.left, c.operator, c.right),
            Self::Between(c) => write!(
                f,
                "{} {}BETWEEN {} AND {}",
                c.expression,
                not(c.negated),
                c.lower,
                c.upper
            ),
            Self::Match(c) => {
                write!(f, "{} {}LIKE {}", c.expression, not(c.negated), c.pattern)?;
                if let Some(escape) = c.escape {
                    f.write_str(" ESCAPE ")?;
                    write_string(f, &escape.to_string())?;
                }
                Ok(())
            }
            Self::IsNull(c) => write!(f, "{} IS {}NULL", c.expression, not(c.negated)),
            Self::Set(c) => {
                write!(f, "{} {}IN (", c.expression, not(c.negated))?;
                comma_list(f, &c.values)?;
                f.write_str(")")
            }
            Self::SubquerySet(c) => {
                write!(f, "{} {}IN ({})", c.expression, not(c.negated), c.command)
            }
            Self::SubqueryCompare(c) => write!(
                f,
                "{} {} {} ({})",
                c.expression, c.operator, c.quantifier, c.command
            ),
            Self::Exists(command) => write!(f, "EXISTS ({command})"),
            Self::Compound(compound) => {
                for (i, child) in compound.criteria.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", compound.operator.as_str())?;
                    }
                    write_nested(f, child)?;
                }
                Ok(())
            }
            Self::Not(inner) => write!(f, "NOT ({inner})"),
            Self::Has(has) => write!(f, "HAS {}", has.selector),
            Self::Translate(translate) => {
                write!(f, "TRANSLATE {}", translate.selector)?;
                if !translate.translations.is_empty() {
                    f.write_str(" WITH (")?;
                    comma_list(f, &translate.translations)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for CriteriaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selector_type != SelectorType::Any {
            write!(f, "{} ", self.selector_type.as_str())?;
        }
        f.write_str("CRITERIA")?;
        if !self.elements.is_empty() {
            f.write_str(" ON (")?;
            comma_list(f, &self.elements)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        BetweenCriteria, CompareOperator, Criteria, CriteriaSelector, ElementSymbol, Expression,
        HasCriteria, IsNullCriteria, MatchCriteria, SelectorType, SetCriteria,
    };

    fn crit(name: &str, value: i32) -> Criteria {
        Criteria::eq(Expression::element(name), Expression::integer(value))
    }

    #[test]
    fn test_compound_nesting() {
        let c = Criteria::or(vec![
            crit("a", 1),
            Criteria::and(vec![crit("b", 2), crit("c", 3)]),
        ]);
        assert_eq!(c.to_string(), "a = 1 OR (b = 2 AND c = 3)");
    }

    #[test]
    fn test_not_parenthesizes() {
        assert_eq!(crit("a", 1).negate().to_string(), "NOT (a = 1)");
    }

    #[test]
    fn test_predicates() {
        let between = Criteria::Between(BetweenCriteria {
            expression: Expression::element("a"),
            lower: Expression::integer(1),
            upper: Expression::integer(2),
            negated: true,
        });
        assert_eq!(between.to_string(), "a NOT BETWEEN 1 AND 2");

        let like = Criteria::Match(MatchCriteria {
            expression: Expression::element("a"),
            pattern: Expression::string("x%"),
            escape: Some('\''),
            negated: false,
        });
        assert_eq!(like.to_string(), "a LIKE 'x%' ESCAPE ''''");

        let is_null = Criteria::IsNull(IsNullCriteria {
            expression: Expression::element("a"),
            negated: true,
        });
        assert_eq!(is_null.to_string(), "a IS NOT NULL");

        let set = Criteria::Set(SetCriteria {
            expression: Expression::element("a"),
            values: vec![Expression::integer(1), Expression::integer(2)],
            negated: false,
        });
        assert_eq!(set.to_string(), "a IN (1, 2)");

        let compare = Criteria::compare(
            Expression::element("a"),
            CompareOperator::Ne,
            Expression::string("x"),
        );
        assert_eq!(compare.to_string(), "a <> 'x'");
    }

    #[test]
    fn test_selectors() {
        assert_eq!(CriteriaSelector::default().to_string(), "CRITERIA");
        let has = Criteria::Has(HasCriteria {
            selector: CriteriaSelector {
                selector_type: SelectorType::IsNull,
                elements: vec![ElementSymbol::new("e1"), ElementSymbol::new("e2")],
            },
        });
        assert_eq!(has.to_string(), "HAS IS NULL CRITERIA ON (e1, e2)");
    }
}
