//! Criteria (boolean predicate) AST types.

use serde::{Deserialize, Serialize};

use super::{Command, ElementSymbol, Expression};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Quantifier of a subquery comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    Any,
    Some,
    All,
}

impl Quantifier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Some => "SOME",
            Self::All => "ALL",
        }
    }
}

/// Connective of a compound criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareCriteria {
    pub left: Expression,
    pub operator: CompareOperator,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetweenCriteria {
    pub expression: Expression,
    pub lower: Expression,
    pub upper: Expression,
    pub negated: bool,
}

/// `expr [NOT] LIKE pattern [ESCAPE 'c']`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    pub expression: Expression,
    pub pattern: Expression,
    pub escape: Option<char>,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNullCriteria {
    pub expression: Expression,
    pub negated: bool,
}

/// `expr [NOT] IN (v1, v2, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetCriteria {
    pub expression: Expression,
    pub values: Vec<Expression>,
    pub negated: bool,
}

/// `expr [NOT] IN (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubquerySetCriteria {
    pub expression: Expression,
    pub command: Box<Command>,
    pub negated: bool,
}

/// `expr op {ANY|SOME|ALL} (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryCompareCriteria {
    pub expression: Expression,
    pub operator: CompareOperator,
    pub quantifier: Quantifier,
    pub command: Box<Command>,
}

/// A flat AND/OR list of at least two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundCriteria {
    pub operator: LogicalOperator,
    pub criteria: Vec<Criteria>,
}

/// The predicate shape a virtual procedure asks about in HAS / TRANSLATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorType {
    IsNull,
    CompareEq,
    CompareNe,
    CompareLt,
    CompareLe,
    CompareGt,
    CompareGe,
    Like,
    In,
    Between,
    /// No selector written: any predicate shape.
    Any,
}

impl SelectorType {
    /// Returns the selector as written before `CRITERIA`; empty for `Any`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IsNull => "IS NULL",
            Self::CompareEq => "=",
            Self::CompareNe => "<>",
            Self::CompareLt => "<",
            Self::CompareLe => "<=",
            Self::CompareGt => ">",
            Self::CompareGe => ">=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Any => "",
        }
    }
}

/// `[selector] CRITERIA [ON (e1, e2, ...)]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaSelector {
    pub selector_type: SelectorType,
    pub elements: Vec<ElementSymbol>,
}

impl Default for CriteriaSelector {
    fn default() -> Self {
        Self {
            selector_type: SelectorType::Any,
            elements: vec![],
        }
    }
}

/// `HAS selector`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasCriteria {
    pub selector: CriteriaSelector,
}

/// `TRANSLATE selector [WITH (c1, c2, ...)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateCriteria {
    pub selector: CriteriaSelector,
    pub translations: Vec<Criteria>,
}

/// Boolean predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criteria {
    Compare(CompareCriteria),
    Between(BetweenCriteria),
    Match(MatchCriteria),
    IsNull(IsNullCriteria),
    Set(SetCriteria),
    SubquerySet(SubquerySetCriteria),
    SubqueryCompare(SubqueryCompareCriteria),
    Exists(Box<Command>),
    Compound(CompoundCriteria),
    Not(Box<Criteria>),
    Has(HasCriteria),
    Translate(TranslateCriteria),
}

impl Criteria {
    /// Creates a comparison.
    #[must_use]
    pub const fn compare(left: Expression, operator: CompareOperator, right: Expression) -> Self {
        Self::Compare(CompareCriteria {
            left,
            operator,
            right,
        })
    }

    /// Creates `left = right`.
    #[must_use]
    pub const fn eq(left: Expression, right: Expression) -> Self {
        Self::compare(left, CompareOperator::Eq, right)
    }

    /// Combines criteria with AND, flattening nested ANDs. A single child is
    /// returned as is.
    #[must_use]
    pub fn and(criteria: Vec<Self>) -> Self {
        Self::combine(LogicalOperator::And, criteria)
    }

    /// Combines criteria with OR, flattening nested ORs. A single child is
    /// returned as is.
    #[must_use]
    pub fn or(criteria: Vec<Self>) -> Self {
        Self::combine(LogicalOperator::Or, criteria)
    }

    fn combine(operator: LogicalOperator, criteria: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(criteria.len());
        for child in criteria {
            match child {
                Self::Compound(compound) if compound.operator == operator => {
                    flat.extend(compound.criteria);
                }
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        Self::Compound(CompoundCriteria {
            operator,
            criteria: flat,
        })
    }

    /// Wraps the criteria in NOT.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Splits a top-level AND into its conjuncts.
    #[must_use]
    pub fn into_conjuncts(self) -> Vec<Self> {
        match self {
            Self::Compound(compound) if compound.operator == LogicalOperator::And => {
                compound.criteria
            }
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crit(name: &str) -> Criteria {
        Criteria::eq(Expression::element(name), Expression::integer(1))
    }

    #[test]
    fn test_and_flattens() {
        let nested = Criteria::and(vec![crit("a"), crit("b")]);
        let flat = Criteria::and(vec![nested, crit("c")]);
        let Criteria::Compound(compound) = flat else {
            panic!("Expected compound");
        };
        assert_eq!(compound.criteria.len(), 3);
    }

    #[test]
    fn test_and_does_not_flatten_or() {
        let or = Criteria::or(vec![crit("a"), crit("b")]);
        let Criteria::Compound(compound) = Criteria::and(vec![or, crit("c")]) else {
            panic!("Expected compound");
        };
        assert_eq!(compound.criteria.len(), 2);
    }

    #[test]
    fn test_single_child_unwraps() {
        assert_eq!(Criteria::and(vec![crit("a")]), crit("a"));
    }

    #[test]
    fn test_into_conjuncts() {
        let and = Criteria::and(vec![crit("a"), crit("b")]);
        assert_eq!(and.into_conjuncts().len(), 2);
        assert_eq!(crit("a").into_conjuncts(), vec![crit("a")]);
    }

    #[test]
    fn test_selector_default_is_any() {
        assert_eq!(CriteriaSelector::default().selector_type, SelectorType::Any);
        assert_eq!(SelectorType::IsNull.as_str(), "IS NULL");
    }
}
