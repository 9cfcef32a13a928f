//! Rendering of constants and expressions.

use core::fmt;

use chrono::Timelike;

use super::{comma_list, write_dotted, write_ident, write_string};
use crate::ast::{AggregateSymbol, DataType, ElementSymbol, Expression, Function, Value};
use crate::lexer::Keyword;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::String(s) => write_string(f, s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::BigInteger(digits) => f.write_str(digits),
            // Debug output always carries a '.' or an exponent
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Date(d) => write!(f, "{{d'{}'}}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{{t'{}'}}", t.format("%H:%M:%S")),
            Self::Timestamp(ts) => {
                let nanos = format!("{:09}", ts.nanosecond() % 1_000_000_000);
                let fraction = nanos.trim_end_matches('0');
                let fraction = if fraction.is_empty() { "0" } else { fraction };
                write!(f, "{{ts'{}.{fraction}'}}", ts.format("%Y-%m-%d %H:%M:%S"))
            }
        }
    }
}

impl fmt::Display for ElementSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.name)
    }
}

/// Returns the type named by a `cast`/`convert` target, if it is one the
/// parser would have produced.
fn cast_target(arg: &Expression) -> Option<DataType> {
    let Expression::Constant(Value::String(name)) = arg else {
        return None;
    };
    let data_type = DataType::from_keyword(Keyword::from_str(name)?)?;
    (data_type.as_str() == name).then_some(data_type)
}

/// Function names that are reserved words but still parse as calls.
fn is_keyword_function(name: &str) -> bool {
    matches!(
        Keyword::from_str(name),
        Some(Keyword::Left | Keyword::Right | Keyword::Char | Keyword::Insert | Keyword::Translate)
    )
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infix() {
            return write!(f, "({} {} {})", self.args[0], self.name, self.args[1]);
        }

        if let [value, target] = self.args.as_slice() {
            if let Some(data_type) = cast_target(target) {
                match self.name.as_str() {
                    "cast" => return write!(f, "cast({value} AS {data_type})"),
                    "convert" => return write!(f, "convert({value}, {data_type})"),
                    _ => {}
                }
            }
        }

        if is_keyword_function(&self.name) {
            f.write_str(&self.name)?;
        } else {
            write_dotted(f, &self.name)?;
        }
        f.write_str("(")?;
        comma_list(f, &self.args)?;
        f.write_str(")")
    }
}

impl fmt::Display for AggregateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function.as_str())?;
        match &self.arg {
            None => f.write_str("*")?,
            Some(arg) => {
                if self.distinct {
                    f.write_str("DISTINCT ")?;
                }
                write!(f, "{arg}")?;
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Element(element) => write!(f, "{element}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Aggregate(aggregate) => write!(f, "{aggregate}"),
            Self::Case(case) => {
                write!(f, "CASE {}", case.operand)?;
                for (when, then) in case.whens.iter().zip(&case.thens) {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(else_expr) = &case.else_expr {
                    write!(f, " ELSE {else_expr}")?;
                }
                f.write_str(" END")
            }
            Self::SearchedCase(case) => {
                f.write_str("CASE")?;
                for (when, then) in case.whens.iter().zip(&case.thens) {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(else_expr) = &case.else_expr {
                    write!(f, " ELSE {else_expr}")?;
                }
                f.write_str(" END")
            }
            Self::ExpressionSymbol(symbol) => write!(f, "{}", symbol.expression),
            Self::Alias(alias) => {
                write!(f, "{} AS ", alias.symbol)?;
                write_ident(f, &alias.alias)
            }
            Self::All => f.write_str("*"),
            Self::AllInGroup(group) => {
                write_dotted(f, group)?;
                f.write_str(".*")
            }
            Self::Reference(_) => f.write_str("?"),
            Self::ScalarSubquery(command) => write!(f, "({command})"),
        }
    }
}
