//! Data type names and typed constant values.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::lexer::Keyword;

/// Runtime types named by DECLARE, CREATE, CAST/CONVERT and `EXECUTE ... AS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Char,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    Date,
    Time,
    Timestamp,
    Object,
    Blob,
    Clob,
    Xml,
    /// Type of the `NULL` literal; never written in source.
    Null,
}

impl DataType {
    /// Returns the lowercase name used in canonical output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Char => "char",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::BigInteger => "biginteger",
            Self::Float => "float",
            Self::Double => "double",
            Self::BigDecimal => "bigdecimal",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Object => "object",
            Self::Blob => "blob",
            Self::Clob => "clob",
            Self::Xml => "xml",
            Self::Null => "null",
        }
    }

    /// Maps a type-name keyword to its data type.
    #[must_use]
    pub const fn from_keyword(keyword: Keyword) -> Option<Self> {
        Some(match keyword {
            Keyword::String => Self::String,
            Keyword::Char => Self::Char,
            Keyword::Boolean => Self::Boolean,
            Keyword::Byte => Self::Byte,
            Keyword::Short => Self::Short,
            Keyword::Integer => Self::Integer,
            Keyword::Long => Self::Long,
            Keyword::BigInteger => Self::BigInteger,
            Keyword::Float => Self::Float,
            Keyword::Double => Self::Double,
            Keyword::BigDecimal => Self::BigDecimal,
            Keyword::Date => Self::Date,
            Keyword::Time => Self::Time,
            Keyword::Timestamp => Self::Timestamp,
            Keyword::Object => Self::Object,
            Keyword::Blob => Self::Blob,
            Keyword::Clob => Self::Clob,
            Keyword::Xml => Self::Xml,
            _ => return None,
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a `Constant` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    String(String),
    Integer(i32),
    Long(i64),
    /// Integer beyond 64 bits, as decimal digits with an optional leading `-`.
    BigInteger(String),
    Double(f64),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns the type of the constant.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::String(_) => DataType::String,
            Self::Integer(_) => DataType::Integer,
            Self::Long(_) => DataType::Long,
            Self::BigInteger(_) => DataType::BigInteger,
            Self::Double(_) => DataType::Double,
            Self::Boolean(_) => DataType::Boolean,
            Self::Date(_) => DataType::Date,
            Self::Time(_) => DataType::Time,
            Self::Timestamp(_) => DataType::Timestamp,
        }
    }

    /// Returns true for the numeric variants.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Long(_) | Self::BigInteger(_) | Self::Double(_)
        )
    }
}

/// A `name type` pair, as in `CREATE LOCAL TEMPORARY TABLE` and `EXECUTE ... AS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDefinition {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_names_match_keywords() {
        for keyword in Keyword::ALL {
            if let Some(data_type) = DataType::from_keyword(*keyword) {
                assert_eq!(data_type.as_str(), keyword.as_str().to_ascii_lowercase());
            }
        }
        assert_eq!(DataType::from_keyword(Keyword::Select), None);
    }

    #[test]
    fn test_value_data_type() {
        assert_eq!(Value::Integer(1).data_type(), DataType::Integer);
        assert_eq!(Value::Null.data_type(), DataType::Null);
        assert_eq!(
            Value::BigInteger("123456789012345678901".into()).data_type(),
            DataType::BigInteger
        );
        assert!(Value::Double(1.5).is_numeric());
        assert!(!Value::String("1".into()).is_numeric());
    }
}
