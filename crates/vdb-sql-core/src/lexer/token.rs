//! Token types for the SQL lexer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::Span;

macro_rules! keywords {
    ($($(#[$group:meta])* $variant:ident => $text:literal,)*) => {
        /// Reserved words of the dialect.
        ///
        /// Every keyword is reserved: an identifier spelled like one of these
        /// must be double-quoted.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($(#[$group])* $variant,)*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the canonical (uppercase) spelling of the keyword.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    // Query clauses
    Select => "SELECT",
    From => "FROM",
    Where => "WHERE",
    Group => "GROUP",
    By => "BY",
    Having => "HAVING",
    Order => "ORDER",
    Limit => "LIMIT",
    Distinct => "DISTINCT",
    All => "ALL",
    As => "AS",
    Into => "INTO",

    // Joins and set operations
    Join => "JOIN",
    Inner => "INNER",
    Left => "LEFT",
    Right => "RIGHT",
    Full => "FULL",
    Outer => "OUTER",
    Cross => "CROSS",
    On => "ON",
    Union => "UNION",
    Intersect => "INTERSECT",
    Except => "EXCEPT",

    // Data manipulation
    Insert => "INSERT",
    Values => "VALUES",
    Update => "UPDATE",
    Set => "SET",
    Delete => "DELETE",

    // Definition and execution
    Create => "CREATE",
    Drop => "DROP",
    Local => "LOCAL",
    Temporary => "TEMPORARY",
    Table => "TABLE",
    Virtual => "VIRTUAL",
    Procedure => "PROCEDURE",
    Exec => "EXEC",
    Execute => "EXECUTE",
    Using => "USING",

    // Predicates
    And => "AND",
    Or => "OR",
    Not => "NOT",
    In => "IN",
    Between => "BETWEEN",
    Like => "LIKE",
    Escape => "ESCAPE",
    Is => "IS",
    Null => "NULL",
    True => "TRUE",
    False => "FALSE",
    Exists => "EXISTS",
    Any => "ANY",
    Some => "SOME",

    // Ordering
    Asc => "ASC",
    Desc => "DESC",

    // Aggregates
    Count => "COUNT",
    Sum => "SUM",
    Avg => "AVG",
    Min => "MIN",
    Max => "MAX",

    // Expressions
    Case => "CASE",
    When => "WHEN",
    Then => "THEN",
    Else => "ELSE",
    End => "END",
    Cast => "CAST",
    Convert => "CONVERT",

    // Procedure language
    Begin => "BEGIN",
    Declare => "DECLARE",
    If => "IF",
    While => "WHILE",
    Loop => "LOOP",
    Break => "BREAK",
    Continue => "CONTINUE",
    Error => "ERROR",
    Has => "HAS",
    Criteria => "CRITERIA",
    Translate => "TRANSLATE",
    With => "WITH",

    // Option clause
    Option => "OPTION",
    Showplan => "SHOWPLAN",
    Planonly => "PLANONLY",
    Debug => "DEBUG",
    Nocache => "NOCACHE",
    Makedep => "MAKEDEP",
    Makenotdep => "MAKENOTDEP",

    // Type names
    String => "STRING",
    Char => "CHAR",
    Boolean => "BOOLEAN",
    Byte => "BYTE",
    Short => "SHORT",
    Integer => "INTEGER",
    Long => "LONG",
    BigInteger => "BIGINTEGER",
    Float => "FLOAT",
    Double => "DOUBLE",
    BigDecimal => "BIGDECIMAL",
    Date => "DATE",
    Time => "TIME",
    Timestamp => "TIMESTAMP",
    Object => "OBJECT",
    Blob => "BLOB",
    Clob => "CLOB",
    Xml => "XML",
}

impl Keyword {
    /// Returns true if `s` spells a reserved word (case-insensitive).
    #[must_use]
    pub fn is_reserved(s: &str) -> bool {
        Self::from_str(s).is_some()
    }

    /// Returns true for the five aggregate function names.
    #[must_use]
    pub const fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Self::Count | Self::Sum | Self::Avg | Self::Min | Self::Max
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal that fits in 32 bits (e.g., 42)
    Integer(i32),
    /// Integer literal that fits in 64 bits
    Long(i64),
    /// Integer literal beyond 64 bits, as normalized decimal digits
    BigInteger(String),
    /// Floating point literal (e.g., 3.14, 1e10)
    Float(f64),
    /// String literal (e.g., 'hello')
    String(String),
    /// `{d'2002-10-02'}`
    Date(NaiveDate),
    /// `{t'11:10:00'}`
    Time(NaiveTime),
    /// `{ts'2002-10-02 11:10:00.1'}`
    Timestamp(NaiveDateTime),
    /// `{b'true'}`
    Boolean(bool),

    // Identifiers and keywords
    /// Unquoted identifier, original casing preserved
    Identifier(String),
    /// Double-quoted identifier, with `""` unescaped
    QuotedIdentifier(String),
    /// Reserved word
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// ||
    Concat,
    /// =
    Eq,
    /// <> or !=
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// ?
    Question,

    // Special
    /// End of input
    Eof,
}

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source text.
    pub span: Span,
    /// Set when the token was immediately preceded by a `/* optional */` comment.
    pub optional_hint: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            optional_hint: false,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the identifier text if this is a quoted or unquoted identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => Some(name),
            _ => None,
        }
    }
}
