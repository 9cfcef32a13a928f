//! # vdb-sql-core
//!
//! Parser and canonical unparser for the SQL dialect of a data-virtualization
//! engine.
//!
//! This crate provides:
//! - A hand-written lexer and recursive descent parser with Pratt expression
//!   parsing, covering queries, set operations, DML, stored procedure calls,
//!   dynamic SQL, temporary tables and the virtual procedure language
//! - A typed AST with structural equality and serde support
//! - A canonical unparser: `parse(unparse(ast)) == ast`
//! - A lexical command-type sniffer that never fails
//!
//! ## Parsing and rendering
//!
//! ```rust
//! use vdb_sql_core::{parse_command, to_canonical_string, ParseInfo};
//!
//! let info = ParseInfo::default();
//! let command = parse_command("select 1 + 2 * 3 from pm1.g1", &info).unwrap();
//! assert_eq!(
//!     to_canonical_string(&command),
//!     "SELECT (1 + (2 * 3)) FROM pm1.g1"
//! );
//! ```
//!
//! ## Command classification
//!
//! ```rust
//! use vdb_sql_core::{get_command_type, ast::CommandType};
//!
//! assert_eq!(get_command_type("EXEC proc1(1)"), CommandType::StoredProcedure);
//! assert_eq!(get_command_type(None), CommandType::Unknown);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod unparse;

pub use ast::{Block, Command, CommandType, Criteria, Expression, Statement};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::{
    get_command_type, parse_block, parse_command, parse_criteria, parse_criteria_selector,
    parse_expression, parse_statement, ParseInfo, Parser, QueryParser, QueryParserError,
};
pub use unparse::{to_canonical_string, AstNode};
