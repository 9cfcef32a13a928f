//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Every entry point takes the text as `impl Into<Option<&str>>`, so absent
//! and blank input fail the same way.

mod criteria;
mod error;
mod expression;
mod from;
mod info;
mod parser;
mod pratt;
mod procedure;
mod sniffer;

pub use error::QueryParserError;
pub use info::{ParseInfo, COMMAND_DEPTH_COST, DEFAULT_MAX_DEPTH};
pub use parser::{
    parse_block, parse_command, parse_criteria, parse_criteria_selector, parse_expression,
    parse_statement, Parser, QueryParser,
};
pub use sniffer::get_command_type;
