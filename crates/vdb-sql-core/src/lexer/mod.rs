//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer producing a token stream with line/column spans,
//! typed JDBC escape literals and `/* optional */` hints.

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::{clip_fragment, LexError, MAX_FRAGMENT_CHARS};
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{tokenize, Lexer};
