//! SQL tokenizer implementation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::{clip_fragment, LexError};
use super::{Keyword, Span, Token, TokenKind};

/// A saved lexer position, used to back out of speculative scans.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: u32,
    column: u32,
}

/// A lexer that tokenizes SQL input.
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// Current 1-based line.
    line: u32,
    /// Current 1-based column.
    column: u32,
    /// Where the current token starts.
    start: Mark,
    /// A `/* optional */` comment was seen since the last token.
    pending_hint: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            start: Mark {
                pos: 0,
                line: 1,
                column: 1,
            },
            pending_hint: false,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    const fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
        self.column = mark.column;
    }

    fn skip_blanks(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Skips whitespace and comments, recording `/* optional */` hints.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            self.skip_blanks();

            // Single-line comments (-- ...)
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // Multi-line comments (/* ... */)
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let open = self.mark();
                self.advance();
                self.advance();
                let content_start = self.pos;
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            let content = &self.input[content_start..self.pos - 1];
                            if is_optional_hint(content) {
                                self.pending_hint = true;
                            }
                            self.advance();
                            break;
                        }
                        None => {
                            return Err(LexError::UnterminatedComment {
                                line: open.line,
                                column: open.column,
                            });
                        }
                        _ => {}
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Creates a span from the token start to the current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start.pos, self.pos, self.start.line, self.start.column)
    }

    /// Creates a token with the current span, consuming any pending hint.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        let mut token = Token::new(kind, self.make_span());
        token.optional_hint = std::mem::take(&mut self.pending_hint);
        token
    }

    /// Reads a `quote`-delimited run starting at the opening quote, with
    /// doubled quotes unescaped. Returns `None` if the input ends first.
    fn read_quoted(&mut self, quote: char) -> Option<String> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        return Some(value);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return None,
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        self.advance();
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let input = self.input;
        let text = &input[self.start.pos..self.pos];

        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(text.to_string()))
        }
    }

    /// Scans a double-quoted identifier.
    fn scan_quoted_identifier(&mut self) -> Result<Token, LexError> {
        match self.read_quoted('"') {
            Some(name) => Ok(self.make_token(TokenKind::QuotedIdentifier(name))),
            None => Err(LexError::UnterminatedIdentifier {
                line: self.start.line,
                column: self.start.column,
            }),
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> Result<Token, LexError> {
        match self.read_quoted('\'') {
            Some(value) => Ok(self.make_token(TokenKind::String(value))),
            None => Err(LexError::UnterminatedString {
                line: self.start.line,
                column: self.start.column,
            }),
        }
    }

    /// Scans a number, picking the narrowest integer width that holds it.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let mut is_float = false;

        self.eat_digits();

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.eat_digits();
        }

        // An exponent only counts when digits follow it.
        if matches!(self.peek(), Some('e' | 'E')) {
            let before = self.mark();
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.eat_digits();
            } else {
                self.reset(before);
            }
        }

        let input = self.input;
        let text = &input[self.start.pos..self.pos];

        if is_float {
            return match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(self.make_token(TokenKind::Float(value))),
                _ => Err(LexError::InvalidNumber {
                    text: clip_fragment(text),
                    line: self.start.line,
                    column: self.start.column,
                }),
            };
        }

        let kind = if let Ok(value) = text.parse::<i32>() {
            TokenKind::Integer(value)
        } else if let Ok(value) = text.parse::<i64>() {
            TokenKind::Long(value)
        } else {
            TokenKind::BigInteger(text.trim_start_matches('0').to_string())
        };
        Ok(self.make_token(kind))
    }

    /// Tries to scan a JDBC escape literal after its opening `{`.
    ///
    /// Returns `Ok(None)` with the position restored when the brace opens
    /// something else, such as `{fn ...}` or `{call ...}`.
    fn scan_escape_literal(&mut self) -> Result<Option<Token>, LexError> {
        let after_brace = self.mark();
        self.skip_blanks();

        let word_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let kind = match self.input[word_start..self.pos].to_ascii_lowercase().as_str() {
            "d" => "date",
            "t" => "time",
            "ts" => "timestamp",
            "b" => "boolean",
            _ => {
                self.reset(after_brace);
                return Ok(None);
            }
        };

        self.skip_blanks();
        if self.peek() != Some('\'') {
            self.reset(after_brace);
            return Ok(None);
        }
        let literal = self.mark();
        let Some(payload) = self.read_quoted('\'') else {
            return Err(LexError::UnterminatedString {
                line: literal.line,
                column: literal.column,
            });
        };

        self.skip_blanks();
        if self.peek() != Some('}') {
            self.reset(after_brace);
            return Ok(None);
        }
        self.advance();

        let (line, column) = (self.start.line, self.start.column);
        let invalid = |payload: &str| LexError::InvalidLiteral {
            kind,
            text: clip_fragment(payload),
            line,
            column,
        };

        let token_kind = match kind {
            "date" => NaiveDate::parse_from_str(&payload, "%Y-%m-%d")
                .map(TokenKind::Date)
                .map_err(|_| invalid(&payload))?,
            "time" => NaiveTime::parse_from_str(&payload, "%H:%M:%S")
                .map(TokenKind::Time)
                .map_err(|_| invalid(&payload))?,
            "timestamp" => NaiveDateTime::parse_from_str(&payload, "%Y-%m-%d %H:%M:%S%.f")
                .map(TokenKind::Timestamp)
                .map_err(|_| invalid(&payload))?,
            _ => {
                if payload.eq_ignore_ascii_case("true") {
                    TokenKind::Boolean(true)
                } else if payload.eq_ignore_ascii_case("false") {
                    TokenKind::Boolean(false)
                } else {
                    return Err(invalid(&payload));
                }
            }
        };

        Ok(Some(self.make_token(token_kind)))
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for unterminated literals and comments, invalid
    /// escape payloads and characters outside the dialect.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        self.start = self.mark();

        let Some(c) = self.advance() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let kind = match c {
            // Single-character tokens
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '?' => TokenKind::Question,
            '=' => TokenKind::Eq,

            '{' => {
                if let Some(token) = self.scan_escape_literal()? {
                    return Ok(token);
                }
                TokenKind::LeftBrace
            }

            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.reset(self.start);
                    return self.scan_number();
                }
                TokenKind::Dot
            }

            // Potentially multi-character tokens
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::LtEq
                }
                Some('>') => {
                    self.advance();
                    TokenKind::NotEq
                }
                _ => TokenKind::Lt,
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::NotEq
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::Concat
            }

            // String literals
            '\'' => {
                self.reset(self.start);
                return self.scan_string();
            }

            // Quoted identifiers
            '"' => {
                self.reset(self.start);
                return self.scan_quoted_identifier();
            }

            // Numbers
            c if c.is_ascii_digit() => {
                self.reset(self.start);
                return self.scan_number();
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' || c == '#' => {
                self.reset(self.start);
                return Ok(self.scan_identifier());
            }

            _ => {
                return Err(LexError::UnexpectedCharacter {
                    ch: c,
                    line: self.start.line,
                    column: self.start.column,
                });
            }
        };

        Ok(self.make_token(kind))
    }

    /// Tokenizes the entire input. The last token is always `Eof`.
    ///
    /// # Errors
    ///
    /// Returns the first `LexError` encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

/// Tokenizes `input` into a token vector ending with `Eof`.
///
/// # Errors
///
/// Returns the first `LexError` encountered.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

/// `/* optional */`, `/*+ optional */`, any case, any surrounding blanks.
fn is_optional_hint(content: &str) -> bool {
    let content = content.trim();
    let content = content.strip_prefix('+').unwrap_or(content).trim();
    content.eq_ignore_ascii_case("optional")
}
