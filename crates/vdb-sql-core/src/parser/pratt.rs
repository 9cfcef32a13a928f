//! Pratt expression parser for operator precedence.

use crate::lexer::TokenKind;

/// Binding power of unary minus; binds tighter than every infix operator.
pub const PREFIX_MINUS_BINDING_POWER: u8 = 5;

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an arithmetic or concatenation operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Additive (string concat has same precedence as addition)
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((1, 2)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash => Some((3, 4)),

        _ => None,
    }
}

/// Returns the function name an infix operator token is parsed into.
#[must_use]
pub const fn operator_name(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Plus => Some("+"),
        TokenKind::Minus => Some("-"),
        TokenKind::Star => Some("*"),
        TokenKind::Slash => Some("/"),
        TokenKind::Concat => Some("||"),
        _ => None,
    }
}
