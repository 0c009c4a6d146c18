mod error;
mod lexer;
mod parser;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use lexer::{tokenize, Token, TokenKind};

use crate::Expr;

/// Parse an expression string into an [`Expr`] tree.
///
/// Bypasses any cache; see [`ExpressionCache`](crate::ExpressionCache) for the
/// compile-once path.
///
/// # Errors
///
/// Returns [`SyntaxError`] if the text contains an invalid character, is
/// grammatically malformed, ends early, or contains no tokens at all.
pub fn parse_expression(text: &str) -> Result<Expr, SyntaxError> {
    let tokens = lexer::tokenize(text)?;
    parser::parse_tokens(text, &tokens)
}
