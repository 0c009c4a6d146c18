use std::fmt;

use thiserror::Error;

/// What went wrong while lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("failed to parse expression")]
    Empty,
}

/// Errors produced when lexing or parsing an expression.
///
/// Carries the full source text and, when the failure is tied to a concrete
/// character or token, its zero-based character offset. `Display` renders a
/// caret under that position:
///
/// ```text
/// unexpected token '=='
///   obj.status == == "draft"
///                 ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    expression: String,
    position: Option<usize>,
}

impl SyntaxError {
    pub(crate) fn new(
        kind: SyntaxErrorKind,
        expression: impl Into<String>,
        position: Option<usize>,
    ) -> Self {
        Self {
            kind,
            expression: expression.into(),
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }

    /// The full expression text that failed to parse.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Zero-based character offset of the offending character or token.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.position
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.kind, self.expression)?;
        if let Some(pos) = self.position {
            write!(f, "\n  {:pos$}^", "")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}
