use thiserror::Error;

use super::expr::CompareOp;

/// Errors raised while evaluating a parsed expression.
///
/// Each error renders as `"<message>: <detail>"`; [`message()`](Self::message)
/// and [`detail()`](Self::detail) expose the two halves separately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("rule not found: rule '{name}' is not registered")]
    RuleNotFound { name: String },

    #[error("cannot access object attribute: object is null")]
    NullObject,

    #[error("unsupported comparison: '{op}' not supported between {left} and {right}")]
    UnsupportedComparison {
        op: CompareOp,
        left: &'static str,
        right: &'static str,
    },

    #[error("membership requires a list: right-hand side is {found}")]
    NotASequence { found: &'static str },

    #[error("unknown operator: operator '{op}' is not supported")]
    UnknownOperator { op: String },
}

impl EvalError {
    /// Short, fixed description of the failure.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            EvalError::RuleNotFound { .. } => "rule not found",
            EvalError::NullObject => "cannot access object attribute",
            EvalError::UnsupportedComparison { .. } => "unsupported comparison",
            EvalError::NotASequence { .. } => "membership requires a list",
            EvalError::UnknownOperator { .. } => "unknown operator",
        }
    }

    /// Context specific to this occurrence.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            EvalError::RuleNotFound { name } => Some(format!("rule '{name}' is not registered")),
            EvalError::NullObject => Some("object is null".to_owned()),
            EvalError::UnsupportedComparison { op, left, right } => {
                Some(format!("'{op}' not supported between {left} and {right}"))
            }
            EvalError::NotASequence { found } => Some(format!("right-hand side is {found}")),
            EvalError::UnknownOperator { op } => {
                Some(format!("operator '{op}' is not supported"))
            }
        }
    }
}
