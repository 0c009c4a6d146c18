use thiserror::Error;

use crate::parse::SyntaxError;
use crate::{EvalError, Value};

/// Unified error type covering parsing, evaluation and denials.
///
/// Returned by the [`Guard`](crate::Guard) entry points. Evaluation failures
/// of an expression carry the expression text for diagnostics.
#[derive(Debug, Error)]
pub enum ShieldError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{source}\n  Expression: {expression}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvalError,
    },

    #[error(transparent)]
    Rule(#[from] EvalError),

    /// A check ran cleanly and denied access. `subject` and `object` hold the
    /// display form of the values that were checked.
    #[error("User '{subject}' does not have permission '{check}'{}", for_object(.object.as_deref()))]
    PermissionDenied {
        check: String,
        subject: String,
        object: Option<String>,
    },
}

fn for_object(object: Option<&str>) -> String {
    object.map_or_else(String::new, |o| format!(" for object '{o}'"))
}

impl ShieldError {
    pub(crate) fn in_expression(expression: &str, source: EvalError) -> Self {
        ShieldError::Evaluation {
            expression: expression.to_owned(),
            source,
        }
    }

    pub(crate) fn denied(check: &str, subject: &Value, object: Option<&Value>) -> Self {
        ShieldError::PermissionDenied {
            check: check.to_owned(),
            subject: subject.to_string(),
            object: object.filter(|o| !o.is_null()).map(Value::to_string),
        }
    }

    /// `true` when this is a clean denial rather than a failure to check.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, ShieldError::PermissionDenied { .. })
    }

    /// The evaluation error behind this failure, if any.
    #[must_use]
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self {
            ShieldError::Syntax(_) | ShieldError::PermissionDenied { .. } => None,
            ShieldError::Evaluation { source, .. } | ShieldError::Rule(source) => Some(source),
        }
    }
}
