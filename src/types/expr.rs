use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use super::error::EvalError;

/// Comparison operators supported in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// The operator's source symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// `true` for the four ordering operators.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Neq)
    }
}

impl FromStr for CompareOp {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Neq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Gte),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Lte),
            other => Err(EvalError::UnknownOperator {
                op: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A constant written in the expression source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "\"{s}\""),
            Literal::Int(v) => write!(f, "{v}"),
            // `{}` drops the fraction of whole floats, which would re-lex as an integer.
            Literal::Float(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Bool(true) => f.write_str("true"),
            Literal::Bool(false) => f.write_str("false"),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Parsed expression tree.
///
/// Nodes are pure syntax: they never hold evaluation-time values, so one tree
/// can be shared (behind `Arc`) and evaluated against any subject/object pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A named rule resolved through a [`RuleLookup`](crate::RuleLookup).
    RuleRef(String),
    /// `obj.a.b` -- never empty.
    ObjAttr(Vec<String>),
    /// `user.a.b` -- never empty.
    UserAttr(Vec<String>),
    /// Bare `user`.
    UserRef,
    Literal(Literal),
    List(Vec<Expr>),
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    In(Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::RuleRef(name) => write!(f, "{name}"),
            Expr::ObjAttr(path) => write!(f, "obj.{}", path.join(".")),
            Expr::UserAttr(path) => write!(f, "user.{}", path.join(".")),
            Expr::UserRef => f.write_str("user"),
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Expr::Compare { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::And(a, b) => write!(f, "({a} and {b})"),
            Expr::Or(a, b) => write!(f, "({a} or {b})"),
            Expr::Not(inner) => write!(f, "(not {inner})"),
            Expr::In(a, b) => write!(f, "({a} in {b})"),
        }
    }
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn is_in(self, other: Expr) -> Expr {
        Expr::In(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn compare(self, op: CompareOp, other: Expr) -> Expr {
        Expr::Compare {
            left: Box::new(self),
            op,
            right: Box::new(other),
        }
    }

    #[must_use]
    pub fn eq(self, other: Expr) -> Expr {
        self.compare(CompareOp::Eq, other)
    }

    #[must_use]
    pub fn neq(self, other: Expr) -> Expr {
        self.compare(CompareOp::Neq, other)
    }

    #[must_use]
    pub fn gt(self, other: Expr) -> Expr {
        self.compare(CompareOp::Gt, other)
    }

    #[must_use]
    pub fn gte(self, other: Expr) -> Expr {
        self.compare(CompareOp::Gte, other)
    }

    #[must_use]
    pub fn lt(self, other: Expr) -> Expr {
        self.compare(CompareOp::Lt, other)
    }

    #[must_use]
    pub fn lte(self, other: Expr) -> Expr {
        self.compare(CompareOp::Lte, other)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Str(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::Str(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_owned).collect()
}

/// `obj.<path>` for a dot-separated path.
///
/// # Panics
///
/// Panics if `path` is empty.
#[must_use]
pub fn obj(path: &str) -> Expr {
    assert!(!path.is_empty(), "attribute path must not be empty");
    Expr::ObjAttr(split_path(path))
}

/// `user.<path>` for a dot-separated path.
///
/// # Panics
///
/// Panics if `path` is empty.
#[must_use]
pub fn user_attr(path: &str) -> Expr {
    assert!(!path.is_empty(), "attribute path must not be empty");
    Expr::UserAttr(split_path(path))
}

/// Bare `user`.
#[must_use]
pub fn user() -> Expr {
    Expr::UserRef
}

#[must_use]
pub fn lit(value: impl Into<Literal>) -> Expr {
    Expr::Literal(value.into())
}

#[must_use]
pub fn null() -> Expr {
    Expr::Literal(Literal::Null)
}

#[must_use]
pub fn list(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::List(items.into_iter().collect())
}

#[must_use]
pub fn rule_ref(name: &str) -> Expr {
    Expr::RuleRef(name.to_owned())
}
