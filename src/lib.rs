//! Boolean access-control expressions over a subject and an object.
//!
//! An expression such as `obj.author == user or user.is_staff` is parsed once
//! into an [`Expr`] tree and then evaluated against many subject/object pairs.
//! [`ExpressionCache`] memoizes parsing, [`RuleRegistry`] supplies named rules,
//! and [`Guard`] ties them together into allow/deny decisions.

mod cache;
mod error;
mod evaluate;
pub mod parse;
mod types;

pub use cache::ExpressionCache;
pub use error::ShieldError;
pub use evaluate::evaluate;
pub use parse::{parse_expression, SyntaxError, SyntaxErrorKind};
pub use types::{
    list, lit, null, obj, rule_ref, user, user_attr, Attributes, CompareOp, EvalError, Expr,
    Guard, GuardConfig, Literal, ObjectRef, Predicate, Record, Rule, RuleLookup, RuleRegistry,
    Value,
};
