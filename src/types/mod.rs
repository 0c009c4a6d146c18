mod error;
mod expr;
mod guard;
mod record;
mod rule;
mod value;

pub use error::EvalError;
pub use expr::{list, lit, null, obj, rule_ref, user, user_attr, CompareOp, Expr, Literal};
pub use guard::{Guard, GuardConfig};
pub use record::Record;
pub use rule::{Predicate, Rule, RuleLookup, RuleRegistry};
pub use value::{Attributes, ObjectRef, Value};
