use crate::{EvalError, Expr, RuleLookup, Value};

/// Evaluate `expr` against a subject and an optional object.
///
/// Rule references are resolved through `rules`. The result is usually a
/// boolean but is not coerced: `obj.status` evaluates to the status itself.
/// An object of `Some(Value::Null)` is treated the same as `None`.
///
/// Recursion depth follows the tree depth; pathologically deep trees can
/// exhaust the call stack.
///
/// # Errors
///
/// Returns [`EvalError`] for an unregistered rule, an `obj.` access with no
/// object, an ordering comparison between incompatible values, or an `in`
/// whose right-hand side is not a list.
pub fn evaluate<R>(
    expr: &Expr,
    subject: &Value,
    object: Option<&Value>,
    rules: &R,
) -> Result<Value, EvalError>
where
    R: RuleLookup + ?Sized,
{
    let object = object.filter(|o| !o.is_null());
    eval_expr(expr, subject, object, rules)
}

fn eval_expr<R>(
    expr: &Expr,
    subject: &Value,
    object: Option<&Value>,
    rules: &R,
) -> Result<Value, EvalError>
where
    R: RuleLookup + ?Sized,
{
    let eval = |e: &Expr| eval_expr(e, subject, object, rules);

    Ok(match expr {
        Expr::RuleRef(name) => {
            let rule = rules
                .lookup(name)
                .ok_or_else(|| EvalError::RuleNotFound { name: name.clone() })?;
            let result = rule.check(subject, object);
            tracing::trace!(rule = %name, %result, "rule resolved");
            result
        }
        Expr::ObjAttr(path) => {
            let root = object.ok_or(EvalError::NullObject)?;
            walk_path(root, path)
        }
        Expr::UserAttr(path) => walk_path(subject, path),
        Expr::UserRef => subject.clone(),
        Expr::Literal(lit) => Value::from(lit),
        Expr::List(items) => Value::List(items.iter().map(eval).collect::<Result<_, _>>()?),
        Expr::Compare { left, op, right } => {
            let left = eval(left)?;
            let right = eval(right)?;
            Value::Bool(left.compare(*op, &right)?)
        }
        Expr::And(a, b) => Value::Bool(eval(a)?.truthy() && eval(b)?.truthy()),
        Expr::Or(a, b) => Value::Bool(eval(a)?.truthy() || eval(b)?.truthy()),
        Expr::Not(inner) => Value::Bool(!eval(inner)?.truthy()),
        Expr::In(needle, haystack) => {
            let needle = eval(needle)?;
            match eval(haystack)? {
                Value::List(items) => Value::Bool(items.iter().any(|item| item.loose_eq(&needle))),
                other => {
                    return Err(EvalError::NotASequence {
                        found: other.type_name(),
                    })
                }
            }
        }
    })
}

/// Follow attribute names from `root`. Null, missing attributes and values
/// without attributes all yield `Null` rather than an error.
fn walk_path(root: &Value, path: &[String]) -> Value {
    let mut current = root.clone();
    for name in path {
        current = match &current {
            Value::Object(obj) => obj.attr(name).unwrap_or_default(),
            _ => return Value::Null,
        };
    }
    current
}
