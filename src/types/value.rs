use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::error::EvalError;
use super::expr::{CompareOp, Literal};

/// Dynamic field access on a host object.
///
/// Returning `None` signals an absent attribute; the evaluator treats it the
/// same as an attribute holding [`Value::Null`].
pub trait Attributes: fmt::Debug + Send + Sync {
    fn attr(&self, name: &str) -> Option<Value>;

    /// Text used when the object is printed in traces and messages.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// Shared handle to a host object. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Attributes>);

impl ObjectRef {
    pub fn new(object: impl Attributes + 'static) -> Self {
        Self(Arc::new(object))
    }

    #[must_use]
    pub fn from_arc(object: Arc<dyn Attributes>) -> Self {
        Self(object)
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<Value> {
        self.0.attr(name)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.describe())
    }
}

/// Values produced by evaluation and supplied by host objects.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    #[must_use]
    pub fn object(object: impl Attributes + 'static) -> Self {
        Value::Object(ObjectRef::new(object))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Boolean coercion used by `and`, `or` and `not`.
    ///
    /// Null, `false`, zero, the empty string and the empty list are false;
    /// everything else, including every host object, is true.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Name of the value's kind, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    /// Equality as used by `==`, `!=` and `in`. Never fails: values of
    /// different kinds are simply unequal, ints and floats compare
    /// numerically, and host objects compare by identity.
    #[must_use]
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                cmp_int_float(*a, *b) == Some(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Compare this value to another using the given operator.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnsupportedComparison`] when an ordering operator
    /// is applied to anything other than two numbers or two strings.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool, EvalError> {
        match op {
            CompareOp::Eq => Ok(self.loose_eq(other)),
            CompareOp::Neq => Ok(!self.loose_eq(other)),
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => {
                let Some(ord) = self.order(other) else {
                    return Err(EvalError::UnsupportedComparison {
                        op,
                        left: self.type_name(),
                        right: other.type_name(),
                    });
                };
                // NaN is orderable by type but unordered by value.
                let Some(ord) = ord else {
                    return Ok(false);
                };
                Ok(match op {
                    CompareOp::Gt => ord == Ordering::Greater,
                    CompareOp::Gte => ord != Ordering::Less,
                    CompareOp::Lt => ord == Ordering::Less,
                    _ => ord != Ordering::Greater,
                })
            }
        }
    }

    /// `None` when the kinds cannot be ordered at all.
    #[allow(clippy::option_option)]
    fn order(&self, other: &Value) -> Option<Option<Ordering>> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(Some(a.cmp(b))),
            (Value::Float(a), Value::Float(b)) => Some(a.partial_cmp(b)),
            (Value::Int(a), Value::Float(b)) => Some(cmp_int_float(*a, *b)),
            (Value::Float(a), Value::Int(b)) => Some(cmp_int_float(*b, *a).map(Ordering::reverse)),
            (Value::String(a), Value::String(b)) => Some(Some(a.cmp(b))),
            _ => None,
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer to the nearest `f64`. `None` only for NaN.
#[allow(clippy::cast_possible_truncation)]
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float past `i64::MAX`.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }

    // In range, so the whole part converts to i64 exactly.
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        ord => Some(ord),
    }
}

/// Structural equality, used by tests and callers inspecting results.
/// Unlike [`Value::loose_eq`], `Int(1)` and `Float(1.0)` are distinct here.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Str(s) => Value::String(s.clone()),
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Bool(v) => Value::Bool(*v),
            Literal::Null => Value::Null,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => write!(f, "{obj}"),
        }
    }
}
