use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::value::Value;

/// A host-supplied check behind a named rule.
///
/// `object` is `None` when the check does not concern a specific resource.
pub trait Predicate: Send + Sync {
    fn call(&self, subject: &Value, object: Option<&Value>) -> Value;
}

impl<F> Predicate for F
where
    F: Fn(&Value, Option<&Value>) -> Value + Send + Sync,
{
    fn call(&self, subject: &Value, object: Option<&Value>) -> Value {
        self(subject, object)
    }
}

/// A named predicate.
#[derive(Clone)]
pub struct Rule {
    name: String,
    predicate: Arc<dyn Predicate>,
}

impl Rule {
    pub fn new(name: impl Into<String>, predicate: impl Predicate + 'static) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate. A null object is passed on as `None`.
    #[must_use]
    pub fn check(&self, subject: &Value, object: Option<&Value>) -> Value {
        let object = object.filter(|o| !o.is_null());
        self.predicate.call(subject, object)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Resolves rule names at evaluation time.
pub trait RuleLookup {
    fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn lookup(&self, name: &str) -> Option<&Rule>;
}

/// In-memory [`RuleLookup`] keyed by rule name.
///
/// # Example
///
/// ```
/// use shield_rules::{RuleLookup, RuleRegistry, Value};
///
/// let registry = RuleRegistry::new()
///     .rule("is_staff", |user: &Value, _: Option<&Value>| match user {
///         Value::Object(u) => u.attr("is_staff").unwrap_or_default(),
///         _ => Value::Bool(false),
///     });
/// assert!(registry.exists("is_staff"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule built from a closure, replacing any rule of the same name.
    #[must_use]
    pub fn rule(mut self, name: &str, predicate: impl Predicate + 'static) -> Self {
        self.register(Rule::new(name, predicate));
        self
    }

    /// Register a rule, returning the one it replaced.
    pub fn register(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.name.clone(), rule)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        self.rules.remove(name)
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl RuleLookup for RuleRegistry {
    fn exists(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    fn lookup(&self, name: &str) -> Option<&Rule> {
        self.get(name)
    }
}
