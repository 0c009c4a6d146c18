use crate::cache::ExpressionCache;
use crate::error::ShieldError;
use crate::evaluate::evaluate;

use super::error::EvalError;
use super::rule::{RuleLookup, RuleRegistry};
use super::value::Value;

/// Settings for a [`Guard`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardConfig {
    debug: bool,
}

impl GuardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `debug`-level trace of every check: what is checked, the
    /// subject, the object, the raw result and the final decision.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

/// Access decisions over a rule registry, with compile-once expressions.
///
/// # Example
///
/// ```
/// use shield_rules::{Guard, Record, RuleRegistry, Value};
///
/// let registry = RuleRegistry::new().rule("is_staff", |u: &Value, _: Option<&Value>| match u {
///     Value::Object(u) => u.attr("is_staff").unwrap_or_default(),
///     _ => Value::Bool(false),
/// });
/// let guard = Guard::new(registry);
///
/// let alice = Record::named("alice").set("is_staff", false).into_value();
/// let post = Record::new().set("author", alice.clone()).into_value();
///
/// let allowed = guard
///     .check_expression("obj.author == user or is_staff", &alice, Some(&post))
///     .unwrap();
/// assert!(allowed);
/// ```
#[derive(Debug, Default)]
pub struct Guard {
    registry: RuleRegistry,
    cache: ExpressionCache,
    config: GuardConfig,
}

impl Guard {
    #[must_use]
    pub fn new(registry: RuleRegistry) -> Self {
        Self::with_config(registry, GuardConfig::default())
    }

    #[must_use]
    pub fn with_config(registry: RuleRegistry, config: GuardConfig) -> Self {
        Self {
            registry,
            cache: ExpressionCache::new(),
            config,
        }
    }

    /// Run the named rule and coerce its result to allow/deny.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Rule`] if no rule with that name is registered.
    pub fn check_rule(
        &self,
        name: &str,
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<bool, ShieldError> {
        self.trace_start(name, subject, object);
        let rule = self
            .registry
            .lookup(name)
            .ok_or_else(|| EvalError::RuleNotFound {
                name: name.to_owned(),
            })?;
        let result = rule.check(subject, object);
        Ok(self.trace_result(name, &result))
    }

    /// Evaluate an expression (parsed once, then cached) and coerce the
    /// result to allow/deny. Rule references resolve against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Syntax`] if the text does not parse, or
    /// [`ShieldError::Evaluation`] if evaluation fails.
    pub fn check_expression(
        &self,
        text: &str,
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<bool, ShieldError> {
        self.trace_start(text, subject, object);
        let expr = self.cache.get_or_parse(text)?;
        let result = evaluate(&expr, subject, object, &self.registry)
            .map_err(|e| ShieldError::in_expression(text, e))?;
        Ok(self.trace_result(text, &result))
    }

    /// Allow only if every check allows. Checks run in order and stop at the
    /// first denial. Each entry is a rule name or an expression.
    ///
    /// # Errors
    ///
    /// Returns the first parse or evaluation error met before a denial.
    pub fn check_all(
        &self,
        checks: &[&str],
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<bool, ShieldError> {
        Ok(self.first_denied(checks, subject, object)?.is_none())
    }

    /// Allow if any check allows. Checks run in order and stop at the first
    /// one that allows.
    ///
    /// # Errors
    ///
    /// Returns the first parse or evaluation error met before an allow.
    pub fn check_any(
        &self,
        checks: &[&str],
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<bool, ShieldError> {
        for check in checks {
            if self.check_expression(check, subject, object)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Like [`check_expression`](Self::check_expression), but a denial is an
    /// error naming the check, the subject and the object.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::PermissionDenied`] on denial, or the parse or
    /// evaluation error that prevented a decision.
    pub fn require(
        &self,
        check: &str,
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<(), ShieldError> {
        if self.check_expression(check, subject, object)? {
            Ok(())
        } else {
            Err(ShieldError::denied(check, subject, object))
        }
    }

    /// [`check_all`](Self::check_all) that reports the first denying check.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::PermissionDenied`] naming the first check that
    /// denied, or the parse or evaluation error that prevented a decision.
    pub fn require_all(
        &self,
        checks: &[&str],
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<(), ShieldError> {
        match self.first_denied(checks, subject, object)? {
            None => Ok(()),
            Some(check) => Err(ShieldError::denied(check, subject, object)),
        }
    }

    /// [`check_any`](Self::check_any) that reports the last check tried when
    /// all of them deny. An empty list always denies, naming no check.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::PermissionDenied`] when no check allows, or the
    /// parse or evaluation error that prevented a decision.
    pub fn require_any(
        &self,
        checks: &[&str],
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<(), ShieldError> {
        if self.check_any(checks, subject, object)? {
            return Ok(());
        }
        let last = checks.last().copied().unwrap_or_default();
        Err(ShieldError::denied(last, subject, object))
    }

    /// Like [`check_expression`](Self::check_expression), but any error is
    /// logged and treated as a denial.
    #[must_use]
    pub fn is_allowed(&self, text: &str, subject: &Value, object: Option<&Value>) -> bool {
        self.check_expression(text, subject, object)
            .unwrap_or_else(|err| {
                tracing::warn!(expression = text, error = %err, "check failed, denying");
                false
            })
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn cache(&self) -> &ExpressionCache {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> GuardConfig {
        self.config
    }

    /// Forget every parsed expression, e.g. after rule definitions change.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn first_denied<'c>(
        &self,
        checks: &[&'c str],
        subject: &Value,
        object: Option<&Value>,
    ) -> Result<Option<&'c str>, ShieldError> {
        for &check in checks {
            if !self.check_expression(check, subject, object)? {
                return Ok(Some(check));
            }
        }
        Ok(None)
    }

    fn trace_start(&self, check: &str, subject: &Value, object: Option<&Value>) {
        if self.config.debug {
            tracing::debug!(check = check, "checking");
            tracing::debug!(%subject, "subject");
            match object {
                Some(object) => tracing::debug!(%object, "object"),
                None => tracing::debug!(object = "null", "object"),
            }
        }
    }

    fn trace_result(&self, check: &str, result: &Value) -> bool {
        let allowed = result.truthy();
        if self.config.debug {
            tracing::debug!(check = check, %result, "result");
            let decision = if allowed { "ALLOWED" } else { "DENIED" };
            tracing::debug!(decision, "decision");
        }
        allowed
    }
}
