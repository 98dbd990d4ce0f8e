//! Declarative validation rule bundles.
//!
//! A [`Rule`] is an optional bundle of checks attached to one field path;
//! [`Rules`] is the registry mapping paths to rules. Checks are evaluated
//! by the validation pipeline in a fixed order (see
//! [`crate::Form::validate_field`]).

use futures::future::BoxFuture;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a custom check.
///
/// `Invalid` produces the generic "Invalid value" message; `Message`
/// carries dynamic, data-dependent error text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The value passed the check.
    Valid,
    /// The value failed; report the generic message.
    Invalid,
    /// The value failed; report this exact message.
    Message(String),
}

impl Verdict {
    /// The error message this verdict yields, if any.
    pub fn into_message(self) -> Option<String> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid => Some(crate::validate::INVALID_VALUE.to_owned()),
            Verdict::Message(msg) => Some(msg),
        }
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }
}

impl From<&str> for Verdict {
    fn from(msg: &str) -> Self {
        Verdict::Message(msg.to_owned())
    }
}

impl From<String> for Verdict {
    fn from(msg: String) -> Self {
        Verdict::Message(msg)
    }
}

/// A bound threshold with an optional message override.
///
/// Built from a bare threshold (`.min(18)`) or a `(threshold, message)`
/// pair (`.min((18, "Must be an adult"))`).
#[derive(Clone, Debug)]
pub struct Bound<T> {
    /// The inclusive limit.
    pub limit: T,
    /// Wording that replaces the default message when present.
    pub message: Option<String>,
}

impl From<f64> for Bound<f64> {
    fn from(limit: f64) -> Self {
        Bound {
            limit,
            message: None,
        }
    }
}

impl From<f32> for Bound<f64> {
    fn from(limit: f32) -> Self {
        Bound {
            limit: limit as f64,
            message: None,
        }
    }
}

impl From<i64> for Bound<f64> {
    fn from(limit: i64) -> Self {
        Bound {
            limit: limit as f64,
            message: None,
        }
    }
}

impl From<i32> for Bound<f64> {
    fn from(limit: i32) -> Self {
        Bound {
            limit: limit as f64,
            message: None,
        }
    }
}

impl From<u32> for Bound<f64> {
    fn from(limit: u32) -> Self {
        Bound {
            limit: limit as f64,
            message: None,
        }
    }
}

impl<N: Into<f64>, S: Into<String>> From<(N, S)> for Bound<f64> {
    fn from((limit, message): (N, S)) -> Self {
        Bound {
            limit: limit.into(),
            message: Some(message.into()),
        }
    }
}

impl From<usize> for Bound<usize> {
    fn from(limit: usize) -> Self {
        Bound {
            limit,
            message: None,
        }
    }
}

impl<S: Into<String>> From<(usize, S)> for Bound<usize> {
    fn from((limit, message): (usize, S)) -> Self {
        Bound {
            limit,
            message: Some(message.into()),
        }
    }
}

/// The `required` declaration: enabled flag plus optional message.
#[derive(Clone, Debug, Default)]
pub struct Requirement {
    pub(crate) enabled: bool,
    pub(crate) message: Option<String>,
}

impl From<bool> for Requirement {
    fn from(enabled: bool) -> Self {
        Requirement {
            enabled,
            message: None,
        }
    }
}

impl From<&str> for Requirement {
    fn from(message: &str) -> Self {
        Requirement {
            enabled: true,
            message: Some(message.to_owned()),
        }
    }
}

impl From<String> for Requirement {
    fn from(message: String) -> Self {
        Requirement {
            enabled: true,
            message: Some(message),
        }
    }
}

/// The `pattern` declaration: a precompiled regex plus optional message.
#[derive(Clone, Debug)]
pub struct PatternRule {
    pub(crate) regex: Regex,
    pub(crate) message: Option<String>,
}

impl From<Regex> for PatternRule {
    fn from(regex: Regex) -> Self {
        PatternRule {
            regex,
            message: None,
        }
    }
}

impl<S: Into<String>> From<(Regex, S)> for PatternRule {
    fn from((regex, message): (Regex, S)) -> Self {
        PatternRule {
            regex,
            message: Some(message.into()),
        }
    }
}

/// The `equals` declaration: a sibling path plus optional message.
#[derive(Clone, Debug)]
pub struct EqualsRule {
    pub(crate) other: String,
    pub(crate) message: Option<String>,
}

impl From<&str> for EqualsRule {
    fn from(other: &str) -> Self {
        EqualsRule {
            other: other.to_owned(),
            message: None,
        }
    }
}

impl<S: Into<String>> From<(&str, S)> for EqualsRule {
    fn from((other, message): (&str, S)) -> Self {
        EqualsRule {
            other: other.to_owned(),
            message: Some(message.into()),
        }
    }
}

/// A custom per-field check, sync or async.
///
/// The callback receives the field's current value (`null` when the path
/// resolves to nothing) and the entire current values root.
#[derive(Clone)]
pub enum Check {
    /// Synchronous predicate.
    Sync(Arc<dyn Fn(&Value, &Value) -> Verdict + Send + Sync>),
    /// Asynchronous predicate.
    Async(Arc<dyn Fn(Value, Value) -> BoxFuture<'static, Verdict> + Send + Sync>),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Sync(_) => f.write_str("Check::Sync(..)"),
            Check::Async(_) => f.write_str("Check::Async(..)"),
        }
    }
}

/// A whole-form check, sync or async.
///
/// Receives the entire values root and returns a partial mapping from
/// path to error message, merged over the per-field results.
#[derive(Clone)]
pub enum FormCheck {
    /// Synchronous form-level validator.
    Sync(Arc<dyn Fn(&Value) -> BTreeMap<String, String> + Send + Sync>),
    /// Asynchronous form-level validator.
    Async(Arc<dyn Fn(Value) -> BoxFuture<'static, BTreeMap<String, String>> + Send + Sync>),
}

impl FormCheck {
    /// Wrap a synchronous form-level validator.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> BTreeMap<String, String> + Send + Sync + 'static,
    {
        FormCheck::Sync(Arc::new(check))
    }

    /// Wrap an asynchronous form-level validator.
    pub fn new_async<F, Fut>(check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BTreeMap<String, String>> + Send + 'static,
    {
        let check = Arc::new(check);
        FormCheck::Async(Arc::new(
            move |values| -> BoxFuture<'static, BTreeMap<String, String>> {
                let check = Arc::clone(&check);
                Box::pin(async move { check(values).await })
            },
        ))
    }
}

impl fmt::Debug for FormCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormCheck::Sync(_) => f.write_str("FormCheck::Sync(..)"),
            FormCheck::Async(_) => f.write_str("FormCheck::Async(..)"),
        }
    }
}

/// The declarative rule bundle for one field path.
///
/// A rule with no declarations produces no error. Checks run in a fixed
/// order and stop at the first failure: required, numeric bounds, length
/// bounds, pattern, equals, custom. Type-guarded checks (bounds on a
/// non-number, length/pattern on a non-string) are skipped, not failed.
///
/// # Examples
///
/// ```
/// use formwork::Rule;
/// use regex::Regex;
///
/// let email = Rule::new()
///     .required("Email required")
///     .pattern(Regex::new(r"^\S+@\S+$").unwrap());
/// let age = Rule::new().min(18);
/// let confirm = Rule::new().equals(("password", "Passwords do not match"));
/// # let _ = (email, age, confirm);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rule {
    pub(crate) required: Option<Requirement>,
    pub(crate) min: Option<Bound<f64>>,
    pub(crate) max: Option<Bound<f64>>,
    pub(crate) min_length: Option<Bound<usize>>,
    pub(crate) max_length: Option<Bound<usize>>,
    pub(crate) pattern: Option<PatternRule>,
    pub(crate) equals: Option<EqualsRule>,
    pub(crate) check: Option<Check>,
}

impl Rule {
    /// Create an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject missing, `null`, and empty-string values.
    ///
    /// Accepts `true` for the default wording or a message string.
    pub fn required(mut self, req: impl Into<Requirement>) -> Self {
        self.required = Some(req.into());
        self
    }

    /// Inclusive lower numeric bound; skipped for non-numbers.
    pub fn min(mut self, bound: impl Into<Bound<f64>>) -> Self {
        self.min = Some(bound.into());
        self
    }

    /// Inclusive upper numeric bound; skipped for non-numbers.
    pub fn max(mut self, bound: impl Into<Bound<f64>>) -> Self {
        self.max = Some(bound.into());
        self
    }

    /// Inclusive lower string-length bound; skipped for non-strings.
    pub fn min_length(mut self, bound: impl Into<Bound<usize>>) -> Self {
        self.min_length = Some(bound.into());
        self
    }

    /// Inclusive upper string-length bound; skipped for non-strings.
    pub fn max_length(mut self, bound: impl Into<Bound<usize>>) -> Self {
        self.max_length = Some(bound.into());
        self
    }

    /// Regex the string value must match; skipped for non-strings.
    pub fn pattern(mut self, pattern: impl Into<PatternRule>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Deep-equality against the value at a sibling path.
    pub fn equals(mut self, equals: impl Into<EqualsRule>) -> Self {
        self.equals = Some(equals.into());
        self
    }

    /// Attach a synchronous custom check.
    ///
    /// The callback may return `bool`, `&str`/`String`, or a [`Verdict`].
    pub fn check<F, V>(mut self, check: F) -> Self
    where
        F: Fn(&Value, &Value) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.check = Some(Check::Sync(Arc::new(
            move |value: &Value, values: &Value| check(value, values).into(),
        )));
        self
    }

    /// Attach an asynchronous custom check.
    pub fn check_async<F, Fut, V>(mut self, check: F) -> Self
    where
        F: Fn(Value, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = V> + Send + 'static,
        V: Into<Verdict>,
    {
        let check = Arc::new(check);
        self.check = Some(Check::Async(Arc::new(
            move |value, values| -> BoxFuture<'static, Verdict> {
                let check = Arc::clone(&check);
                Box::pin(async move { check(value, values).await.into() })
            },
        )));
        self
    }

    /// True if no declaration is set.
    pub fn is_empty(&self) -> bool {
        self.required.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.equals.is_none()
            && self.check.is_none()
    }
}

/// Registry mapping field paths to their rules.
///
/// # Examples
///
/// ```
/// use formwork::{Rule, Rules};
///
/// let rules = Rules::new()
///     .field("email", Rule::new().required(true))
///     .field("age", Rule::new().min(18).max(130));
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rules {
    by_path: BTreeMap<String, Rule>,
}

impl Rules {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for a path (builder pattern). A later registration
    /// for the same path replaces the earlier one.
    pub fn field(mut self, path: impl Into<String>, rule: Rule) -> Self {
        self.by_path.insert(path.into(), rule);
        self
    }

    /// Look up the rule for a path.
    pub fn get(&self, path: &str) -> Option<&Rule> {
        self.by_path.get(path)
    }

    /// Iterate over `(path, rule)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Rule)> {
        self.by_path.iter()
    }

    /// Iterate over registered paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.by_path.keys()
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// True if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_conversions() {
        assert_eq!(Verdict::from(true), Verdict::Valid);
        assert_eq!(Verdict::from(false), Verdict::Invalid);
        assert_eq!(Verdict::from("taken"), Verdict::Message("taken".to_owned()));
        assert_eq!(
            Verdict::Message("x".into()).into_message().as_deref(),
            Some("x")
        );
        assert!(Verdict::Valid.into_message().is_none());
    }

    #[test]
    fn bound_from_threshold_and_pair() {
        let bare: Bound<f64> = 18.into();
        assert_eq!(bare.limit, 18.0);
        assert!(bare.message.is_none());

        let pair: Bound<f64> = (18, "Must be an adult").into();
        assert_eq!(pair.message.as_deref(), Some("Must be an adult"));

        let len: Bound<usize> = (3usize, "Too short").into();
        assert_eq!(len.limit, 3);
    }

    #[test]
    fn requirement_from_bool_and_message() {
        let bare = Requirement::from(true);
        assert!(bare.enabled && bare.message.is_none());

        let worded = Requirement::from("Email required");
        assert!(worded.enabled);
        assert_eq!(worded.message.as_deref(), Some("Email required"));
    }

    #[test]
    fn empty_rule_reports_empty() {
        assert!(Rule::new().is_empty());
        assert!(!Rule::new().required(true).is_empty());
        assert!(!Rule::new().check(|_, _| true).is_empty());
    }

    #[test]
    fn rules_registry_lookup() {
        let rules = Rules::new()
            .field("a", Rule::new().min(1))
            .field("b", Rule::new().max(2));
        assert!(rules.get("a").is_some());
        assert!(rules.get("missing").is_none());
        let paths: Vec<_> = rules.paths().cloned().collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn sync_check_sees_sibling_values() {
        let rule = Rule::new().check(|value, values| {
            let sibling = values.get("limit").and_then(|v| v.as_i64()).unwrap_or(0);
            value.as_i64().is_some_and(|v| v <= sibling)
        });
        let Some(Check::Sync(check)) = rule.check.as_ref() else {
            panic!("expected sync check");
        };
        assert_eq!(check(&json!(3), &json!({"limit": 5})), Verdict::Valid);
        assert_eq!(check(&json!(9), &json!({"limit": 5})), Verdict::Invalid);
    }
}
