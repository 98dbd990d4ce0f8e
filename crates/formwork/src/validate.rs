//! Rule evaluation pipeline.
//!
//! Evaluation order per field is fixed and short-circuits at the first
//! failing check: required, numeric bounds, length bounds, pattern,
//! equals, custom. Type-guarded checks are skipped (not failed) when the
//! value has the wrong type, so `required` + `min` is the way to reject
//! missing values while still bounding present ones.

use crate::resolve::get_at;
use crate::rule::{Check, FormCheck, Rule, Rules};
use crate::Path;
use serde_json::Value;
use std::collections::BTreeMap;

/// Default message for the `required` check.
pub(crate) const REQUIRED: &str = "This field is required";
/// Default message for a custom check that returns a bare failure.
pub(crate) const INVALID_VALUE: &str = "Invalid value";
/// Default message for the `pattern` check.
pub(crate) const INVALID_FORMAT: &str = "Invalid format";

/// Evaluate one field's rule against the current values root.
///
/// Returns the error message of the first failing check, or `None` when
/// every check passes. Never fails for well-formed rules; a panicking
/// custom check is a rule-author bug and unwinds to the caller.
pub(crate) async fn run_rule(path: &str, rule: &Rule, values: &Value) -> Option<String> {
    let parsed = Path::parse(path);
    let value = get_at(values, &parsed);

    if let Some(req) = &rule.required {
        if req.enabled && is_blank(value) {
            return Some(req.message.clone().unwrap_or_else(|| REQUIRED.to_owned()));
        }
    }

    if let Some(number) = value.and_then(Value::as_f64) {
        if let Some(bound) = &rule.min {
            if number < bound.limit {
                return Some(bound.message.clone().unwrap_or_else(|| {
                    format!("Must be at least {}", bound.limit)
                }));
            }
        }
        if let Some(bound) = &rule.max {
            if number > bound.limit {
                return Some(bound.message.clone().unwrap_or_else(|| {
                    format!("Must be at most {}", bound.limit)
                }));
            }
        }
    }

    if let Some(text) = value.and_then(Value::as_str) {
        if let Some(bound) = &rule.min_length {
            if text.chars().count() < bound.limit {
                return Some(bound.message.clone().unwrap_or_else(|| {
                    format!("Must be at least {} characters", bound.limit)
                }));
            }
        }
        if let Some(bound) = &rule.max_length {
            if text.chars().count() > bound.limit {
                return Some(bound.message.clone().unwrap_or_else(|| {
                    format!("Must be at most {} characters", bound.limit)
                }));
            }
        }
        if let Some(pattern) = &rule.pattern {
            if !pattern.regex.is_match(text) {
                return Some(
                    pattern
                        .message
                        .clone()
                        .unwrap_or_else(|| INVALID_FORMAT.to_owned()),
                );
            }
        }
    }

    if let Some(equals) = &rule.equals {
        let other = get_at(values, &Path::parse(&equals.other));
        if value != other {
            return Some(
                equals
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Must match {}", equals.other)),
            );
        }
    }

    if let Some(check) = &rule.check {
        let verdict = match check {
            Check::Sync(f) => f(value.unwrap_or(&Value::Null), values),
            Check::Async(f) => {
                f(value.cloned().unwrap_or(Value::Null), values.clone()).await
            }
        };
        return verdict.into_message();
    }

    None
}

/// Evaluate every registered rule against `values`, collecting failures.
pub(crate) async fn run_rules(rules: &Rules, values: &Value) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    for (path, rule) in rules.iter() {
        if let Some(message) = run_rule(path, rule, values).await {
            errors.insert(path.clone(), message);
        }
    }
    errors
}

/// Evaluate the whole-form check, if configured.
pub(crate) async fn run_form_check(
    check: Option<&FormCheck>,
    values: &Value,
) -> BTreeMap<String, String> {
    match check {
        Some(FormCheck::Sync(f)) => f(values),
        Some(FormCheck::Async(f)) => f(values.clone()).await,
        None => BTreeMap::new(),
    }
}

/// The `required` notion of emptiness: missing, `null`, or `""`.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;
    use regex::Regex;
    use serde_json::json;

    async fn eval(rule: &Rule, values: Value, path: &str) -> Option<String> {
        run_rule(path, rule, &values).await
    }

    #[tokio::test]
    async fn empty_rule_passes_anything() {
        let rule = Rule::new();
        assert_eq!(eval(&rule, json!({"x": null}), "x").await, None);
        assert_eq!(eval(&rule, json!({}), "missing").await, None);
    }

    #[tokio::test]
    async fn required_rejects_missing_null_and_empty_string() {
        let rule = Rule::new().required(true);
        assert_eq!(eval(&rule, json!({}), "x").await.as_deref(), Some(REQUIRED));
        assert_eq!(
            eval(&rule, json!({"x": null}), "x").await.as_deref(),
            Some(REQUIRED)
        );
        assert_eq!(
            eval(&rule, json!({"x": ""}), "x").await.as_deref(),
            Some(REQUIRED)
        );
        assert_eq!(eval(&rule, json!({"x": 0}), "x").await, None);
        assert_eq!(eval(&rule, json!({"x": false}), "x").await, None);
    }

    #[tokio::test]
    async fn required_message_override() {
        let rule = Rule::new().required("Email required");
        assert_eq!(
            eval(&rule, json!({}), "email").await.as_deref(),
            Some("Email required")
        );
    }

    #[tokio::test]
    async fn required_wins_over_bounds_on_missing_value() {
        let rule = Rule::new().required(true).min(5);
        assert_eq!(eval(&rule, json!({}), "x").await.as_deref(), Some(REQUIRED));
        assert_eq!(
            eval(&rule, json!({"x": 3}), "x").await.as_deref(),
            Some("Must be at least 5")
        );
        assert_eq!(eval(&rule, json!({"x": 5}), "x").await, None);
    }

    #[tokio::test]
    async fn numeric_bounds_are_inclusive_and_type_guarded() {
        let rule = Rule::new().min(1).max(10);
        assert_eq!(eval(&rule, json!({"x": 1}), "x").await, None);
        assert_eq!(eval(&rule, json!({"x": 10}), "x").await, None);
        assert_eq!(
            eval(&rule, json!({"x": 11}), "x").await.as_deref(),
            Some("Must be at most 10")
        );
        // Wrong type: silently skipped.
        assert_eq!(eval(&rule, json!({"x": "not a number"}), "x").await, None);
    }

    #[tokio::test]
    async fn length_bounds_count_chars_not_bytes() {
        let rule = Rule::new().min_length(3);
        assert_eq!(eval(&rule, json!({"x": "åäö"}), "x").await, None);
        assert_eq!(
            eval(&rule, json!({"x": "åä"}), "x").await.as_deref(),
            Some("Must be at least 3 characters")
        );
        // Wrong type: skipped.
        assert_eq!(eval(&rule, json!({"x": 12}), "x").await, None);
    }

    #[tokio::test]
    async fn pattern_matches_strings_only() {
        let rule = Rule::new().pattern(Regex::new(r"^\S+@\S+$").unwrap());
        assert_eq!(eval(&rule, json!({"x": "a@b"}), "x").await, None);
        assert_eq!(
            eval(&rule, json!({"x": "a"}), "x").await.as_deref(),
            Some(INVALID_FORMAT)
        );
        assert_eq!(eval(&rule, json!({"x": 42}), "x").await, None);
    }

    #[tokio::test]
    async fn equals_compares_sibling_paths_deeply() {
        let rule = Rule::new().equals("password");
        let ok = json!({"confirm": "hunter2", "password": "hunter2"});
        assert_eq!(eval(&rule, ok, "confirm").await, None);

        let bad = json!({"confirm": "hunter", "password": "hunter2"});
        assert_eq!(
            eval(&rule, bad, "confirm").await.as_deref(),
            Some("Must match password")
        );

        // Both sides absent compare equal.
        let rule = Rule::new().equals("also_missing");
        assert_eq!(eval(&rule, json!({}), "missing").await, None);
    }

    #[tokio::test]
    async fn equals_distinguishes_null_from_missing() {
        let rule = Rule::new().equals(("other", "No match"));
        let values = json!({"x": null});
        assert_eq!(
            eval(&rule, values, "x").await.as_deref(),
            Some("No match")
        );
    }

    #[tokio::test]
    async fn custom_check_verdicts() {
        let generic = Rule::new().check(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(eval(&generic, json!({"x": 4}), "x").await, None);
        assert_eq!(
            eval(&generic, json!({"x": 3}), "x").await.as_deref(),
            Some(INVALID_VALUE)
        );

        let worded = Rule::new().check(|v, _| {
            if v.as_str() == Some("taken") {
                "Name already taken".into()
            } else {
                crate::Verdict::Valid
            }
        });
        assert_eq!(
            eval(&worded, json!({"x": "taken"}), "x").await.as_deref(),
            Some("Name already taken")
        );
        assert_eq!(eval(&worded, json!({"x": "free"}), "x").await, None);
    }

    #[tokio::test]
    async fn async_check_awaits_before_verdict() {
        let rule = Rule::new().check_async(|value, _| async move {
            tokio::task::yield_now().await;
            value.as_str().is_some_and(|s| !s.contains(' '))
        });
        assert_eq!(eval(&rule, json!({"x": "ok"}), "x").await, None);
        assert_eq!(
            eval(&rule, json!({"x": "not ok"}), "x").await.as_deref(),
            Some(INVALID_VALUE)
        );
    }

    #[tokio::test]
    async fn missing_value_reaches_custom_check_as_null() {
        let rule = Rule::new().check(|v, _| v.is_null());
        assert_eq!(eval(&rule, json!({}), "ghost").await, None);
    }

    #[tokio::test]
    async fn short_circuit_stops_at_first_failure() {
        let rule = Rule::new()
            .required(true)
            .min_length(5)
            .pattern(Regex::new("^x").unwrap());
        // min_length fails first; the pattern message never surfaces.
        assert_eq!(
            eval(&rule, json!({"x": "abc"}), "x").await.as_deref(),
            Some("Must be at least 5 characters")
        );
    }

    #[tokio::test]
    async fn run_rules_collects_per_path() {
        let rules = crate::Rules::new()
            .field("a", Rule::new().required(true))
            .field("b", Rule::new().min(10))
            .field("c", Rule::new().max(10));
        let errors = run_rules(&rules, &json!({"b": 3, "c": 3})).await;
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("a"));
        assert!(errors.contains_key("b"));
        assert!(!errors.contains_key("c"));
    }

    #[tokio::test]
    async fn form_check_sync_and_async() {
        let values = json!({"a": 1});

        let sync = FormCheck::new(|_| {
            let mut out = BTreeMap::new();
            out.insert("a".to_owned(), "whole-form says no".to_owned());
            out
        });
        let errors = run_form_check(Some(&sync), &values).await;
        assert_eq!(errors["a"], "whole-form says no");

        let asynced = FormCheck::new_async(|_| async { BTreeMap::new() });
        assert!(run_form_check(Some(&asynced), &values).await.is_empty());

        assert!(run_form_check(None, &values).await.is_empty());
    }
}
