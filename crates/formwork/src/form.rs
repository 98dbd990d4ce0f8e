//! Form state controller.
//!
//! `Form` owns the mutable state bundle (values, errors, touched, dirty,
//! lifecycle flags), exposes field bindings and array operations, and
//! decides when the validation pipeline runs (on change, on blur, on
//! submit) including debounce scheduling. One `Form` per form surface;
//! clones share the same bundle.

use crate::error::{value_kind, FormError, FormResult};
use crate::flatten::{flatten, flatten_at};
use crate::resolve::{get_at, set_at, set_at_checked};
use crate::rule::{FormCheck, Rules};
use crate::{validate, Path};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// When the controller triggers validation, and how writes treat
/// incompatible containers.
#[derive(Clone, Debug, Default)]
pub struct FormConfig {
    pub(crate) validate_on_change: bool,
    pub(crate) validate_on_blur: bool,
    pub(crate) debounce: Option<Duration>,
    pub(crate) strict_paths: bool,
}

impl FormConfig {
    /// All triggers off, coercing writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a field whenever its value changes.
    pub fn validate_on_change(mut self, on: bool) -> Self {
        self.validate_on_change = on;
        self
    }

    /// Validate a field on its first blur.
    pub fn validate_on_blur(mut self, on: bool) -> Self {
        self.validate_on_blur = on;
        self
    }

    /// Delay change-triggered validation until the field has been quiet
    /// for `interval`; rapid edits coalesce into one validation of the
    /// settled value. Blur- and submit-triggered validation is never
    /// debounced.
    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = Some(interval);
        self
    }

    /// Reject writes that would coerce away an incompatible container
    /// (see [`crate::set_at_checked`]) instead of silently discarding it.
    pub fn strict_paths(mut self, on: bool) -> Self {
        self.strict_paths = on;
        self
    }
}

/// The full mutable state bundle of one form instance.
#[derive(Clone, Debug)]
pub struct FormState {
    /// The current (possibly nested) data value.
    pub values: Value,
    /// Path → current error message. Absent means no error.
    pub errors: BTreeMap<String, String>,
    /// Path → true once the field has blurred at least once.
    pub touched: BTreeMap<String, bool>,
    /// Path → true once the field has been written since the last reset.
    pub dirty: BTreeMap<String, bool>,
    /// A submit is in flight.
    pub submitting: bool,
    /// A whole-form validation pass is in flight.
    pub validating: bool,
    /// A submit has completed successfully at least once.
    pub submitted: bool,
}

impl FormState {
    /// True when no field currently has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn new(values: Value) -> Self {
        let seeded = seed_tracking(&values);
        FormState {
            values,
            errors: BTreeMap::new(),
            touched: seeded.clone(),
            dirty: seeded,
            submitting: false,
            validating: false,
            submitted: false,
        }
    }
}

/// What a submit attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed and the handler completed.
    Submitted,
    /// Validation failed; the handler was never invoked.
    Invalid,
    /// Another submit was already in flight; nothing ran.
    AlreadySubmitting,
}

type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

struct FormInner {
    config: FormConfig,
    rules: Rules,
    form_check: Option<FormCheck>,
    transform: Option<Transform>,
    initial: Mutex<Value>,
    state: RwLock<FormState>,
    /// One pending debounce timer per path; a newer edit aborts and
    /// replaces the old timer.
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
    /// Per-path validation generation counters. Only the most recently
    /// initiated validation for a path may commit its result.
    epochs: Mutex<HashMap<String, u64>>,
}

impl Drop for FormInner {
    fn drop(&mut self) {
        // A discarded form must not leave timer tasks mutating a dead
        // bundle.
        if let Ok(mut timers) = self.timers.lock() {
            for (_, task) in timers.drain() {
                task.abort();
            }
        }
    }
}

/// Configures and creates a [`Form`].
pub struct FormBuilder {
    initial: Value,
    config: FormConfig,
    rules: Rules,
    form_check: Option<FormCheck>,
    transform: Option<Transform>,
}

impl FormBuilder {
    /// Set the trigger/debounce configuration.
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-field rule registry.
    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Attach a whole-form validator.
    pub fn form_check(mut self, check: FormCheck) -> Self {
        self.form_check = Some(check);
        self
    }

    /// Transform the values before they are handed to a submit handler.
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Build the form. Touched/dirty tracking is seeded `false` for every
    /// flattened path of the initial snapshot.
    pub fn build(self) -> Form {
        Form {
            inner: Arc::new(FormInner {
                config: self.config,
                rules: self.rules,
                form_check: self.form_check,
                transform: self.transform,
                initial: Mutex::new(self.initial.clone()),
                state: RwLock::new(FormState::new(self.initial)),
                timers: Mutex::new(HashMap::new()),
                epochs: Mutex::new(HashMap::new()),
            }),
        }
    }
}

/// The form state controller.
///
/// Cheap to clone; all clones share one state bundle. The bundle is only
/// ever mutated through these methods (single-writer), and validators
/// receive value snapshots, never live references.
///
/// # Examples
///
/// ```
/// use formwork::{Form, Rule, Rules};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let form = Form::builder(json!({"email": "", "age": 0}))
///     .rules(Rules::new().field("email", Rule::new().required("Email required")))
///     .build();
///
/// form.set_value("email", "ada@example.com").await.unwrap();
/// assert!(form.validate().await);
/// # }
/// ```
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form").finish_non_exhaustive()
    }
}

impl Form {
    /// Create a form with no rules and default configuration.
    pub fn new(initial: Value) -> Self {
        Form::builder(initial).build()
    }

    /// Start configuring a form over an initial snapshot.
    pub fn builder(initial: Value) -> FormBuilder {
        FormBuilder {
            initial,
            config: FormConfig::default(),
            rules: Rules::default(),
            form_check: None,
            transform: None,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Clone the full state bundle.
    pub async fn state(&self) -> FormState {
        self.inner.state.read().await.clone()
    }

    /// Clone the current values root.
    pub async fn values(&self) -> Value {
        self.inner.state.read().await.values.clone()
    }

    /// Read the value at a path. The empty path resolves to `None`.
    pub async fn value(&self, path: &str) -> Option<Value> {
        let parsed = Path::parse(path);
        if parsed.is_empty() {
            return None;
        }
        let state = self.inner.state.read().await;
        get_at(&state.values, &parsed).cloned()
    }

    /// The current error message for a path, if any.
    pub async fn error(&self, path: &str) -> Option<String> {
        self.inner.state.read().await.errors.get(path).cloned()
    }

    /// True once the field has been written since the last reset.
    pub async fn is_dirty(&self, path: &str) -> bool {
        self.inner
            .state
            .read()
            .await
            .dirty
            .get(path)
            .copied()
            .unwrap_or(false)
    }

    /// True once the field has blurred at least once.
    pub async fn is_touched(&self, path: &str) -> bool {
        self.inner
            .state
            .read()
            .await
            .touched
            .get(path)
            .copied()
            .unwrap_or(false)
    }

    /// A submit is in flight.
    pub async fn is_submitting(&self) -> bool {
        self.inner.state.read().await.submitting
    }

    /// A whole-form validation pass is in flight.
    pub async fn is_validating(&self) -> bool {
        self.inner.state.read().await.validating
    }

    /// A submit has completed successfully at least once.
    pub async fn has_submitted(&self) -> bool {
        self.inner.state.read().await.submitted
    }

    /// Get a binding handle for one field.
    pub fn field(&self, path: impl Into<String>) -> Field {
        Field {
            form: self.clone(),
            path: path.into(),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write a value at a path and mark it dirty.
    ///
    /// The values root is replaced by a new one; the previous root is
    /// never mutated. When `validate_on_change` is configured the path is
    /// validated, immediately or after the configured debounce.
    pub async fn set_value<T: Serialize>(&self, path: &str, value: T) -> FormResult<()> {
        let value = serde_json::to_value(value)?;
        self.apply_value(path, value).await?;
        self.after_change(path).await;
        Ok(())
    }

    /// Shallow-merge a partial object into the top level of the values.
    ///
    /// Each provided top-level key fully replaces its counterpart (no deep
    /// merge). Every flattened path under the partial is marked dirty.
    /// Both the partial and the current root must be objects.
    pub async fn set_values(&self, partial: Value) -> FormResult<()> {
        let Value::Object(entries) = partial else {
            return Err(FormError::merge_requires_object(value_kind(&partial)));
        };

        let mut state = self.inner.state.write().await;
        let mut next = state.values.clone();
        let Some(root) = next.as_object_mut() else {
            return Err(FormError::merge_requires_object(value_kind(&state.values)));
        };
        for (key, value) in &entries {
            root.insert(key.clone(), value.clone());
        }
        state.values = next;

        let merged = Value::Object(entries);
        for path in flatten(&merged).keys() {
            state.dirty.insert(path.clone(), true);
        }
        debug!(keys = merged.as_object().map_or(0, |m| m.len()), "values merged");
        Ok(())
    }

    /// Mark a field touched. On its first transition to touched, runs
    /// validation for the path when `validate_on_blur` is configured.
    pub async fn blur(&self, path: &str) {
        let first = {
            let mut state = self.inner.state.write().await;
            let already = state.touched.get(path).copied().unwrap_or(false);
            state.touched.insert(path.to_owned(), true);
            !already
        };
        trace!(%path, first, "field blurred");
        if first && self.inner.config.validate_on_blur {
            let _ = self.validate_field(path).await;
        }
    }

    /// Replace the snapshot that subsequent [`Form::reset`] calls restore.
    pub fn set_initial_values(&self, values: Value) {
        *self.inner.initial.lock().unwrap() = values;
    }

    // =========================================================================
    // Array operations
    // =========================================================================

    /// Append an item to the array at `path`.
    ///
    /// Tracking entries for the new element's paths are seeded `false`.
    /// Returns a usage error when the path does not hold an array.
    pub async fn insert_item<T: Serialize>(&self, path: &str, item: T) -> FormResult<()> {
        let item = serde_json::to_value(item)?;
        let (_, mut items) = self.read_list(path).await?;
        let index = items.len();
        items.push(item.clone());
        self.apply_value(path, Value::Array(items)).await?;
        {
            let mut state = self.inner.state.write().await;
            for leaf in flatten_at(&item, &format!("{path}.{index}")).keys() {
                state.touched.entry(leaf.clone()).or_insert(false);
                state.dirty.entry(leaf.clone()).or_insert(false);
            }
        }
        self.after_change(path).await;
        Ok(())
    }

    /// Remove the item at `index` from the array at `path`.
    ///
    /// Tracked per-element state (errors/touched/dirty) follows the
    /// elements: entries for the removed index are dropped and higher
    /// indices shift down.
    pub async fn remove_item(&self, path: &str, index: usize) -> FormResult<()> {
        let (parsed, mut items) = self.read_list(path).await?;
        if index >= items.len() {
            return Err(FormError::index_out_of_bounds(parsed, index, items.len()));
        }
        items.remove(index);
        self.apply_value(path, Value::Array(items)).await?;
        self.rekey(&parsed, |i| {
            if i == index {
                IndexFate::Dropped
            } else if i > index {
                IndexFate::Keep(i - 1)
            } else {
                IndexFate::Keep(i)
            }
        })
        .await;
        self.after_change(path).await;
        Ok(())
    }

    /// Move the item at `from` to position `to`, shifting the items in
    /// between. Tracked per-element state follows the elements.
    pub async fn reorder_item(&self, path: &str, from: usize, to: usize) -> FormResult<()> {
        let (parsed, mut items) = self.read_list(path).await?;
        let len = items.len();
        if from >= len {
            return Err(FormError::index_out_of_bounds(parsed, from, len));
        }
        if to >= len {
            return Err(FormError::index_out_of_bounds(parsed, to, len));
        }
        let item = items.remove(from);
        items.insert(to, item);
        self.apply_value(path, Value::Array(items)).await?;
        self.rekey(&parsed, |i| {
            if i == from {
                IndexFate::Keep(to)
            } else if from < to && i > from && i <= to {
                IndexFate::Keep(i - 1)
            } else if to < from && i >= to && i < from {
                IndexFate::Keep(i + 1)
            } else {
                IndexFate::Keep(i)
            }
        })
        .await;
        self.after_change(path).await;
        Ok(())
    }

    /// Exchange the items at `a` and `b`. Tracked per-element state is
    /// exchanged with them.
    pub async fn swap_item(&self, path: &str, a: usize, b: usize) -> FormResult<()> {
        let (parsed, mut items) = self.read_list(path).await?;
        let len = items.len();
        if a >= len {
            return Err(FormError::index_out_of_bounds(parsed, a, len));
        }
        if b >= len {
            return Err(FormError::index_out_of_bounds(parsed, b, len));
        }
        items.swap(a, b);
        self.apply_value(path, Value::Array(items)).await?;
        self.rekey(&parsed, |i| {
            if i == a {
                IndexFate::Keep(b)
            } else if i == b {
                IndexFate::Keep(a)
            } else {
                IndexFate::Keep(i)
            }
        })
        .await;
        self.after_change(path).await;
        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Run the pipeline for one path and commit the outcome.
    ///
    /// Commits are guarded by a per-path generation counter: if a newer
    /// validation for the same path was initiated while this one awaited
    /// an async check, the stale result is discarded instead of
    /// overwriting the newer one. Returns the computed message either way.
    pub async fn validate_field(&self, path: &str) -> Option<String> {
        let rule = self.inner.rules.get(path)?;
        let epoch = self.bump_epoch(path);
        let values = self.inner.state.read().await.values.clone();
        let outcome = validate::run_rule(path, rule, &values).await;

        let mut state = self.inner.state.write().await;
        if self.current_epoch(path) != epoch {
            trace!(%path, "stale validation result discarded");
            return outcome;
        }
        match &outcome {
            Some(message) => {
                state.errors.insert(path.to_owned(), message.clone());
            }
            None => {
                state.errors.remove(path);
            }
        }
        outcome
    }

    /// Validate every registered rule plus the whole-form check.
    ///
    /// The merged error set replaces `errors` wholesale, clearing stale
    /// entries for paths that no longer fail. Returns whether the merged
    /// set is empty. Paths whose validation was re-initiated mid-flight
    /// keep the newer result.
    pub async fn validate(&self) -> bool {
        self.inner.state.write().await.validating = true;
        let values = self.inner.state.read().await.values.clone();
        let initiated: BTreeMap<String, u64> = self
            .inner
            .rules
            .paths()
            .map(|path| (path.clone(), self.bump_epoch(path)))
            .collect();

        let mut merged = validate::run_rules(&self.inner.rules, &values).await;
        merged.extend(validate::run_form_check(self.inner.form_check.as_ref(), &values).await);
        merged.retain(|_, message| !message.is_empty());

        let mut state = self.inner.state.write().await;
        for (path, started) in &initiated {
            if self.current_epoch(path) != *started {
                // A newer per-field validation owns this path now.
                match state.errors.get(path) {
                    Some(existing) => {
                        merged.insert(path.clone(), existing.clone());
                    }
                    None => {
                        merged.remove(path);
                    }
                }
            }
        }
        let valid = merged.is_empty();
        state.errors = merged;
        state.validating = false;
        debug!(valid, "form validated");
        valid
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Validate, then run the submit handler when the form is valid.
    ///
    /// Re-entrant submits are ignored while one is in flight. The
    /// `submitting` flag is cleared on every exit path; a handler error
    /// propagates to the caller after that reset. The handler is never
    /// invoked when validation fails.
    pub async fn submit<F, Fut, E>(&self, handler: F) -> Result<SubmitOutcome, E>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        {
            let mut state = self.inner.state.write().await;
            if state.submitting {
                debug!("submit ignored: already submitting");
                return Ok(SubmitOutcome::AlreadySubmitting);
            }
            state.submitting = true;
        }

        let valid = self.validate().await;
        let outcome = if valid {
            let values = self.inner.state.read().await.values.clone();
            let payload = match &self.inner.transform {
                Some(transform) => transform(values),
                None => values,
            };
            match handler(payload).await {
                Ok(()) => {
                    self.inner.state.write().await.submitted = true;
                    debug!("form submitted");
                    Ok(SubmitOutcome::Submitted)
                }
                Err(error) => Err(error),
            }
        } else {
            debug!("submit blocked by validation");
            Ok(SubmitOutcome::Invalid)
        };

        self.inner.state.write().await.submitting = false;
        outcome
    }

    /// Restore a fresh copy of the initial snapshot.
    ///
    /// Cancels all pending debounce timers, orphans in-flight
    /// validations, clears errors, and reseeds touched/dirty to `false`
    /// for every flattened snapshot path. Idempotent.
    pub async fn reset(&self) {
        self.cancel_timers();
        {
            let mut epochs = self.inner.epochs.lock().unwrap();
            for counter in epochs.values_mut() {
                *counter += 1;
            }
        }
        let snapshot = self.inner.initial.lock().unwrap().clone();
        let mut state = self.inner.state.write().await;
        *state = FormState::new(snapshot);
        debug!("form reset");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Pure write into the values root plus dirty marking. The empty path
    /// is rejected: it addresses nothing.
    async fn apply_value(&self, path: &str, value: Value) -> FormResult<()> {
        let parsed = Path::parse(path);
        if parsed.is_empty() {
            return Err(FormError::path_not_found(parsed));
        }
        let mut state = self.inner.state.write().await;
        state.values = if self.inner.config.strict_paths {
            set_at_checked(&state.values, &parsed, value)?
        } else {
            set_at(&state.values, &parsed, value)
        };
        state.dirty.insert(path.to_owned(), true);
        trace!(%path, "field value written");
        Ok(())
    }

    /// Apply the change-triggered validation policy for a path.
    async fn after_change(&self, path: &str) {
        if !self.inner.config.validate_on_change {
            return;
        }
        match self.inner.config.debounce {
            Some(interval) => self.restart_timer(path, interval),
            None => {
                let _ = self.validate_field(path).await;
            }
        }
    }

    /// Abort any pending timer for the path and schedule a fresh one, so
    /// only the settled value gets validated.
    fn restart_timer(&self, path: &str, interval: Duration) {
        let weak = Arc::downgrade(&self.inner);
        let owned = path.to_owned();
        let task = tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // The form may have been discarded while we slept.
            if let Some(inner) = weak.upgrade() {
                let form = Form { inner };
                let _ = form.validate_field(&owned).await;
            }
        });
        let mut timers = self.inner.timers.lock().unwrap();
        if let Some(stale) = timers.insert(path.to_owned(), task) {
            stale.abort();
        }
    }

    fn cancel_timers(&self) {
        let mut timers = self.inner.timers.lock().unwrap();
        for (_, task) in timers.drain() {
            task.abort();
        }
    }

    fn bump_epoch(&self, path: &str) -> u64 {
        let mut epochs = self.inner.epochs.lock().unwrap();
        let counter = epochs.entry(path.to_owned()).or_insert(0);
        *counter += 1;
        *counter
    }

    fn current_epoch(&self, path: &str) -> u64 {
        self.inner
            .epochs
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Read the array at a path, or signal a usage error.
    async fn read_list(&self, path: &str) -> FormResult<(Path, Vec<Value>)> {
        let parsed = Path::parse(path);
        if parsed.is_empty() {
            return Err(FormError::path_not_found(parsed));
        }
        let state = self.inner.state.read().await;
        match get_at(&state.values, &parsed) {
            Some(Value::Array(items)) => {
                let items = items.clone();
                Ok((parsed, items))
            }
            Some(other) => Err(FormError::not_an_array(parsed, value_kind(other))),
            None => Err(FormError::path_not_found(parsed)),
        }
    }

    /// Re-key tracked per-element entries of all three maps after a
    /// structural array change.
    async fn rekey(&self, list: &Path, remap: impl Fn(usize) -> IndexFate) {
        let mut state = self.inner.state.write().await;
        rekey_tracked(&mut state.errors, list, &remap);
        rekey_tracked(&mut state.touched, list, &remap);
        rekey_tracked(&mut state.dirty, list, &remap);
    }
}

/// A binding handle for one field: current value, setter, blur handler,
/// and tracking accessors. Holds a clone of the form.
#[derive(Clone, Debug)]
pub struct Field {
    form: Form,
    path: String,
}

impl Field {
    /// The path this binding addresses.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current value at the path.
    pub async fn value(&self) -> Option<Value> {
        self.form.value(&self.path).await
    }

    /// Write a value and mark the field dirty (change-validation policy
    /// applies).
    pub async fn set<T: Serialize>(&self, value: T) -> FormResult<()> {
        self.form.set_value(&self.path, value).await
    }

    /// Mark the field touched (blur-validation policy applies).
    pub async fn blur(&self) {
        self.form.blur(&self.path).await;
    }

    /// Current error message, if any.
    pub async fn error(&self) -> Option<String> {
        self.form.error(&self.path).await
    }

    /// True once the field has been written since the last reset.
    pub async fn is_dirty(&self) -> bool {
        self.form.is_dirty(&self.path).await
    }

    /// True once the field has blurred at least once.
    pub async fn is_touched(&self) -> bool {
        self.form.is_touched(&self.path).await
    }
}

/// Where a tracked per-element entry goes after a structural change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IndexFate {
    Keep(usize),
    Dropped,
}

fn seed_tracking(snapshot: &Value) -> BTreeMap<String, bool> {
    flatten(snapshot).into_keys().map(|key| (key, false)).collect()
}

/// Apply an index remapping to every entry of `map` that addresses an
/// element of the array at `list` (directly or through a nested path).
///
/// Removals happen before re-insertions so a shifted entry cannot clobber
/// one that has not moved yet.
fn rekey_tracked<V: Clone>(
    map: &mut BTreeMap<String, V>,
    list: &Path,
    remap: &impl Fn(usize) -> IndexFate,
) {
    let mut moves: Vec<(String, Option<(String, V)>)> = Vec::new();
    for (key, value) in map.iter() {
        let parsed = Path::parse(key);
        if !list.is_prefix_of(&parsed) || parsed.len() <= list.len() {
            continue;
        }
        let Some(index) = parsed[list.len()].as_index() else {
            continue;
        };
        match remap(index) {
            IndexFate::Keep(next) if next == index => {}
            IndexFate::Keep(next) => {
                let mut segments = parsed.segments().to_vec();
                segments[list.len()] = crate::Seg::Index(next);
                let renamed = Path::from_segments(segments).to_string();
                moves.push((key.clone(), Some((renamed, value.clone()))));
            }
            IndexFate::Dropped => moves.push((key.clone(), None)),
        }
    }
    for (old, _) in &moves {
        map.remove(old);
    }
    for (_, replacement) in moves {
        if let Some((key, value)) = replacement {
            map.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn rekey_remove_shifts_higher_indices_down() {
        let mut map = tracked(&[
            ("items.0.name", "a"),
            ("items.1.name", "b"),
            ("items.2.name", "c"),
            ("items", "whole"),
            ("other.1", "unrelated"),
        ]);
        let list = Path::parse("items");
        rekey_tracked(&mut map, &list, &|i| {
            if i == 1 {
                IndexFate::Dropped
            } else if i > 1 {
                IndexFate::Keep(i - 1)
            } else {
                IndexFate::Keep(i)
            }
        });
        assert_eq!(map["items.0.name"], "a");
        assert_eq!(map["items.1.name"], "c");
        assert!(!map.contains_key("items.2.name"));
        assert_eq!(map["items"], "whole");
        assert_eq!(map["other.1"], "unrelated");
    }

    #[test]
    fn rekey_swap_exchanges_entries() {
        let mut map = tracked(&[("items.0", "a"), ("items.2", "c")]);
        let list = Path::parse("items");
        rekey_tracked(&mut map, &list, &|i| {
            if i == 0 {
                IndexFate::Keep(2)
            } else if i == 2 {
                IndexFate::Keep(0)
            } else {
                IndexFate::Keep(i)
            }
        });
        assert_eq!(map["items.0"], "c");
        assert_eq!(map["items.2"], "a");
    }

    #[test]
    fn rekey_ignores_non_element_suffixes() {
        let mut map = tracked(&[("items.count", "not an index")]);
        let list = Path::parse("items");
        rekey_tracked(&mut map, &list, &|_| IndexFate::Dropped);
        assert_eq!(map["items.count"], "not an index");
    }

    #[test]
    fn config_builder_sets_every_knob() {
        let config = FormConfig::new()
            .validate_on_change(true)
            .validate_on_blur(true)
            .debounce(Duration::from_millis(300))
            .strict_paths(true);
        assert!(config.validate_on_change);
        assert!(config.validate_on_blur);
        assert_eq!(config.debounce, Some(Duration::from_millis(300)));
        assert!(config.strict_paths);
    }

    #[test]
    fn seeded_tracking_covers_array_elements() {
        let seeded = seed_tracking(&serde_json::json!({"tags": ["a"], "n": 1}));
        assert_eq!(seeded.len(), 3);
        assert_eq!(seeded.get("tags"), Some(&false));
        assert_eq!(seeded.get("tags.0"), Some(&false));
        assert_eq!(seeded.get("n"), Some(&false));
    }
}
