//! Flattening of nested values into per-path leaf entries.
//!
//! Flattening seeds the per-field tracking state (touched/dirty) with one
//! entry for every addressable leaf of a form value, including array
//! elements.

use serde_json::Value;
use std::collections::BTreeMap;

/// Flatten a nested value into a mapping from dotted path to leaf value.
///
/// Objects contribute their leaves under `prefix.key`; arrays are recorded
/// both as a whole (the array is itself a trackable value, so add/remove
/// dirties it) and element by element under `prefix.index`. Anything else
/// is a leaf. An empty object contributes nothing.
///
/// # Examples
///
/// ```
/// use formwork::flatten;
/// use serde_json::json;
///
/// let flat = flatten(&json!({"user": {"tags": ["a", "b"]}}));
/// assert_eq!(flat["user.tags"], json!(["a", "b"]));
/// assert_eq!(flat["user.tags.0"], json!("a"));
/// assert_eq!(flat["user.tags.1"], json!("b"));
/// ```
pub fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(value, "", &mut out);
    out
}

/// Flatten `value` as if it lived at `prefix` inside a larger root.
///
/// Used when a single array element is inserted and its leaves need
/// tracking entries keyed by their absolute paths.
pub(crate) fn flatten_at(value: &Value, prefix: &str) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(value, prefix, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join(prefix, key), out);
            }
        }
        Value::Array(items) => {
            // The root itself is not addressable by a path string, so a
            // top-level array only contributes its elements.
            if !prefix.is_empty() {
                out.insert(prefix.to_owned(), value.clone());
            }
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join(prefix, &index.to_string()), out);
            }
        }
        leaf => {
            if !prefix.is_empty() {
                out.insert(prefix.to_owned(), leaf.clone());
            }
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}
