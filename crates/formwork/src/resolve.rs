//! Path resolution: reading and pure writing of nested form values.
//!
//! Reads are tolerant: any miss or kind mismatch short-circuits to `None`
//! rather than failing. Writes are pure functions in the spirit of
//! copy-on-write: the input root is never mutated; the result is a new
//! root that differs only along the written path.

use crate::error::{value_kind, FormError, FormResult};
use crate::{Path, Seg};
use serde_json::{Map, Value};

/// Read the value at `path` inside `root`.
///
/// Key segments index objects; index segments index arrays. A numeric
/// segment applied to an object falls back to a lookup by its decimal
/// key, so dynamically built paths keep working against map-shaped data.
/// Any other mismatch, or a missing step, resolves to `None`; resolution
/// never panics.
///
/// # Examples
///
/// ```
/// use formwork::{get_at, Path};
/// use serde_json::json;
///
/// let root = json!({"users": [{"name": "Ada"}]});
/// assert_eq!(
///     get_at(&root, &Path::parse("users.0.name")),
///     Some(&json!("Ada"))
/// );
/// assert_eq!(get_at(&root, &Path::parse("users.1.name")), None);
/// assert_eq!(get_at(&root, &Path::parse("users.0.name.x")), None);
/// ```
pub fn get_at<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for seg in path.iter() {
        current = match (current, seg) {
            (Value::Array(arr), Seg::Index(i)) => arr.get(*i)?,
            (Value::Object(map), Seg::Key(k)) => map.get(k)?,
            (Value::Object(map), Seg::Index(i)) => map.get(&i.to_string())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, producing a new root.
///
/// The input root is not mutated. Missing intermediate containers are
/// created: an array when the next segment is an index, an object
/// otherwise. Writing past the end of an array pads it with `null` up to
/// the target index. An existing container of the wrong kind for the next
/// segment is coerced: replaced by an empty container of the needed
/// kind, discarding what was there. Use [`set_at_checked`] to surface
/// that case as an error instead.
///
/// # Examples
///
/// ```
/// use formwork::{get_at, set_at, Path};
/// use serde_json::json;
///
/// let root = json!({"user": {"name": "Ada"}});
/// let next = set_at(&root, &Path::parse("user.tags.1"), json!("admin"));
///
/// assert_eq!(next, json!({"user": {"name": "Ada", "tags": [null, "admin"]}}));
/// // The original is unchanged.
/// assert_eq!(root, json!({"user": {"name": "Ada"}}));
/// ```
pub fn set_at(root: &Value, path: &Path, value: Value) -> Value {
    let mut next = root.clone();
    write_at(&mut next, path.segments(), value, Policy::Coerce, path, 0)
        .expect("coercing write cannot fail");
    next
}

/// Strict-mode variant of [`set_at`].
///
/// Identical, except that an existing container of the wrong kind for the
/// next segment yields [`FormError::ShapeMismatch`] instead of being
/// silently replaced. Missing steps and `null` placeholders are still
/// created in both modes.
pub fn set_at_checked(root: &Value, path: &Path, value: Value) -> FormResult<Value> {
    let mut next = root.clone();
    write_at(&mut next, path.segments(), value, Policy::Strict, path, 0)?;
    Ok(next)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Policy {
    Coerce,
    Strict,
}

/// Recursive in-place write along the spine of an owned clone.
///
/// `consumed` tracks how many segments of `full` precede `segments`, so
/// strict-mode errors can report the prefix where the mismatch occurred.
fn write_at(
    current: &mut Value,
    segments: &[Seg],
    value: Value,
    policy: Policy,
    full: &Path,
    consumed: usize,
) -> FormResult<()> {
    let Some((seg, rest)) = segments.split_first() else {
        *current = value;
        return Ok(());
    };

    match seg {
        Seg::Key(key) => {
            if !current.is_object() {
                coerce(current, "object", policy, full, consumed)?;
                *current = Value::Object(Map::new());
            }
            let obj = current.as_object_mut().expect("checked object above");
            if rest.is_empty() {
                obj.insert(key.clone(), value);
                Ok(())
            } else {
                let entry = obj.entry(key.clone()).or_insert(Value::Null);
                write_at(entry, rest, value, policy, full, consumed + 1)
            }
        }
        Seg::Index(idx) => {
            if !current.is_array() {
                coerce(current, "array", policy, full, consumed)?;
                *current = Value::Array(Vec::new());
            }
            let arr = current.as_array_mut().expect("checked array above");
            if *idx >= arr.len() {
                arr.resize(*idx + 1, Value::Null);
            }
            if rest.is_empty() {
                arr[*idx] = value;
                Ok(())
            } else {
                write_at(&mut arr[*idx], rest, value, policy, full, consumed + 1)
            }
        }
    }
}

/// Gate a container replacement: `null` is always fair game, anything else
/// is data loss and is rejected under [`Policy::Strict`].
fn coerce(
    current: &Value,
    expected: &'static str,
    policy: Policy,
    full: &Path,
    consumed: usize,
) -> FormResult<()> {
    if current.is_null() || policy == Policy::Coerce {
        return Ok(());
    }
    Err(FormError::shape_mismatch(
        Path::from_segments(full.segments()[..consumed].to_vec()),
        expected,
        value_kind(current),
    ))
}
