//! Usage-error types for form engine operations.
//!
//! These errors signal caller or schema bugs (a list operation on a
//! non-array path, a write into an incompatible container in strict mode).
//! They are deliberately distinct from validation errors, which are plain
//! message strings in [`FormState::errors`](crate::FormState) and are never
//! raised through this type.

use crate::Path;
use thiserror::Error;

/// Result type alias for form engine operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors that signal a programming mistake by the engine's caller.
#[derive(Debug, Error)]
pub enum FormError {
    /// A list operation targeted a path that does not hold an array.
    #[error("list operation on non-array at {path}: found {found}")]
    NotAnArray {
        /// The path that was targeted.
        path: Path,
        /// The kind of value actually found there.
        found: &'static str,
    },

    /// A list operation targeted a path that resolves to nothing.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The path that was not found.
        path: Path,
    },

    /// A list operation used an index past the end of the array.
    #[error("index {index} out of bounds (len: {len}) at {path}")]
    IndexOutOfBounds {
        /// The path to the array.
        path: Path,
        /// The index that was accessed.
        index: usize,
        /// The actual length of the array.
        len: usize,
    },

    /// A strict-mode write would have discarded an incompatible container.
    #[error("incompatible container at {path}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// The path of the incompatible container.
        path: Path,
        /// The container kind the path requires.
        expected: &'static str,
        /// The kind of value actually found there.
        found: &'static str,
    },

    /// A top-level merge was attempted with a non-object operand.
    #[error("top-level merge requires an object: found {found}")]
    MergeRequiresObject {
        /// The kind of the offending value.
        found: &'static str,
    },

    /// A value passed to a setter failed JSON serialization.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormError {
    /// Create a not-an-array error.
    #[inline]
    pub fn not_an_array(path: Path, found: &'static str) -> Self {
        FormError::NotAnArray { path, found }
    }

    /// Create a path-not-found error.
    #[inline]
    pub fn path_not_found(path: Path) -> Self {
        FormError::PathNotFound { path }
    }

    /// Create an index-out-of-bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: usize, len: usize) -> Self {
        FormError::IndexOutOfBounds { path, index, len }
    }

    /// Create a shape-mismatch error.
    #[inline]
    pub fn shape_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        FormError::ShapeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create a merge-requires-object error.
    #[inline]
    pub fn merge_requires_object(found: &'static str) -> Self {
        FormError::MergeRequiresObject { found }
    }
}

/// Get the kind name of a JSON value, for error messages.
#[inline]
pub fn value_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
