//! Path-addressable form state and validation engine.
//!
//! `formwork` is the state core behind data-entry surfaces: it addresses
//! fields of a deeply nested value by dotted path strings, tracks
//! per-field error/touched/dirty state independent of the data's shape,
//! runs a declarative validation pipeline (sync and async, per-field and
//! whole-form) with optional debouncing, and keeps all derived state
//! consistent across array mutations.
//!
//! # Core Concepts
//!
//! - **Path**: `user.addresses.0.city`, dotted segments where numeric
//!   segments index arrays ([`Path`], [`get_at`], [`set_at`])
//! - **Flattening**: one tracking entry per addressable leaf ([`flatten`])
//! - **Rules**: declarative per-field checks plus custom sync/async
//!   predicates ([`Rule`], [`Rules`], [`Verdict`])
//! - **Form**: the controller owning the state bundle, with field
//!   bindings, array operations, submit handling, and reset ([`Form`])
//!
//! Reads never fail (a miss resolves to `None`); writes are pure (the
//! previous values root is never mutated). Validation errors are plain
//! strings in state and are always user-recoverable. Usage errors (list
//! operations on non-arrays, strict-mode shape conflicts) surface as
//! [`FormError`] and never leak into the error-message channel.
//!
//! # Quick Start
//!
//! ```
//! use formwork::{Form, FormConfig, Rule, Rules};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let form = Form::builder(json!({"email": "", "age": 0}))
//!     .rules(
//!         Rules::new()
//!             .field("email", Rule::new().required("Email required"))
//!             .field("age", Rule::new().min(18)),
//!     )
//!     .config(FormConfig::new().validate_on_blur(true))
//!     .build();
//!
//! let email = form.field("email");
//! email.set("ada@example.com").await.unwrap();
//! email.blur().await;
//! assert_eq!(email.error().await, None);
//!
//! assert!(!form.validate().await); // age 0 < 18
//! assert!(form.error("age").await.is_some());
//! # }
//! ```

mod error;
mod flatten;
mod form;
mod path;
mod resolve;
mod rule;
mod validate;

// Core types
pub use error::{value_kind, FormError, FormResult};
pub use flatten::flatten;
pub use path::{Path, Seg};
pub use resolve::{get_at, set_at, set_at_checked};

// Rule declarations
pub use rule::{Bound, Check, EqualsRule, FormCheck, PatternRule, Requirement, Rule, Rules, Verdict};

// Controller
pub use form::{Field, Form, FormBuilder, FormConfig, FormState, SubmitOutcome};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
