//! Validators
//!
//! The server-side gates built on the caching layer:
//!
//! - `AssertThat` - field valid iff a non-null value satisfies its
//!   expression; absence is never this rule's concern
//! - `RequiredIf` - field presence mandatory exactly when a condition
//!   holds, with configurable tolerance for empty strings
//! - `ModelRules` - per-model registry with a fallible registration step,
//!   eager precompilation, and whole-instance validation
//!
//! Validators never discover their collaborators ambiently: the engine and
//! both caches arrive through a `ValidationSession` built by the caller.

pub mod assert_that;
pub mod context;
pub mod outcome;
pub mod required_if;
pub mod rules;

pub use assert_that::{AssertThat, DEFAULT_ASSERT_MESSAGE};
pub use context::{ValidationContext, ValidationSession};
pub use outcome::{FieldError, Outcome};
pub use required_if::{RequiredIf, ALLOW_EMPTY_ATTRIBUTE, DEFAULT_REQUIRED_MESSAGE};
pub use rules::{ConfigError, ModelRules, ValidationReport};
