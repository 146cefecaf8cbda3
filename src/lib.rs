//! FieldGate - Expression-Driven Field Validation
//!
//! A validation layer where a data model declares field-level validity as a
//! boolean expression over the model's own fields:
//! - Assertions gate a field's value (`AssertThat`), vacuously valid on null
//! - Conditional requiredness makes presence mandatory exactly when a
//!   condition holds (`RequiredIf`)
//! - Compiled predicates are cached process-wide with single-flight
//!   compilation per (model type, expression text) key
//! - Evaluation results are memoized within one validation pass
//! - The same canonical expression text is projected into client rule
//!   descriptors, so client-side re-validation can never drift from what the
//!   server evaluates

pub mod cache;
pub mod client;
pub mod engine;
pub mod model;
pub mod validate;

// Re-export commonly used types
pub use cache::{EvalCache, PredicateCache};

// Client rule projection
pub use client::{ClientRuleDescriptor, ClientRuleSet, RuleKind};

// Expression engine seam
pub use engine::{ClosureEngine, CompileError, ExpressionEngine, Predicate};

// Model-side contracts
pub use model::{
    FieldKind, FieldSource, FieldSpec, FieldValue, InstanceId, ModelDescriptor, ModelType,
};

// Validators and the per-model registry
pub use validate::{
    AssertThat, ConfigError, FieldError, ModelRules, Outcome, RequiredIf, ValidationContext,
    ValidationReport, ValidationSession,
};
