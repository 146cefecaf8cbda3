//! Expression Engine Seam
//!
//! The expression language itself lives outside this crate. What lives here
//! is the seam: `ExpressionEngine` turns expression text into an executable
//! `Predicate` bound to a model type, and everything downstream (caching,
//! validators, client projection) depends only on these traits.
//!
//! `ClosureEngine` is the bundled implementation for hosts that do not link
//! a parser: predicates are registered programmatically against their
//! expression text, and `compile` resolves text by lookup. The text is still
//! the canonical identity of the condition, so the client-side descriptor
//! contract holds unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::model::{FieldSource, ModelType};

/// Compiled, side-effect-free predicate over a model instance
///
/// Must be deterministic: identical instance state always yields an
/// identical result. Termination is the engine's guarantee.
pub trait Predicate: Send + Sync {
    /// Evaluate against one instance
    fn evaluate(&self, instance: &dyn FieldSource) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&dyn FieldSource) -> bool + Send + Sync,
{
    fn evaluate(&self, instance: &dyn FieldSource) -> bool {
        self(instance)
    }
}

impl std::fmt::Debug for dyn Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<predicate>")
    }
}

/// Compiles expression text into predicates bound to a model type
pub trait ExpressionEngine: Send + Sync {
    /// Compile `text` for the given declaring type
    fn compile(&self, text: &str, model: ModelType) -> Result<Arc<dyn Predicate>, CompileError>;
}

/// Errors from expression compilation
///
/// These are configuration errors: fatal, non-retryable, and cached per
/// (model type, expression text) key so a bad expression is reported once
/// rather than recompiled per request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Expression text does not parse
    #[error("malformed expression `{text}`: {detail}")]
    Malformed { text: String, detail: String },

    /// Expression references a member the model does not have
    #[error("unresolved member `{member}` in expression `{text}`")]
    UnresolvedMember { text: String, member: String },

    /// No predicate registered for this text on this model
    #[error("no predicate registered for `{text}` on {model}")]
    UnknownExpression { text: String, model: &'static str },
}

/// Table-driven expression engine
///
/// Resolves expression text against a registry of host-supplied predicates.
/// Registration is keyed by (model type, verbatim text); compiling a text
/// nobody registered is an `UnknownExpression` configuration error.
#[derive(Default)]
pub struct ClosureEngine {
    table: HashMap<(ModelType, String), Arc<dyn Predicate>>,
}

impl ClosureEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate closure for `text` on model `T`
    pub fn register<T, F>(self, text: impl Into<String>, predicate: F) -> Self
    where
        T: 'static,
        F: Fn(&dyn FieldSource) -> bool + Send + Sync + 'static,
    {
        self.register_predicate::<T>(text, Arc::new(predicate))
    }

    /// Register an already-built predicate for `text` on model `T`
    pub fn register_predicate<T: 'static>(
        mut self,
        text: impl Into<String>,
        predicate: Arc<dyn Predicate>,
    ) -> Self {
        let text = text.into();
        debug!(model = ModelType::of::<T>().name(), expression = %text, "predicate registered");
        self.table.insert((ModelType::of::<T>(), text), predicate);
        self
    }

    /// Number of registered predicates
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no predicates are registered
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ExpressionEngine for ClosureEngine {
    fn compile(&self, text: &str, model: ModelType) -> Result<Arc<dyn Predicate>, CompileError> {
        self.table
            .get(&(model, text.to_string()))
            .cloned()
            .ok_or_else(|| CompileError::UnknownExpression {
                text: text.to_string(),
                model: model.name(),
            })
    }
}
