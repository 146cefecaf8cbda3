//! Validation Context and Session
//!
//! `ValidationContext` is the transient tuple for one validation call:
//! which instance, which field, under which declaring type.
//! `ValidationSession` carries the collaborators a validator needs - the
//! expression engine, the process-wide predicate cache, and the pass-scoped
//! evaluation cache - supplied explicitly by the caller rather than
//! discovered at call sites.

use std::sync::Arc;

use crate::cache::{EvalCache, PredicateCache};
use crate::engine::{CompileError, ExpressionEngine, Predicate};
use crate::model::{FieldSource, ModelType};

/// Transient inputs for one validation call
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Instance the expression evaluates against
    pub instance: &'a dyn FieldSource,
    /// Field the rule is attached to
    pub field_name: &'a str,
    /// Human-facing field name for error messages
    pub display_name: &'a str,
    /// Declaring model type, scoping expression compilation
    pub model: ModelType,
}

impl<'a> ValidationContext<'a> {
    /// Create a context for one field of one instance
    pub fn new(
        instance: &'a dyn FieldSource,
        field_name: &'a str,
        display_name: &'a str,
        model: ModelType,
    ) -> Self {
        Self {
            instance,
            field_name,
            display_name,
            model,
        }
    }
}

/// Engine and cache handles for one validation pass
///
/// The predicate cache outlives the session (process lifetime); the
/// evaluation cache must not - build a fresh one per pass and let the
/// session borrow it.
#[derive(Clone, Copy)]
pub struct ValidationSession<'a> {
    engine: &'a dyn ExpressionEngine,
    predicates: &'a PredicateCache,
    evaluations: &'a EvalCache,
}

impl<'a> ValidationSession<'a> {
    /// Bundle the collaborators for one pass
    pub fn new(
        engine: &'a dyn ExpressionEngine,
        predicates: &'a PredicateCache,
        evaluations: &'a EvalCache,
    ) -> Self {
        Self {
            engine,
            predicates,
            evaluations,
        }
    }

    /// Resolve the predicate for (model, text) without evaluating it
    ///
    /// Used by eager precompilation so configuration errors surface at
    /// setup instead of first request.
    pub fn compile(
        &self,
        model: ModelType,
        text: &str,
    ) -> Result<Arc<dyn Predicate>, CompileError> {
        self.predicates.get_or_compile(self.engine, model, text)
    }

    /// Evaluate (model, text) against `instance`, memoized within the pass
    pub fn evaluate(
        &self,
        model: ModelType,
        text: &str,
        instance: &dyn FieldSource,
    ) -> Result<bool, CompileError> {
        let predicate = self.compile(model, text)?;
        Ok(self
            .evaluations
            .get_or_evaluate(predicate.as_ref(), instance, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ClosureEngine;
    use crate::model::FieldValue;

    struct Ticket {
        seats: i64,
    }

    impl FieldSource for Ticket {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "Seats" => Some(FieldValue::Int(self.seats)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_session_evaluate_goes_through_both_caches() {
        let engine = ClosureEngine::new().register::<Ticket, _>("Seats > 0", |i: &dyn FieldSource| {
            i.field("Seats").and_then(|v| v.as_int()).is_some_and(|s| s > 0)
        });
        let predicates = PredicateCache::new();
        let evaluations = EvalCache::new();
        let session = ValidationSession::new(&engine, &predicates, &evaluations);

        let ticket = Ticket { seats: 2 };
        let model = ModelType::of::<Ticket>();

        assert!(session.evaluate(model, "Seats > 0", &ticket).unwrap());
        assert!(session.evaluate(model, "Seats > 0", &ticket).unwrap());

        assert_eq!(predicates.len(), 1);
        assert_eq!(evaluations.len(), 1);
    }

    #[test]
    fn test_compile_error_propagates() {
        let engine = ClosureEngine::new();
        let predicates = PredicateCache::new();
        let evaluations = EvalCache::new();
        let session = ValidationSession::new(&engine, &predicates, &evaluations);

        let ticket = Ticket { seats: 2 };
        let err = session
            .evaluate(ModelType::of::<Ticket>(), "Seats > 0", &ticket)
            .unwrap_err();
        assert!(matches!(err, CompileError::UnknownExpression { .. }));
        assert!(evaluations.is_empty());
    }
}
