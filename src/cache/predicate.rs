//! Predicate Cache - Process-Wide Compile-Once Store
//!
//! Memoizes compiled predicates by (model type, expression text). The first
//! caller for a key runs the engine; concurrent callers for the same key
//! park on the key's slot and wake with the same shared predicate. Callers
//! for different keys never block each other. A failed compilation is cached
//! too: a malformed expression costs one engine invocation per process, and
//! every later caller gets the identical error.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::{debug, error};

use crate::engine::{CompileError, ExpressionEngine, Predicate};
use crate::model::ModelType;

type CompileOutcome = Result<Arc<dyn Predicate>, CompileError>;

#[derive(Clone, PartialEq, Eq, Hash)]
struct PredicateKey {
    model: ModelType,
    text: String,
}

/// Per-key completion slot; `OnceLock` provides the single-flight barrier
#[derive(Default)]
struct CompileSlot {
    cell: OnceLock<CompileOutcome>,
}

/// Process-wide cache of compiled predicates
///
/// Owned by the host and shared by reference across an unbounded number of
/// concurrently executing validation passes. Entries live for the process
/// lifetime; predicates are read-mostly after first use.
#[derive(Default)]
pub struct PredicateCache {
    slots: DashMap<PredicateKey, Arc<CompileSlot>>,
}

impl PredicateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the predicate for (model, text), compiling on first access
    ///
    /// At most one engine invocation happens per key, even under concurrent
    /// first access: late arrivals block on the in-flight compilation and
    /// receive the same result.
    pub fn get_or_compile(
        &self,
        engine: &dyn ExpressionEngine,
        model: ModelType,
        text: &str,
    ) -> CompileOutcome {
        let key = PredicateKey {
            model,
            text: text.to_string(),
        };

        // Shard lock is held only long enough to resolve the slot; the
        // compilation itself runs outside it so other keys stay unblocked.
        let slot = Arc::clone(self.slots.entry(key).or_default().value());

        slot.cell
            .get_or_init(|| {
                debug!(model = model.name(), expression = %text, "compiling predicate");
                let outcome = engine.compile(text, model);
                if let Err(e) = &outcome {
                    error!(model = model.name(), expression = %text, error = %e, "predicate compilation failed");
                }
                outcome
            })
            .clone()
    }

    /// Number of cached keys, including cached failures
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
