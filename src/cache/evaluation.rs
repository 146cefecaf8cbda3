//! Evaluation Cache - Per-Pass Result Memoization
//!
//! Memoizes predicate results by (instance identity, expression text) within
//! one validation pass. The same condition is often referenced by several
//! rules on one object graph, and nested validation can revisit sub-graphs;
//! each (instance, expression) pair still evaluates exactly once.
//!
//! Results are instance-specific, so the cache must die with its pass:
//! create one `EvalCache` per pass, share it with any concurrent
//! sub-validations the pass fans out, and drop it at pass end.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::engine::Predicate;
use crate::model::{FieldSource, InstanceId};

#[derive(PartialEq, Eq, Hash)]
struct EvalKey {
    instance: InstanceId,
    text: String,
}

/// Pass-scoped cache of predicate results
///
/// Internally locked only so a pass that fans out concurrent
/// sub-validations over the same graph can share one cache; there is no
/// cross-pass synchronization because there is no cross-pass sharing.
#[derive(Default)]
pub struct EvalCache {
    entries: Mutex<HashMap<EvalKey, bool>>,
}

impl EvalCache {
    /// Create an empty cache for one validation pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of `predicate` on `instance`, evaluating at most once
    ///
    /// The entries lock is held across the evaluation so a condition shared
    /// by several rules runs exactly once even when sub-validations race.
    /// Predicates are pure and terminate, so the critical section is
    /// bounded.
    pub fn get_or_evaluate(
        &self,
        predicate: &dyn Predicate,
        instance: &dyn FieldSource,
        text: &str,
    ) -> bool {
        let key = EvalKey {
            instance: InstanceId::of(instance),
            text: text.to_string(),
        };

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(&cached) = entries.get(&key) {
            trace!(expression = %text, result = cached, "evaluation cache hit");
            return cached;
        }

        let result = predicate.evaluate(instance);
        entries.insert(key, result);
        result
    }

    /// Number of memoized results
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been evaluated yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::model::FieldValue;

    struct Order {
        total: i64,
    }

    impl FieldSource for Order {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "Total" => Some(FieldValue::Int(self.total)),
                _ => None,
            }
        }
    }

    /// Predicate wrapper that counts evaluations
    struct CountingPredicate {
        evaluations: AtomicUsize,
    }

    impl CountingPredicate {
        fn new() -> Self {
            Self {
                evaluations: AtomicUsize::new(0),
            }
        }

        fn count(&self) -> usize {
            self.evaluations.load(Ordering::SeqCst)
        }
    }

    impl Predicate for CountingPredicate {
        fn evaluate(&self, instance: &dyn FieldSource) -> bool {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            instance
                .field("Total")
                .and_then(|v| v.as_int())
                .is_some_and(|t| t > 0)
        }
    }

    #[test]
    fn test_same_pair_evaluates_once() {
        let cache = EvalCache::new();
        let predicate = CountingPredicate::new();
        let order = Order { total: 5 };

        assert!(cache.get_or_evaluate(&predicate, &order, "Total > 0"));
        assert!(cache.get_or_evaluate(&predicate, &order, "Total > 0"));
        assert!(cache.get_or_evaluate(&predicate, &order, "Total > 0"));

        assert_eq!(predicate.count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_instances_evaluate_separately() {
        let cache = EvalCache::new();
        let predicate = CountingPredicate::new();
        let paid = Order { total: 5 };
        let empty = Order { total: 0 };

        assert!(cache.get_or_evaluate(&predicate, &paid, "Total > 0"));
        assert!(!cache.get_or_evaluate(&predicate, &empty, "Total > 0"));

        assert_eq!(predicate.count(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_distinct_expressions_evaluate_separately() {
        let cache = EvalCache::new();
        let predicate = CountingPredicate::new();
        let order = Order { total: 5 };

        cache.get_or_evaluate(&predicate, &order, "Total > 0");
        cache.get_or_evaluate(&predicate, &order, "Total > 10");

        assert_eq!(predicate.count(), 2);
    }

    #[test]
    fn test_fresh_pass_is_unaffected_by_prior_pass() {
        let predicate = CountingPredicate::new();
        let order = Order { total: 5 };

        let first_pass = EvalCache::new();
        assert!(first_pass.get_or_evaluate(&predicate, &order, "Total > 0"));
        drop(first_pass);

        let second_pass = EvalCache::new();
        assert!(second_pass.get_or_evaluate(&predicate, &order, "Total > 0"));

        // A new pass starts cold; nothing leaked from the previous one
        assert_eq!(predicate.count(), 2);
        assert_eq!(second_pass.len(), 1);
    }

    #[test]
    fn test_shared_across_concurrent_sub_validations() {
        let cache = EvalCache::new();
        let predicate = CountingPredicate::new();
        let order = Order { total: 5 };

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..16 {
                        assert!(cache.get_or_evaluate(&predicate, &order, "Total > 0"));
                    }
                });
            }
        });

        assert_eq!(predicate.count(), 1);
    }
}
