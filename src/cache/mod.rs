//! Caching Layer
//!
//! Two caches with very different lifetimes:
//!
//! 1. **Predicate Cache** - process-wide, shared by every validation pass;
//!    memoizes compiled predicates by (model type, expression text) with
//!    single-flight compilation per key
//! 2. **Evaluation Cache** - scoped to one validation pass; memoizes
//!    predicate results by (instance identity, expression text) so a
//!    condition shared by several rules on one object graph runs once

pub mod evaluation;
pub mod predicate;

pub use evaluation::EvalCache;
pub use predicate::PredicateCache;
