//! Model-Side Contracts
//!
//! What a host model must expose for its fields to be validated:
//!
//! 1. **Runtime values** - `FieldValue`, the value of one field at
//!    validation time, with `Null` representing absence
//! 2. **Field lookup** - `FieldSource`, implemented by the model so
//!    predicates and validators can read fields by name
//! 3. **Identity** - `ModelType` for the declaring type (predicate cache
//!    key) and `InstanceId` for one instance (evaluation cache key)
//! 4. **Static metadata** - `ModelDescriptor`, the per-model field table
//!    consulted when rules are registered

pub mod descriptor;
pub mod source;
pub mod value;

pub use descriptor::{FieldKind, FieldSpec, ModelDescriptor};
pub use source::{FieldSource, InstanceId, ModelType};
pub use value::FieldValue;
