//! Model Descriptors - Static Field Metadata
//!
//! The per-model field table consulted when rules are registered: which
//! fields exist, what kind each one is, and whether that kind can represent
//! absence. Conditional requiredness refuses fields that can never be null,
//! and that check happens here, once, at registration.

use serde::{Deserialize, Serialize};

use super::source::ModelType;

/// Static kind of a model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Signed integer
    Int,
    /// Unsigned integer
    UInt,
    /// Floating point
    Float,
    /// Boolean
    Bool,
    /// Text
    Text,
    /// Byte array
    Bytes,
    /// Field that may be absent
    Optional(Box<FieldKind>),
}

impl FieldKind {
    /// Whether a field of this kind can read as `FieldValue::Null`
    #[inline]
    pub fn can_be_absent(&self) -> bool {
        matches!(self, FieldKind::Optional(_))
    }

    /// Underlying kind with optionality stripped
    pub fn base(&self) -> &FieldKind {
        match self {
            FieldKind::Optional(inner) => inner.base(),
            other => other,
        }
    }
}

/// One field's entry in a model descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, as referenced by expressions and `FieldSource::field`
    pub name: String,
    /// Static kind of the field
    pub kind: FieldKind,
    /// Human-facing name used in error messages; defaults to `name`
    pub display: Option<String>,
}

impl FieldSpec {
    /// Create a field spec
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            display: None,
        }
    }

    /// Create an optional field spec over the given base kind
    pub fn optional(name: impl Into<String>, base: FieldKind) -> Self {
        Self::new(name, FieldKind::Optional(Box::new(base)))
    }

    /// Set the display name
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Display name, falling back to the field name
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }
}

/// Field table for one model type
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    model: ModelType,
    fields: Vec<FieldSpec>,
}

impl ModelDescriptor {
    /// Create an empty descriptor for the model type `T`
    pub fn new<T: 'static>() -> Self {
        Self {
            model: ModelType::of::<T>(),
            fields: Vec::new(),
        }
    }

    /// Create an empty descriptor for an already-resolved model type
    pub fn for_model(model: ModelType) -> Self {
        Self {
            model,
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// The described model type
    #[inline]
    pub fn model(&self) -> ModelType {
        self.model
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All declared fields, in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person;

    #[test]
    fn test_absence_representation() {
        assert!(!FieldKind::Int.can_be_absent());
        assert!(!FieldKind::Text.can_be_absent());
        assert!(FieldKind::Optional(Box::new(FieldKind::Int)).can_be_absent());
        assert_eq!(
            FieldKind::Optional(Box::new(FieldKind::Text)).base(),
            &FieldKind::Text
        );
    }

    #[test]
    fn test_descriptor_lookup() {
        let descriptor = ModelDescriptor::new::<Person>()
            .field(FieldSpec::optional("Age", FieldKind::Int))
            .field(FieldSpec::new("Name", FieldKind::Text).with_display("Full name"));

        assert!(descriptor.get("Age").is_some());
        assert!(descriptor.get("age").is_none());
        assert_eq!(descriptor.get("Name").unwrap().display_name(), "Full name");
        assert_eq!(descriptor.get("Age").unwrap().display_name(), "Age");
        assert_eq!(descriptor.model(), ModelType::of::<Person>());
    }
}
