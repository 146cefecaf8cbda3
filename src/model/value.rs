//! Field Values - Runtime Representation
//!
//! The value a model exposes for one field at validation time. `Null` stands
//! for absence: an unset optional field reads as `Null`, and validators
//! treat it distinctly from an empty string.

use serde::{Deserialize, Serialize};

/// Runtime value of a single model field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Signed integer value
    Int(i64),
    /// Unsigned integer value
    UInt(u64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text value
    Text(String),
    /// Byte array
    Bytes(Vec<u8>),
    /// Absent value
    Null,
}

impl FieldValue {
    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::UInt(u) => i64::try_from(*u).ok(),
            FieldValue::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Try to get as u64
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            FieldValue::Int(i) => u64::try_from(*i).ok(),
            FieldValue::UInt(u) => Some(*u),
            FieldValue::Bool(b) => Some(*b as u64),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::UInt(u) => Some(*u as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            FieldValue::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Check if value is empty (empty text, empty bytes, or absent)
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bytes(b) => b.is_empty(),
            FieldValue::Null => true,
            _ => false,
        }
    }

    /// Check if value is absent
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<Option<FieldValue>> for FieldValue {
    fn from(value: Option<FieldValue>) -> Self {
        value.unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(FieldValue::Int(42).as_int(), Some(42));
        assert_eq!(FieldValue::UInt(7).as_int(), Some(7));
        assert_eq!(FieldValue::Int(-1).as_uint(), None);
        assert_eq!(FieldValue::Int(3).as_float(), Some(3.0));
        assert_eq!(FieldValue::Text("3".into()).as_int(), None);
    }

    #[test]
    fn test_null_and_empty() {
        assert!(FieldValue::Null.is_null());
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(!FieldValue::Text(" ".into()).is_empty());
        assert!(!FieldValue::Text("x".into()).is_null());
        assert!(!FieldValue::Int(0).is_empty());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldValue::from(None), FieldValue::Null);
        assert_eq!(
            FieldValue::from(Some(FieldValue::Bool(true))),
            FieldValue::Bool(true)
        );
    }
}
