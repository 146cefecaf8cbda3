//! Validation Outcomes
//!
//! A rule either succeeds or fails with a per-field error. Failures are the
//! expected, user-recoverable outcome; they never abort validation of other
//! fields and are distinct from configuration errors, which propagate.

use serde::{Deserialize, Serialize};

/// Detailed error for one failed rule on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Formatted, human-readable message
    pub message: String,
    /// Names of the members the failure applies to
    pub members: Vec<String>,
}

impl FieldError {
    /// Create an error for a single member
    pub fn new(message: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            members: vec![member.into()],
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.message, self.members.join(", "))
    }
}

/// Result of one rule applied to one field
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The rule is satisfied
    Success,
    /// The rule is violated
    Failure(FieldError),
}

impl Outcome {
    /// Check if the rule passed
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Check if the rule failed
    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The error, if the rule failed
    pub fn error(&self) -> Option<&FieldError> {
        match self {
            Outcome::Success => None,
            Outcome::Failure(error) => Some(error),
        }
    }
}

/// Fill a message template's positional slots
///
/// `{0}` is the field's display name, `{1}` the verbatim expression text.
pub(crate) fn format_message(template: &str, display_name: &str, expression: &str) -> String {
    template
        .replace("{0}", display_name)
        .replace("{1}", expression)
}
