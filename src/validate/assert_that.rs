//! Assertion Validator
//!
//! Field valid iff a non-null value satisfies the declared expression.
//! Absence is not this rule's concern: null values are vacuously valid, and
//! pairing an assertion with a `RequiredIf` is how presence gets enforced.

use std::collections::BTreeMap;

use tracing::debug;

use crate::client::{project, ClientRuleDescriptor, RuleKind};
use crate::engine::CompileError;
use crate::model::FieldValue;

use super::context::{ValidationContext, ValidationSession};
use super::outcome::{format_message, FieldError, Outcome};

/// Default error message template; `{0}` = display name, `{1}` = expression
pub const DEFAULT_ASSERT_MESSAGE: &str =
    "Assertion for {0} field is not satisfied by the following logic: {1}";

/// Assertion rule over a field's declaring model
#[derive(Debug, Clone, PartialEq)]
pub struct AssertThat {
    expression: String,
    message_template: String,
}

impl AssertThat {
    /// Create an assertion from its expression text
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message_template: DEFAULT_ASSERT_MESSAGE.to_string(),
        }
    }

    /// Override the error message template
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    /// The verbatim expression text
    #[inline]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Validate one value
    ///
    /// Null is vacuously valid without touching the predicate. Compilation
    /// failure is a configuration error and propagates; it is never
    /// converted into a per-instance failure.
    pub fn validate(
        &self,
        value: Option<&FieldValue>,
        ctx: &ValidationContext<'_>,
        session: &ValidationSession<'_>,
    ) -> Result<Outcome, CompileError> {
        let present = match value {
            None => false,
            Some(v) => !v.is_null(),
        };
        if !present {
            return Ok(Outcome::Success);
        }

        if session.evaluate(ctx.model, &self.expression, ctx.instance)? {
            Ok(Outcome::Success)
        } else {
            debug!(
                field = ctx.field_name,
                expression = %self.expression,
                "assertion not satisfied"
            );
            Ok(Outcome::Failure(FieldError::new(
                format_message(&self.message_template, ctx.display_name, &self.expression),
                ctx.field_name,
            )))
        }
    }

    /// Project this rule into a client descriptor
    ///
    /// The descriptor's condition is the verbatim expression; nothing is
    /// re-derived.
    pub fn client_rule(&self, display_name: &str) -> ClientRuleDescriptor {
        project(
            RuleKind::AssertThat,
            &self.expression,
            display_name,
            &self.message_template,
            BTreeMap::new(),
        )
    }
}
