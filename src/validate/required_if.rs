//! Conditional-Requiredness Validator
//!
//! Makes a field's presence mandatory exactly when a condition over the
//! same instance holds. When the condition is false the field may be
//! anything, including absent; when true, absence (and, unless tolerated,
//! an empty string) fails. The rule only makes sense on fields that can be
//! absent at all - that guard lives in `ModelRules::required_if`, at
//! registration, never mid-request.

use std::collections::BTreeMap;

use tracing::debug;

use crate::client::{project, ClientRuleDescriptor, RuleKind};
use crate::engine::CompileError;
use crate::model::FieldValue;

use super::context::{ValidationContext, ValidationSession};
use super::outcome::{format_message, FieldError, Outcome};

/// Default error message template; `{0}` = display name, `{1}` = condition
pub const DEFAULT_REQUIRED_MESSAGE: &str =
    "The {0} field is required by the following logic: {1}";

/// Client-side attribute carrying the empty-string tolerance
pub const ALLOW_EMPTY_ATTRIBUTE: &str = "data-val-allowempty";

/// Conditional-requiredness rule over a field's declaring model
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredIf {
    condition: String,
    allow_empty: bool,
    message_template: String,
}

impl RequiredIf {
    /// Create a rule from its condition text
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            allow_empty: false,
            message_template: DEFAULT_REQUIRED_MESSAGE.to_string(),
        }
    }

    /// Tolerate empty strings as present values
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Override the error message template
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    /// The verbatim condition text
    #[inline]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Whether empty strings count as present
    #[inline]
    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    /// Validate one value
    ///
    /// The condition is evaluated first (memoized within the pass, so a
    /// condition shared across fields costs one evaluation). A false
    /// condition succeeds regardless of the value.
    pub fn validate(
        &self,
        value: Option<&FieldValue>,
        ctx: &ValidationContext<'_>,
        session: &ValidationSession<'_>,
    ) -> Result<Outcome, CompileError> {
        if !session.evaluate(ctx.model, &self.condition, ctx.instance)? {
            return Ok(Outcome::Success);
        }

        let missing = match value {
            None => true,
            Some(v) if v.is_null() => true,
            Some(FieldValue::Text(s)) => s.is_empty() && !self.allow_empty,
            Some(_) => false,
        };

        if missing {
            debug!(
                field = ctx.field_name,
                condition = %self.condition,
                "required field missing"
            );
            Ok(Outcome::Failure(FieldError::new(
                format_message(&self.message_template, ctx.display_name, &self.condition),
                ctx.field_name,
            )))
        } else {
            Ok(Outcome::Success)
        }
    }

    /// Project this rule into a client descriptor
    ///
    /// Carries the verbatim condition plus the serialized empty-string
    /// tolerance so the client engine applies identical semantics.
    pub fn client_rule(&self, display_name: &str) -> ClientRuleDescriptor {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            ALLOW_EMPTY_ATTRIBUTE.to_string(),
            self.allow_empty.to_string(),
        );
        project(
            RuleKind::RequiredIf,
            &self.condition,
            display_name,
            &self.message_template,
            attributes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvalCache, PredicateCache};
    use crate::engine::ClosureEngine;
    use crate::model::{FieldSource, ModelType};

    struct Person {
        marital_status: String,
        spouse: Option<String>,
    }

    impl FieldSource for Person {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "MaritalStatus" => Some(FieldValue::Text(self.marital_status.clone())),
                "Spouse" => Some(
                    self.spouse
                        .clone()
                        .map_or(FieldValue::Null, FieldValue::Text),
                ),
                _ => None,
            }
        }
    }

    fn engine() -> ClosureEngine {
        ClosureEngine::new().register::<Person, _>("MaritalStatus == 'Married'", |i: &dyn FieldSource| {
            i.field("MaritalStatus")
                .and_then(|v| v.as_str().map(str::to_owned))
                .is_some_and(|s| s == "Married")
        })
    }

    fn check(rule: &RequiredIf, person: &Person) -> Outcome {
        let engine = engine();
        let predicates = PredicateCache::new();
        let evaluations = EvalCache::new();
        let session = ValidationSession::new(&engine, &predicates, &evaluations);
        let ctx = ValidationContext::new(person, "Spouse", "Spouse", ModelType::of::<Person>());
        rule.validate(person.field("Spouse").as_ref(), &ctx, &session)
            .unwrap()
    }

    #[test]
    fn test_condition_true_and_value_absent_fails() {
        let rule = RequiredIf::new("MaritalStatus == 'Married'");
        let outcome = check(
            &rule,
            &Person {
                marital_status: "Married".into(),
                spouse: None,
            },
        );
        let error = outcome.error().expect("spouse should be required");
        assert_eq!(
            error.message,
            "The Spouse field is required by the following logic: MaritalStatus == 'Married'"
        );
        assert_eq!(error.members, vec!["Spouse".to_string()]);
    }

    #[test]
    fn test_condition_false_passes_regardless_of_value() {
        let rule = RequiredIf::new("MaritalStatus == 'Married'");
        let outcome = check(
            &rule,
            &Person {
                marital_status: "Single".into(),
                spouse: None,
            },
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn test_condition_true_and_value_present_passes() {
        let rule = RequiredIf::new("MaritalStatus == 'Married'");
        let outcome = check(
            &rule,
            &Person {
                marital_status: "Married".into(),
                spouse: Some("Jo".into()),
            },
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn test_empty_string_fails_unless_allowed() {
        let person = Person {
            marital_status: "Married".into(),
            spouse: Some(String::new()),
        };

        let strict = RequiredIf::new("MaritalStatus == 'Married'");
        assert!(check(&strict, &person).is_failure());

        let tolerant = RequiredIf::new("MaritalStatus == 'Married'").allow_empty(true);
        assert!(check(&tolerant, &person).is_success());
    }

    #[test]
    fn test_whitespace_string_is_present() {
        let rule = RequiredIf::new("MaritalStatus == 'Married'");
        let outcome = check(
            &rule,
            &Person {
                marital_status: "Married".into(),
                spouse: Some(" ".into()),
            },
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn test_client_rule_carries_allow_empty_attribute() {
        let rule = RequiredIf::new("MaritalStatus == 'Married'").allow_empty(true);
        let descriptor = rule.client_rule("Spouse");

        assert_eq!(descriptor.rule, "requiredif");
        assert_eq!(descriptor.condition, rule.condition());
        assert_eq!(
            descriptor.attributes.get(ALLOW_EMPTY_ATTRIBUTE).map(String::as_str),
            Some("true")
        );

        let strict = RequiredIf::new("MaritalStatus == 'Married'").client_rule("Spouse");
        assert_eq!(
            strict.attributes.get(ALLOW_EMPTY_ATTRIBUTE).map(String::as_str),
            Some("false")
        );
    }
}
