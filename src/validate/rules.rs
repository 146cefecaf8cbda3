//! Per-Model Rule Registry
//!
//! `ModelRules` binds validators to the fields of one model type through a
//! fallible registration step: unknown fields are rejected outright, and
//! conditional requiredness is rejected for fields whose static kind can
//! never be absent - both as structured results at setup, before any
//! instance is validated. Once built, the registry validates whole
//! instances (collecting every field failure) and projects the full client
//! rule set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, trace};

use crate::client::{ClientRuleDescriptor, ClientRuleSet};
use crate::engine::CompileError;
use crate::model::{FieldKind, FieldSource, ModelDescriptor, ModelType};

use super::assert_that::AssertThat;
use super::context::{ValidationContext, ValidationSession};
use super::outcome::{FieldError, Outcome};
use super::required_if::RequiredIf;

/// Configuration errors raised at registration time
///
/// These are programmer-visible setup failures; they are never converted
/// into per-request outcomes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The model declares no field with this name
    #[error("model {model} has no field named `{field}`")]
    UnknownField { model: &'static str, field: String },

    /// Conditional requiredness on a field that can never be absent
    #[error(
        "requiredif has no effect on `{field}` of {model}: kind {kind:?} cannot represent \
         absence; declare the field optional or use an assertion instead"
    )]
    NonNullableField {
        model: &'static str,
        field: String,
        kind: FieldKind,
    },
}

#[derive(Debug)]
enum RuleBody {
    Assert(AssertThat),
    Required(RequiredIf),
}

/// A rule bound to a field at registration time
#[derive(Debug)]
struct BoundRule {
    field: String,
    display: String,
    body: RuleBody,
}

impl BoundRule {
    fn expression(&self) -> &str {
        match &self.body {
            RuleBody::Assert(rule) => rule.expression(),
            RuleBody::Required(rule) => rule.condition(),
        }
    }
}

/// Rules registered against one model type
#[derive(Debug)]
pub struct ModelRules {
    descriptor: ModelDescriptor,
    rules: Vec<BoundRule>,
}

impl ModelRules {
    /// Create an empty registry over a model descriptor
    pub fn new(descriptor: ModelDescriptor) -> Self {
        Self {
            descriptor,
            rules: Vec::new(),
        }
    }

    /// The model type the rules are bound to
    #[inline]
    pub fn model(&self) -> ModelType {
        self.descriptor.model()
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Attach an assertion to a field
    pub fn assert_that(mut self, field: &str, rule: AssertThat) -> Result<Self, ConfigError> {
        let display = self.require_field(field)?.display_name().to_string();
        self.rules.push(BoundRule {
            field: field.to_string(),
            display,
            body: RuleBody::Assert(rule),
        });
        Ok(self)
    }

    /// Attach a conditional-requiredness rule to a field
    ///
    /// Fails when the field's static kind cannot represent absence: the
    /// rule would silently never fire, so the misconfiguration is rejected
    /// here, before the rule ever joins the pipeline.
    pub fn required_if(mut self, field: &str, rule: RequiredIf) -> Result<Self, ConfigError> {
        let spec = self.require_field(field)?;
        if !spec.kind.can_be_absent() {
            return Err(ConfigError::NonNullableField {
                model: self.model().name(),
                field: field.to_string(),
                kind: spec.kind.clone(),
            });
        }
        let display = spec.display_name().to_string();
        self.rules.push(BoundRule {
            field: field.to_string(),
            display,
            body: RuleBody::Required(rule),
        });
        Ok(self)
    }

    fn require_field(&self, field: &str) -> Result<&crate::model::FieldSpec, ConfigError> {
        self.descriptor
            .get(field)
            .ok_or_else(|| ConfigError::UnknownField {
                model: self.model().name(),
                field: field.to_string(),
            })
    }

    /// Compile every registered expression eagerly
    ///
    /// Call once at setup so malformed expressions surface as startup
    /// failures instead of first-request failures. Compiled predicates land
    /// in the session's process-wide cache, warming it for every later
    /// pass.
    pub fn precompile(&self, session: &ValidationSession<'_>) -> Result<(), CompileError> {
        let model = self.model();
        for rule in &self.rules {
            session.compile(model, rule.expression())?;
        }
        info!(
            model = model.name(),
            rules = self.rules.len(),
            "predicates precompiled"
        );
        Ok(())
    }

    /// Validate one instance against every registered rule
    ///
    /// A failing rule never aborts the remaining ones; the report collects
    /// every field failure. All rules share the session's pass-scoped
    /// evaluation cache, so an expression referenced by several rules
    /// evaluates once per instance.
    pub fn validate_instance(
        &self,
        instance: &dyn FieldSource,
        session: &ValidationSession<'_>,
    ) -> Result<ValidationReport, CompileError> {
        let model = self.model();
        let mut report = ValidationReport::new();

        for rule in &self.rules {
            let value = instance.field(&rule.field);
            let ctx = ValidationContext::new(instance, &rule.field, &rule.display, model);

            let outcome = match &rule.body {
                RuleBody::Assert(body) => body.validate(value.as_ref(), &ctx, session)?,
                RuleBody::Required(body) => body.validate(value.as_ref(), &ctx, session)?,
            };
            trace!(field = rule.field.as_str(), failed = outcome.is_failure(), "rule evaluated");
            report.record(&rule.field, outcome);
        }

        Ok(report)
    }

    /// Project every registered rule into client descriptors
    pub fn client_rules(&self) -> Vec<ClientRuleDescriptor> {
        self.rules
            .iter()
            .map(|rule| match &rule.body {
                RuleBody::Assert(body) => body.client_rule(&rule.display),
                RuleBody::Required(body) => body.client_rule(&rule.display),
            })
            .collect()
    }

    /// Register every projected descriptor into an outgoing metadata set
    pub fn project_into(&self, set: &mut ClientRuleSet) {
        for descriptor in self.client_rules() {
            set.add(descriptor);
        }
    }
}

/// Aggregated result of validating one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether every rule passed
    pub is_valid: bool,
    /// All field failures, in rule registration order
    pub errors: Vec<FieldError>,
    /// Per-field status (false as soon as any rule on the field fails)
    pub field_results: HashMap<String, bool>,
}

impl ValidationReport {
    /// Create an empty, passing report
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            field_results: HashMap::new(),
        }
    }

    /// Record one rule outcome
    pub fn record(&mut self, field: &str, outcome: Outcome) {
        match outcome {
            Outcome::Success => {
                self.field_results.entry(field.to_string()).or_insert(true);
            }
            Outcome::Failure(error) => {
                self.field_results.insert(field.to_string(), false);
                self.errors.push(error);
                self.is_valid = false;
            }
        }
    }

    /// Merge a sub-report, e.g. from validating a nested object graph
    pub fn merge(&mut self, other: ValidationReport) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        for (field, passed) in other.field_results {
            self.field_results
                .entry(field)
                .and_modify(|p| *p &= passed)
                .or_insert(passed);
        }
    }

    /// Count of fields with all rules passing
    pub fn passed_count(&self) -> usize {
        self.field_results.values().filter(|&&p| p).count()
    }

    /// Count of fields with at least one failing rule
    pub fn failed_count(&self) -> usize {
        self.field_results.values().filter(|&&p| !p).count()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
