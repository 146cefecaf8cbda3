//! Client Rule Projection
//!
//! Derives the client-consumable rule descriptor from the same canonical
//! expression text the server-side predicate was compiled from. The
//! projector is a pure transform: it packages text and metadata, and never
//! re-derives or re-interprets the expression's meaning. The descriptor's
//! `condition` is byte-identical to the declared expression text - that
//! equality is the entire consistency contract between server and client
//! evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validate::outcome::format_message;

/// Kind of rule a descriptor projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Assertion on a present value
    AssertThat,
    /// Conditional requiredness
    RequiredIf,
}

impl RuleKind {
    /// Wire-level rule name consumed by the client engine
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::AssertThat => "assertthat",
            RuleKind::RequiredIf => "requiredif",
        }
    }
}

/// Metadata bundle letting a client-side engine re-evaluate a condition
/// without contacting the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRuleDescriptor {
    /// Wire-level rule name (`"assertthat"` or `"requiredif"`)
    pub rule: String,
    /// Verbatim expression text, never rewritten
    pub condition: String,
    /// Formatted error message for the client to display
    pub message: String,
    /// Auxiliary attributes, e.g. `data-val-allowempty`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// Package a rule's canonical text and metadata into a descriptor
///
/// `expression` flows into the descriptor untouched; the message template's
/// `{0}`/`{1}` slots are filled with the display name and the same verbatim
/// text.
pub fn project(
    kind: RuleKind,
    expression: &str,
    display_name: &str,
    template: &str,
    attributes: BTreeMap<String, String>,
) -> ClientRuleDescriptor {
    ClientRuleDescriptor {
        rule: kind.name().to_string(),
        condition: expression.to_string(),
        message: format_message(template, display_name, expression),
        attributes,
    }
}

/// Outgoing metadata set the host exports to its client engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRuleSet {
    rules: Vec<ClientRuleDescriptor>,
}

impl ClientRuleSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor
    pub fn add(&mut self, descriptor: ClientRuleDescriptor) {
        self.rules.push(descriptor);
    }

    /// Registered descriptors, in registration order
    pub fn rules(&self) -> &[ClientRuleDescriptor] {
        &self.rules
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
