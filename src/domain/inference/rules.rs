//! Inference rule definitions and the versioned rule table.
//!
//! Rules are data, not code: the production rule set ships as embedded JSON
//! and is deserialized once. The engine receives the table as a read-only
//! configuration object at construction, so tests can inject their own.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::condition::Condition;

/// Embedded production rule table.
const EMBEDDED_RULES: &str = include_str!("rules.json");

/// The closed set of content types rules can produce suggestions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleContentType {
    /// Functional and quality objectives.
    FunctionalQualityObjective,
    /// Planning and compliance objectives.
    PlanningComplianceObjective,
    /// Client-side stakeholders.
    ClientStakeholder,
    /// Authority stakeholders (councils, certifiers, referral bodies).
    AuthorityStakeholder,
    /// Consultant stakeholders (disciplines).
    ConsultantStakeholder,
    /// Contractor stakeholders (trades).
    ContractorStakeholder,
}

impl RuleContentType {
    /// All content types, in stable order.
    pub fn all() -> [RuleContentType; 6] {
        [
            Self::FunctionalQualityObjective,
            Self::PlanningComplianceObjective,
            Self::ClientStakeholder,
            Self::AuthorityStakeholder,
            Self::ConsultantStakeholder,
            Self::ContractorStakeholder,
        ]
    }
}

/// Whether a rule's suggestion restates explicit profile data or is inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    /// Restates something the user told us directly.
    Explicit,
    /// Derived from profile signals; carries a confidence estimate.
    Inferred,
}

/// A single declarative inference rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRule {
    /// Stable rule identifier (e.g. "obj-fq-003").
    pub id: String,

    /// Human-readable description of what the rule detects.
    pub description: String,

    /// Condition tree evaluated against project data.
    pub condition: Condition,

    /// Suggested items; may contain `{{path.to.field}}` placeholders.
    pub items: Vec<String>,

    /// Ordering weight; higher priority rules sort first.
    pub priority: i32,

    /// Provenance of the suggestion.
    pub source: RuleSource,

    /// Confidence estimate in [0, 1]; only meaningful for inferred rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// A versioned table of inference rules grouped by content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule table version, bumped whenever rule content changes.
    pub version: String,

    /// Rules bucketed by the content type they suggest.
    pub rules: HashMap<RuleContentType, Vec<InferenceRule>>,
}

impl RuleSet {
    /// Returns the rules for a content type, empty when none are defined.
    pub fn rules_for(&self, content_type: RuleContentType) -> &[InferenceRule] {
        self.rules
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of rules across all content types.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Returns true if the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static DEFAULT_RULE_SET: Lazy<Arc<RuleSet>> = Lazy::new(|| {
    let rule_set: RuleSet =
        serde_json::from_str(EMBEDDED_RULES).expect("embedded rules.json must be valid");
    Arc::new(rule_set)
});

/// Returns the embedded production rule table.
///
/// Parsed once on first use. The expect is justified: the JSON is compiled
/// into the binary and covered by `embedded_rule_table_parses`.
pub fn default_rule_set() -> Arc<RuleSet> {
    Arc::clone(&DEFAULT_RULE_SET)
}
