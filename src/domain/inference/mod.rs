//! Inference module - rule-based suggestion of objectives and stakeholders.
//!
//! A static, versioned rule table is evaluated against a project's profile
//! data. Each rule carries a declarative boolean condition tree; matched rules
//! have their template placeholders resolved and are returned in priority
//! order for prompt injection.

mod condition;
mod engine;
mod project_data;
mod rules;

pub use condition::{evaluate, Condition, Expected, NumericRange, ProfilerCondition, ProjectDetailsCondition};
pub use engine::{InferenceEngine, MatchedRule, PromptFormatOptions};
pub use project_data::{ProfilerData, ProjectData, ProjectDetailsData};
pub use rules::{default_rule_set, InferenceRule, RuleContentType, RuleSet, RuleSource};
