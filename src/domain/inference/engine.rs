//! Inference engine - evaluates the rule table against project data.
//!
//! Rule evaluation is best-effort by design: this output feeds LLM prompt
//! construction, where an unresolved `{{placeholder}}` token is harmless.
//! Malformed paths therefore never fail evaluation; they stay in the text.

use std::sync::Arc;

use tracing::debug;

use super::condition::evaluate;
use super::project_data::ProjectData;
use super::rules::{InferenceRule, RuleContentType, RuleSet, RuleSource};

/// A rule whose condition matched, with its items template-resolved.
///
/// Constructed fresh on every evaluation call and never persisted; only the
/// final objective/stakeholder text derived from it is stored elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRule {
    /// The matched rule as it appears in the table.
    pub rule: InferenceRule,
    /// Rule items after placeholder substitution.
    pub resolved_items: Vec<String>,
}

/// Options controlling prompt formatting of matched rules.
#[derive(Debug, Clone, Copy)]
pub struct PromptFormatOptions {
    /// Group items under "Explicit" / "Inferred" headings.
    pub group_by_source: bool,
    /// Annotate inferred items with their confidence.
    pub include_confidence: bool,
}

impl Default for PromptFormatOptions {
    fn default() -> Self {
        Self {
            group_by_source: true,
            include_confidence: false,
        }
    }
}

/// Evaluates inference rules against project profile data.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    rule_set: Arc<RuleSet>,
}

impl InferenceEngine {
    /// Creates an engine over a read-only rule table.
    pub fn new(rule_set: Arc<RuleSet>) -> Self {
        Self { rule_set }
    }

    /// Returns the rule table version this engine evaluates.
    pub fn rule_version(&self) -> &str {
        &self.rule_set.version
    }

    /// Evaluates every rule in the given content-type bucket.
    ///
    /// Matched rules are returned sorted descending by priority; ties keep
    /// their encounter order in the table (stable sort).
    pub fn evaluate_rules(
        &self,
        content_type: RuleContentType,
        data: &ProjectData,
    ) -> Vec<MatchedRule> {
        let mut matched: Vec<MatchedRule> = self
            .rule_set
            .rules_for(content_type)
            .iter()
            .filter(|rule| evaluate(&rule.condition, data))
            .map(|rule| MatchedRule {
                rule: rule.clone(),
                resolved_items: rule
                    .items
                    .iter()
                    .map(|item| resolve_template(item, data))
                    .collect(),
            })
            .collect();

        matched.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority));

        debug!(
            content_type = ?content_type,
            matched = matched.len(),
            rule_version = %self.rule_set.version,
            "evaluated inference rules"
        );

        matched
    }

    /// Formats matched rules as a prompt fragment.
    ///
    /// With grouping enabled, explicit items come first under their own
    /// heading, inferred items second. Confidence annotations only ever apply
    /// to inferred items.
    pub fn format_rules_for_prompt(
        &self,
        matched: &[MatchedRule],
        options: PromptFormatOptions,
    ) -> String {
        if !options.group_by_source {
            return matched
                .iter()
                .flat_map(|m| format_items(m, options.include_confidence))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut lines = Vec::new();

        let explicit: Vec<&MatchedRule> = matched
            .iter()
            .filter(|m| m.rule.source == RuleSource::Explicit)
            .collect();
        if !explicit.is_empty() {
            lines.push("Explicitly stated:".to_string());
            for m in explicit {
                lines.extend(format_items(m, false));
            }
        }

        let inferred: Vec<&MatchedRule> = matched
            .iter()
            .filter(|m| m.rule.source == RuleSource::Inferred)
            .collect();
        if !inferred.is_empty() {
            lines.push("Inferred from project profile:".to_string());
            for m in inferred {
                lines.extend(format_items(m, options.include_confidence));
            }
        }

        lines.join("\n")
    }
}

fn format_items(matched: &MatchedRule, include_confidence: bool) -> Vec<String> {
    matched
        .resolved_items
        .iter()
        .map(|item| {
            match (include_confidence, matched.rule.confidence) {
                (true, Some(confidence)) if matched.rule.source == RuleSource::Inferred => {
                    format!("- {} (confidence: {:.0}%)", item, confidence * 100.0)
                }
                _ => format!("- {}", item),
            }
        })
        .collect()
}

/// Resolves `{{path.to.field}}` placeholders against project data.
///
/// Unresolvable placeholders (unknown path, absent value) are left literally
/// in place. Resolution never fails.
pub(crate) fn resolve_template(text: &str, data: &ProjectData) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let path = after_open[..end].trim();
                match resolve_path(path, data) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("{{");
                        result.push_str(&after_open[..end]);
                        result.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                // Unterminated placeholder; keep the remainder as-is.
                result.push_str("{{");
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}

fn resolve_path(path: &str, data: &ProjectData) -> Option<String> {
    if let Some(rest) = path.strip_prefix("building_code.") {
        return resolve_building_code_label(rest, data);
    }
    data.lookup(path)
}

/// Stubbed building-code label lookup.
///
/// Maps NCC building class codes to display labels. A fuller implementation
/// would consult the jurisdiction's code edition.
fn resolve_building_code_label(field: &str, data: &ProjectData) -> Option<String> {
    if field != "building_class" {
        return None;
    }
    let class_code = data.profiler.as_ref()?.building_class.as_deref()?;
    let label = match class_code {
        "class_1" => "Class 1 (dwelling)",
        "class_2" => "Class 2 (apartment building)",
        "class_3" => "Class 3 (residential accommodation)",
        "class_5" => "Class 5 (office)",
        "class_6" => "Class 6 (retail)",
        "class_7" => "Class 7 (carpark/storage)",
        "class_8" => "Class 8 (laboratory/factory)",
        "class_9" => "Class 9 (public building)",
        _ => return None,
    };
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inference::condition::{Condition, ProfilerCondition};
    use crate::domain::inference::project_data::{ProfilerData, ProjectDetailsData};
    use crate::domain::inference::rules::default_rule_set;
    use std::collections::HashMap;

    fn always_true_condition() -> Condition {
        // An empty profiler predicate has no failing leaves.
        Condition::Profiler(ProfilerCondition::default())
    }

    fn rule(id: &str, priority: i32, source: RuleSource, items: Vec<&str>) -> InferenceRule {
        InferenceRule {
            id: id.to_string(),
            description: format!("test rule {}", id),
            condition: always_true_condition(),
            items: items.into_iter().map(String::from).collect(),
            priority,
            source,
            confidence: match source {
                RuleSource::Inferred => Some(0.8),
                RuleSource::Explicit => None,
            },
        }
    }

    fn engine_with(rules: Vec<InferenceRule>) -> InferenceEngine {
        let rule_set = RuleSet {
            version: "test".to_string(),
            rules: HashMap::from([(RuleContentType::ClientStakeholder, rules)]),
        };
        InferenceEngine::new(Arc::new(rule_set))
    }

    fn sample_data() -> ProjectData {
        ProjectData {
            project_details: Some(ProjectDetailsData {
                jurisdiction: Some("City of Sydney".to_string()),
                lot_area_sqm: Some(3200.0),
            }),
            profiler: Some(ProfilerData {
                building_class: Some("class_5".to_string()),
                project_type: Some("new_build".to_string()),
                region: Some("metro".to_string()),
                subclass: None,
                scale: HashMap::from([("gfa_sqm".to_string(), 12000.0)]),
                complexity: HashMap::from([("fire".to_string(), "high".to_string())]),
                work_scope: Some(vec!["structure".to_string(), "facade".to_string()]),
            }),
        }
    }

    #[test]
    fn matched_rules_sort_by_priority_descending_and_stable() {
        let engine = engine_with(vec![
            rule("r-5", 5, RuleSource::Explicit, vec!["five"]),
            rule("r-9a", 9, RuleSource::Explicit, vec!["nine a"]),
            rule("r-1", 1, RuleSource::Explicit, vec!["one"]),
            rule("r-9b", 9, RuleSource::Explicit, vec!["nine b"]),
        ]);

        let matched = engine.evaluate_rules(RuleContentType::ClientStakeholder, &sample_data());
        let ids: Vec<&str> = matched.iter().map(|m| m.rule.id.as_str()).collect();

        // Priorities [5, 9, 1, 9] come back as [9, 9, 5, 1] with the two
        // priority-9 rules in original relative order.
        assert_eq!(ids, vec!["r-9a", "r-9b", "r-5", "r-1"]);
    }

    #[test]
    fn resolve_template_substitutes_known_paths() {
        let resolved = resolve_template(
            "GFA: {{scale.gfa_sqm}} sqm in {{project_details.jurisdiction}}",
            &sample_data(),
        );
        assert_eq!(resolved, "GFA: 12000 sqm in City of Sydney");
    }

    #[test]
    fn resolve_template_leaves_missing_placeholders_in_place() {
        let data = ProjectData::default();
        let text = "GFA: {{scale.gfa_sqm}}";
        assert_eq!(resolve_template(text, &data), text);
    }

    #[test]
    fn resolve_template_handles_unterminated_placeholder() {
        let resolved = resolve_template("broken {{scale.gfa_sqm", &sample_data());
        assert_eq!(resolved, "broken {{scale.gfa_sqm");
    }

    #[test]
    fn resolve_template_maps_building_code_labels() {
        let resolved = resolve_template("{{building_code.building_class}}", &sample_data());
        assert_eq!(resolved, "Class 5 (office)");
    }

    #[test]
    fn unknown_building_class_keeps_placeholder() {
        let mut data = sample_data();
        data.profiler.as_mut().unwrap().building_class = Some("class_99".to_string());
        let resolved = resolve_template("{{building_code.building_class}}", &data);
        assert_eq!(resolved, "{{building_code.building_class}}");
    }

    #[test]
    fn format_groups_explicit_before_inferred() {
        let engine = engine_with(vec![
            rule("r-inf", 9, RuleSource::Inferred, vec!["inferred item"]),
            rule("r-exp", 5, RuleSource::Explicit, vec!["explicit item"]),
        ]);
        let matched = engine.evaluate_rules(RuleContentType::ClientStakeholder, &sample_data());
        let formatted = engine.format_rules_for_prompt(&matched, PromptFormatOptions::default());

        let explicit_pos = formatted.find("explicit item").unwrap();
        let inferred_pos = formatted.find("inferred item").unwrap();
        assert!(explicit_pos < inferred_pos);
        assert!(formatted.contains("Explicitly stated:"));
        assert!(formatted.contains("Inferred from project profile:"));
    }

    #[test]
    fn format_flattens_when_grouping_disabled() {
        let engine = engine_with(vec![
            rule("r-inf", 9, RuleSource::Inferred, vec!["inferred item"]),
            rule("r-exp", 5, RuleSource::Explicit, vec!["explicit item"]),
        ]);
        let matched = engine.evaluate_rules(RuleContentType::ClientStakeholder, &sample_data());
        let formatted = engine.format_rules_for_prompt(
            &matched,
            PromptFormatOptions {
                group_by_source: false,
                include_confidence: false,
            },
        );

        assert!(!formatted.contains("Explicitly stated:"));
        // Flattened output keeps evaluation order (priority descending).
        assert!(formatted.starts_with("- inferred item"));
    }

    #[test]
    fn confidence_annotation_only_applies_to_inferred_items() {
        let engine = engine_with(vec![
            rule("r-inf", 9, RuleSource::Inferred, vec!["inferred item"]),
            rule("r-exp", 5, RuleSource::Explicit, vec!["explicit item"]),
        ]);
        let matched = engine.evaluate_rules(RuleContentType::ClientStakeholder, &sample_data());
        let formatted = engine.format_rules_for_prompt(
            &matched,
            PromptFormatOptions {
                group_by_source: true,
                include_confidence: true,
            },
        );

        assert!(formatted.contains("- inferred item (confidence: 80%)"));
        assert!(formatted.contains("- explicit item\n") || formatted.ends_with("- explicit item"));
        assert!(!formatted.contains("explicit item (confidence"));
    }

    #[test]
    fn default_rule_set_matches_expected_stakeholders_for_sample_project() {
        let engine = InferenceEngine::new(default_rule_set());
        let matched =
            engine.evaluate_rules(RuleContentType::ConsultantStakeholder, &sample_data());
        let items: Vec<&str> = matched
            .iter()
            .flat_map(|m| m.resolved_items.iter().map(String::as_str))
            .collect();

        assert!(items.contains(&"Structural engineer"));
        assert!(items.contains(&"Fire safety engineer (high fire complexity)"));
        assert!(items.contains(&"Facade engineer"));
    }

    #[test]
    fn evaluation_with_empty_data_only_matches_unconditional_rules() {
        let engine = InferenceEngine::new(default_rule_set());
        let matched =
            engine.evaluate_rules(RuleContentType::ConsultantStakeholder, &ProjectData::default());
        assert!(matched.is_empty());
    }
}
