//! Declarative rule condition trees and their evaluator.
//!
//! Conditions come from the versioned rule table as JSON and are evaluated
//! against [`ProjectData`]. Evaluation is pure: no I/O, deterministic,
//! referentially transparent given identical inputs.
//!
//! Absence policy: a leaf predicate whose target field is present in the
//! condition but absent in the data evaluates to false, with one exception:
//! `work_scope_excludes` vacuously passes when the project's work scope list
//! is absent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::project_data::ProjectData;

/// Recursion cutoff for pathological condition trees. Conditions nested
/// deeper than this evaluate to false.
const MAX_CONDITION_DEPTH: usize = 32;

/// A boolean condition tree over project profile data.
///
/// Serialized form mirrors the rule table's JSON:
/// `{"and": [...]}`, `{"or": [...]}`, `{"not": {...}}`,
/// `{"project_details": {...}}`, `{"profiler": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// All sub-conditions must hold.
    And(Vec<Condition>),
    /// At least one sub-condition must hold.
    Or(Vec<Condition>),
    /// Negates a single sub-condition.
    Not(Box<Condition>),
    /// Predicates over the core project record.
    ProjectDetails(ProjectDetailsCondition),
    /// Predicates over profiler questionnaire answers.
    Profiler(ProfilerCondition),
}

/// Expected value for an equality predicate: a single value or any-of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    One(String),
    AnyOf(Vec<String>),
}

impl Expected {
    /// Returns true if `actual` equals the expected value or is a member of
    /// the expected list.
    fn matches(&self, actual: &str) -> bool {
        match self {
            Expected::One(value) => value == actual,
            Expected::AnyOf(values) => values.iter().any(|v| v == actual),
        }
    }
}

/// Inclusive numeric range; either bound may be open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericRange {
    /// Returns true if `value` lies within the range, bounds inclusive.
    fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// Leaf predicates over the core project record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetailsCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<Expected>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_area_sqm: Option<NumericRange>,
}

/// Leaf predicates over profiler answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilerCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_class: Option<Expected>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<Expected>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Expected>,

    /// At least one of the expected subclasses must be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<Vec<String>>,

    /// Per-metric numeric ranges against the project's scale data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<HashMap<String, NumericRange>>,

    /// Per-aspect equality against the project's complexity ratings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<HashMap<String, String>>,

    /// At least one of these work scope items must be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_scope_includes: Option<Vec<String>>,

    /// None of these work scope items may be present. Vacuously passes when
    /// the project's work scope list is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_scope_excludes: Option<Vec<String>>,
}

/// Evaluates a condition tree against project data.
pub fn evaluate(condition: &Condition, data: &ProjectData) -> bool {
    evaluate_at_depth(condition, data, 0)
}

fn evaluate_at_depth(condition: &Condition, data: &ProjectData, depth: usize) -> bool {
    if depth > MAX_CONDITION_DEPTH {
        return false;
    }

    match condition {
        Condition::And(children) => children
            .iter()
            .all(|c| evaluate_at_depth(c, data, depth + 1)),
        Condition::Or(children) => children
            .iter()
            .any(|c| evaluate_at_depth(c, data, depth + 1)),
        Condition::Not(child) => !evaluate_at_depth(child, data, depth + 1),
        Condition::ProjectDetails(predicate) => evaluate_project_details(predicate, data),
        Condition::Profiler(predicate) => evaluate_profiler(predicate, data),
    }
}

fn evaluate_project_details(predicate: &ProjectDetailsCondition, data: &ProjectData) -> bool {
    let Some(details) = data.project_details.as_ref() else {
        // All leaf predicates require their target field; an entirely absent
        // record only passes when the predicate is empty.
        return predicate.jurisdiction.is_none() && predicate.lot_area_sqm.is_none();
    };

    if let Some(expected) = &predicate.jurisdiction {
        match details.jurisdiction.as_deref() {
            Some(actual) if expected.matches(actual) => {}
            _ => return false,
        }
    }

    if let Some(range) = &predicate.lot_area_sqm {
        match details.lot_area_sqm {
            Some(value) if range.contains(value) => {}
            _ => return false,
        }
    }

    true
}

fn evaluate_profiler(predicate: &ProfilerCondition, data: &ProjectData) -> bool {
    let Some(profiler) = data.profiler.as_ref() else {
        return profiler_predicate_is_empty(predicate);
    };

    if let Some(expected) = &predicate.building_class {
        match profiler.building_class.as_deref() {
            Some(actual) if expected.matches(actual) => {}
            _ => return false,
        }
    }

    if let Some(expected) = &predicate.project_type {
        match profiler.project_type.as_deref() {
            Some(actual) if expected.matches(actual) => {}
            _ => return false,
        }
    }

    if let Some(expected) = &predicate.region {
        match profiler.region.as_deref() {
            Some(actual) if expected.matches(actual) => {}
            _ => return false,
        }
    }

    if let Some(expected_subclasses) = &predicate.subclass {
        match profiler.subclass.as_ref() {
            Some(actual) if overlaps(expected_subclasses, actual) => {}
            _ => return false,
        }
    }

    if let Some(expected_scale) = &predicate.scale {
        for (metric, range) in expected_scale {
            match profiler.scale.get(metric) {
                Some(value) if range.contains(*value) => {}
                _ => return false,
            }
        }
    }

    if let Some(expected_complexity) = &predicate.complexity {
        for (aspect, expected) in expected_complexity {
            match profiler.complexity.get(aspect) {
                Some(actual) if actual == expected => {}
                _ => return false,
            }
        }
    }

    if let Some(included) = &predicate.work_scope_includes {
        match profiler.work_scope.as_ref() {
            Some(actual) if overlaps(included, actual) => {}
            _ => return false,
        }
    }

    if let Some(excluded) = &predicate.work_scope_excludes {
        // Vacuously passes when the work scope list is absent.
        if let Some(actual) = profiler.work_scope.as_ref() {
            if overlaps(excluded, actual) {
                return false;
            }
        }
    }

    true
}

fn profiler_predicate_is_empty(predicate: &ProfilerCondition) -> bool {
    predicate.building_class.is_none()
        && predicate.project_type.is_none()
        && predicate.region.is_none()
        && predicate.subclass.is_none()
        && predicate.scale.is_none()
        && predicate.complexity.is_none()
        && predicate.work_scope_includes.is_none()
    // work_scope_excludes vacuously passes without data, so it does not
    // disqualify an otherwise-empty predicate.
}

fn overlaps(expected: &[String], actual: &[String]) -> bool {
    expected.iter().any(|e| actual.iter().any(|a| a == e))
}
