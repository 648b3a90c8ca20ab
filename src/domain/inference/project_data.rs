//! Project profile data evaluated by inference rules.
//!
//! Every field is optional: a profile is filled in progressively as the user
//! works through project setup, and rules must cope with partially-populated
//! data. "Not yet captured" is always `None`, never an empty sentinel.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The project profile snapshot inference rules are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    /// Core project record fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_details: Option<ProjectDetailsData>,

    /// Profiler questionnaire answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiler: Option<ProfilerData>,
}

impl ProjectData {
    /// Resolves a dotted field path to a display string, if present.
    ///
    /// Supported paths: `project_details.*`, `profiler.*`, `scale.<key>`,
    /// `complexity.<key>`. Returns `None` when the path or value is absent,
    /// which callers treat as "leave the placeholder in place".
    pub fn lookup(&self, path: &str) -> Option<String> {
        let (head, rest) = path.split_once('.')?;
        match head {
            "project_details" => {
                let details = self.project_details.as_ref()?;
                match rest {
                    "jurisdiction" => details.jurisdiction.clone(),
                    "lot_area_sqm" => details.lot_area_sqm.map(format_number),
                    _ => None,
                }
            }
            "profiler" => {
                let profiler = self.profiler.as_ref()?;
                match rest {
                    "building_class" => profiler.building_class.clone(),
                    "project_type" => profiler.project_type.clone(),
                    "region" => profiler.region.clone(),
                    "subclass" => profiler
                        .subclass
                        .as_ref()
                        .map(|values| values.join(", ")),
                    _ => None,
                }
            }
            "scale" => {
                let profiler = self.profiler.as_ref()?;
                profiler.scale.get(rest).copied().map(format_number)
            }
            "complexity" => {
                let profiler = self.profiler.as_ref()?;
                profiler.complexity.get(rest).cloned()
            }
            _ => None,
        }
    }
}

/// Core project record fields referenced by rule conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetailsData {
    /// Planning jurisdiction (e.g. a council or state authority).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,

    /// Lot area in square metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_area_sqm: Option<f64>,
}

/// Profiler questionnaire answers referenced by rule conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilerData {
    /// Building classification (e.g. "class_2", "class_5").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_class: Option<String>,

    /// Project type (e.g. "new_build", "fitout", "refurbishment").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,

    /// Geographic region (e.g. "metro", "regional").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Building subclasses present on the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<Vec<String>>,

    /// Scale measures keyed by metric name (e.g. "gfa_sqm", "storeys").
    #[serde(default)]
    pub scale: HashMap<String, f64>,

    /// Complexity ratings keyed by aspect name (e.g. "structure": "high").
    #[serde(default)]
    pub complexity: HashMap<String, String>,

    /// Work scope items included in the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_scope: Option<Vec<String>>,
}

/// Formats a numeric profile value without a trailing ".0" for whole numbers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
