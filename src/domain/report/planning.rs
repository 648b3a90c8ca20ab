//! Planning context - the authoritative project snapshot.
//!
//! Fetched once at workflow start and copied verbatim into generated output.
//! It must never be approximated by retrieval; a report that misquotes the
//! project's own objectives or stages is worse than one with no context.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProjectId, StakeholderId};

/// Authoritative snapshot of a project's core record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningContext {
    /// Core project details.
    pub details: ProjectDetails,

    /// Project objectives.
    #[serde(default)]
    pub objectives: Vec<Objective>,

    /// Project stages with dates.
    #[serde(default)]
    pub stages: Vec<Stage>,

    /// Identified risks.
    #[serde(default)]
    pub risks: Vec<Risk>,

    /// Project stakeholders.
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,

    /// Consultant disciplines enabled on the project.
    #[serde(default)]
    pub disciplines: Vec<Discipline>,

    /// Contractor trades enabled on the project.
    #[serde(default)]
    pub trades: Vec<Trade>,
}

/// Core project record fields surfaced in reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_id: Option<ProjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
}

/// A project objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A project stage with an optional date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// An identified project risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

/// A project stakeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: StakeholderId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A consultant discipline enabled on the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discipline {
    pub name: String,
}

/// A contractor trade enabled on the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub name: String,
}

/// What kind of procurement target a report addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Consultant discipline (e.g. "Structural Engineering").
    Discipline,
    /// Contractor trade (e.g. "Concrete Works").
    Trade,
}

/// The discipline or trade a tender-related report targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportTarget {
    pub kind: TargetKind,
    pub name: String,
}

impl ReportTarget {
    /// Creates a consultant discipline target.
    pub fn discipline(name: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Discipline,
            name: name.into(),
        }
    }

    /// Creates a contractor trade target.
    pub fn trade(name: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Trade,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
