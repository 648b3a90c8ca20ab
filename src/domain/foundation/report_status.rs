//! Report lifecycle status.

use serde::{Deserialize, Serialize};

use super::StateMachine;

/// Overall lifecycle status of a report generation.
///
/// Flow: `Draft → TocPending → Generating → Complete`.
///
/// `Failed` is defined for callers that catch an unrecoverable error while
/// driving the workflow; the workflow nodes themselves never set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Created, planning context not yet fetched or TOC not yet generated.
    Draft,
    /// TOC generated, waiting on user approval.
    TocPending,
    /// Section generation loop in progress.
    Generating,
    /// All sections generated and finalized.
    Complete,
    /// Aborted by an unrecoverable error (set by the caller, not by nodes).
    Failed,
}

impl ReportStatus {
    /// Returns true if the report reached a terminal status.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Short label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::TocPending => "Awaiting TOC approval",
            Self::Generating => "Generating",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl StateMachine for ReportStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ReportStatus::*;
        matches!(
            (self, target),
            (Draft, TocPending)
                | (Draft, Failed)
                | (TocPending, Generating)
                | (TocPending, Failed)
                | (Generating, Complete)
                | (Generating, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReportStatus::*;
        match self {
            Draft => vec![TocPending, Failed],
            TocPending => vec![Generating, Failed],
            Generating => vec![Complete, Failed],
            Complete => vec![],
            Failed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_documented_flow() {
        let status = ReportStatus::Draft;
        let status = status.transition_to(ReportStatus::TocPending).unwrap();
        let status = status.transition_to(ReportStatus::Generating).unwrap();
        let status = status.transition_to(ReportStatus::Complete).unwrap();
        assert!(status.is_terminal());
    }

    #[test]
    fn cannot_skip_toc_approval() {
        assert!(ReportStatus::Draft
            .transition_to(ReportStatus::Generating)
            .is_err());
    }

    #[test]
    fn failed_is_reachable_from_all_non_terminal_states() {
        for status in [
            ReportStatus::Draft,
            ReportStatus::TocPending,
            ReportStatus::Generating,
        ] {
            assert!(status.can_transition_to(&ReportStatus::Failed));
        }
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(ReportStatus::Complete.is_terminal());
        assert!(ReportStatus::Failed.is_terminal());
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&ReportStatus::TocPending).unwrap();
        assert_eq!(json, "\"toc_pending\"");
    }
}
