//! Conditional edges between workflow nodes.
//!
//! Routing is pure: it inspects state and names the next node, and the
//! driver (or the API resume handler) performs the move. Keeping the
//! decisions here means both execution modes branch identically.

use crate::domain::report::feedback::FeedbackAction;
use crate::domain::report::state::ReportState;

/// Where the section loop goes after a feedback decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRoute {
    /// Re-run retrieval and generation for the section at the cursor.
    Regenerate,
    /// Generate the next section.
    NextSection,
    /// All sections reviewed; finalize the report.
    Finalize,
}

/// Where the workflow goes after finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeRoute {
    /// Render the transmittal appendix before ending.
    TransmittalAppendix,
    /// Nothing left to add.
    End,
}

/// Routes the section loop after `process_section_feedback` has applied a
/// decision. A pending regenerate request always wins; otherwise the cursor
/// decides between continuing and finalizing.
pub fn route_after_feedback(state: &ReportState) -> SectionRoute {
    if let Some(feedback) = &state.user_feedback {
        if feedback.action == FeedbackAction::Regenerate {
            return SectionRoute::Regenerate;
        }
    }
    if state.is_generation_complete() {
        SectionRoute::Finalize
    } else {
        SectionRoute::NextSection
    }
}

/// Routes after finalize: the appendix branch is taken only for a non-empty
/// transmittal.
pub fn route_after_finalize(state: &ReportState) -> FinalizeRoute {
    let has_documents = state
        .transmittal
        .as_ref()
        .map(|t| t.has_documents())
        .unwrap_or(false);
    if has_documents {
        FinalizeRoute::TransmittalAppendix
    } else {
        FinalizeRoute::End
    }
}
