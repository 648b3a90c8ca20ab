//! Report command handlers - the API-driven resume surface.
//!
//! Each handler loads the persisted state, applies the same node functions
//! the in-process driver uses, saves, and hands back either the next
//! interrupt payload or the finished summary. The HTTP layer stays a thin
//! translation over these.

mod approve_toc;
mod get_report_progress;
mod start_report;
mod submit_section_feedback;

pub use approve_toc::{ApproveTocCommand, ApproveTocError, ApproveTocHandler};
pub use get_report_progress::{
    GetReportProgressError, GetReportProgressHandler, GetReportProgressQuery, ReportProgressView,
};
pub use start_report::{StartReportCommand, StartReportError, StartReportHandler, StartReportResult};
pub use submit_section_feedback::{
    SubmitSectionFeedbackCommand, SubmitSectionFeedbackError, SubmitSectionFeedbackHandler,
    SubmitSectionFeedbackResult,
};

use crate::domain::report::workflow::{WorkflowError, WorkflowNodes};
use crate::domain::report::{ReportState, WorkflowInterrupt};

/// Runs one retrieval-and-generation pass for the section at the cursor,
/// persists the state, and builds the feedback interrupt.
pub(crate) async fn generate_and_suspend(
    nodes: &WorkflowNodes,
    state: ReportState,
) -> Result<(ReportState, WorkflowInterrupt), WorkflowError> {
    let state = nodes.retrieve_context(state).await?;
    let state = nodes.generate_section(state).await?;
    nodes.store().save_report(state.report_id, &state).await?;

    let section = state
        .current_section()
        .cloned()
        .ok_or(WorkflowError::MissingSection {
            index: state.current_section_index,
        })?;
    let interrupt = WorkflowInterrupt::section_feedback(section);
    Ok((state, interrupt))
}
