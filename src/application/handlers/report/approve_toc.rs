//! ApproveTocHandler - resumes a parked report with the approved TOC.

use tracing::info;

use crate::domain::foundation::{ReportId, ReportStatus, UserId};
use crate::domain::report::workflow::{process_toc_approval, WorkflowError, WorkflowNodes};
use crate::domain::report::{
    validate_toc, TableOfContents, TocApprovalResponse, WorkflowInterrupt,
};
use crate::ports::ReportStoreError;

use super::generate_and_suspend;

/// Command to approve (or approve with edits) a proposed TOC.
#[derive(Debug, Clone)]
pub struct ApproveTocCommand {
    pub report_id: ReportId,
    /// The TOC as the user accepted it, edits included.
    pub approved_toc: TableOfContents,
    pub user_id: UserId,
}

/// Error type for TOC approval.
///
/// Lock and not-found conflicts surface as the shared `WorkflowError`
/// variants so every resume entry point reports them the same way.
#[derive(Debug, thiserror::Error)]
pub enum ApproveTocError {
    #[error("Report is not awaiting TOC approval (status: {0:?})")]
    NotAwaitingApproval(ReportStatus),

    #[error("Invalid table of contents: {}", .0.join("; "))]
    InvalidToc(Vec<String>),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] ReportStoreError),
}

/// Handler for resuming from the TOC approval interrupt.
pub struct ApproveTocHandler {
    nodes: WorkflowNodes,
}

impl ApproveTocHandler {
    pub fn new(nodes: WorkflowNodes) -> Self {
        Self { nodes }
    }

    /// Accepts the TOC, generates the first section, and parks the report
    /// at section feedback.
    pub async fn handle(
        &self,
        cmd: ApproveTocCommand,
    ) -> Result<WorkflowInterrupt, ApproveTocError> {
        let state = match self.nodes.store().get_report(cmd.report_id).await {
            Ok(state) => state,
            Err(ReportStoreError::NotFound(id)) => {
                return Err(WorkflowError::ReportNotFound(id).into())
            }
            Err(err) => return Err(err.into()),
        };

        if state.is_locked_by_other(&cmd.user_id) {
            let locked_by_name = state
                .lock
                .as_ref()
                .map(|l| l.locked_by_name.clone())
                .unwrap_or_default();
            return Err(WorkflowError::ReportLocked {
                report_id: state.report_id,
                locked_by_name,
            }
            .into());
        }
        if state.status != ReportStatus::TocPending {
            return Err(ApproveTocError::NotAwaitingApproval(state.status));
        }

        let validation = validate_toc(&cmd.approved_toc);
        if !validation.valid {
            return Err(ApproveTocError::InvalidToc(validation.errors));
        }

        let state = process_toc_approval(
            state,
            TocApprovalResponse {
                approved_toc: cmd.approved_toc,
            },
        )?;
        info!(
            report_id = %state.report_id,
            toc_version = state.toc.as_ref().map(|t| t.version).unwrap_or_default(),
            "TOC approved, generating first section"
        );

        let (_state, interrupt) = generate_and_suspend(&self.nodes, state).await?;
        Ok(interrupt)
    }
}
