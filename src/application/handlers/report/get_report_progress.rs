//! GetReportProgressHandler - read-side progress view for the UI.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ReportId, ReportStatus};
use crate::domain::report::workflow::WorkflowNodes;
use crate::ports::ReportStoreError;

/// Query for a report's progress.
#[derive(Debug, Clone, Copy)]
pub struct GetReportProgressQuery {
    pub report_id: ReportId,
}

/// Progress snapshot rendered by the UI while generation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProgressView {
    pub report_id: ReportId,
    pub title: String,
    pub status: ReportStatus,
    pub status_label: String,
    /// Percentage of planned sections generated.
    pub progress_percentage: u8,
    pub completed_sections: usize,
    pub total_sections: usize,
    pub toc_version: Option<u32>,
    /// Title of the section under review, while one is pending.
    pub current_section_title: Option<String>,
    /// Display name of the user holding the advisory lock.
    pub locked_by: Option<String>,
}

/// Error type for progress queries.
#[derive(Debug, thiserror::Error)]
pub enum GetReportProgressError {
    #[error("Report not found: {0}")]
    ReportNotFound(ReportId),

    #[error(transparent)]
    Store(#[from] ReportStoreError),
}

/// Handler for progress queries.
pub struct GetReportProgressHandler {
    nodes: WorkflowNodes,
}

impl GetReportProgressHandler {
    pub fn new(nodes: WorkflowNodes) -> Self {
        Self { nodes }
    }

    pub async fn handle(
        &self,
        query: GetReportProgressQuery,
    ) -> Result<ReportProgressView, GetReportProgressError> {
        let state = match self.nodes.store().get_report(query.report_id).await {
            Ok(state) => state,
            Err(ReportStoreError::NotFound(id)) => {
                return Err(GetReportProgressError::ReportNotFound(id))
            }
            Err(err) => return Err(err.into()),
        };

        Ok(ReportProgressView {
            report_id: state.report_id,
            title: state.title.clone(),
            status: state.status,
            status_label: state.status.label().to_string(),
            progress_percentage: state.progress_percentage(),
            completed_sections: state.completed_section_count(),
            total_sections: state.toc.as_ref().map(|t| t.len()).unwrap_or(0),
            toc_version: state.toc.as_ref().map(|t| t.version),
            current_section_title: state.current_toc_section().map(|s| s.title.clone()),
            locked_by: state.lock.as_ref().map(|l| l.locked_by_name.clone()),
        })
    }
}
