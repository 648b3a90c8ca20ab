//! StartReportHandler - creates a report and proposes its TOC.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::foundation::{OrganizationId, ProjectId, ReportId, StakeholderId, UserId};
use crate::domain::report::workflow::{WorkflowError, WorkflowNodes};
use crate::domain::report::{
    ContentLength, GenerationMode, ReportState, ReportTarget, WorkflowInterrupt,
};
use crate::ports::ReportStoreError;

/// Command to start a new report generation.
#[derive(Debug, Clone)]
pub struct StartReportCommand {
    pub project_id: ProjectId,
    pub organization_id: OrganizationId,
    pub title: String,
    pub target: ReportTarget,
    pub stakeholder_id: Option<StakeholderId>,
    pub document_set_ids: Vec<String>,
    pub generation_mode: GenerationMode,
    pub content_length: ContentLength,
    /// User driving the generation; claims the advisory lock.
    pub user_id: UserId,
    pub user_display_name: String,
}

/// Result of a successful start: the report is parked at TOC approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartReportResult {
    pub report_id: ReportId,
    pub interrupt: WorkflowInterrupt,
}

/// Error type for starting a report.
#[derive(Debug, thiserror::Error)]
pub enum StartReportError {
    #[error("Polish mode requires an existing report with generated sections")]
    NoPriorGeneration,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] ReportStoreError),
}

/// Handler for starting report generation.
pub struct StartReportHandler {
    nodes: WorkflowNodes,
}

impl StartReportHandler {
    pub fn new(nodes: WorkflowNodes) -> Self {
        Self { nodes }
    }

    pub async fn handle(&self, cmd: StartReportCommand) -> Result<StartReportResult, StartReportError> {
        // A fresh report has no sections, so Polish has nothing to rework.
        if cmd.generation_mode == GenerationMode::Polish {
            return Err(StartReportError::NoPriorGeneration);
        }

        let mut state = ReportState::new(
            cmd.project_id,
            cmd.organization_id,
            cmd.title,
            cmd.target,
        )
        .with_document_sets(cmd.document_set_ids)
        .with_content_length(cmd.content_length);
        if let Some(stakeholder_id) = cmd.stakeholder_id {
            state = state.with_stakeholder(stakeholder_id);
        }
        state.claim_lock(cmd.user_id, cmd.user_display_name);

        let state = self.nodes.fetch_planning_context(state).await?;
        let state = self.nodes.generate_toc(state).await?;
        self.nodes.store().save_report(state.report_id, &state).await?;

        let toc = state.toc.clone().ok_or(WorkflowError::MissingToc)?;
        info!(report_id = %state.report_id, sections = toc.len(), "report started, awaiting TOC approval");

        Ok(StartReportResult {
            report_id: state.report_id,
            interrupt: WorkflowInterrupt::toc_approval(toc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::memory::InMemoryTocMemory;
    use crate::adapters::planning::InMemoryPlanningSource;
    use crate::adapters::retrieval::InMemoryRetriever;
    use crate::adapters::storage::InMemoryReportStore;
    use crate::domain::foundation::ReportStatus;
    use crate::domain::report::TocSource;
    use crate::ports::ReportStore;

    fn handler_with_store() -> (StartReportHandler, Arc<InMemoryReportStore>) {
        let store = Arc::new(InMemoryReportStore::new());
        let nodes = WorkflowNodes::new(
            Arc::new(InMemoryPlanningSource::new()),
            Arc::new(InMemoryTocMemory::new()),
            Arc::new(InMemoryRetriever::new(8)),
            Arc::new(MockAIProvider::new()),
            store.clone(),
        );
        (StartReportHandler::new(nodes), store)
    }

    fn command() -> StartReportCommand {
        StartReportCommand {
            project_id: ProjectId::new(),
            organization_id: OrganizationId::new(),
            title: "Tender Recommendation - Concrete Works".to_string(),
            target: ReportTarget::trade("Concrete Works"),
            stakeholder_id: None,
            document_set_ids: vec!["tenders".to_string()],
            generation_mode: GenerationMode::Standard,
            content_length: ContentLength::Standard,
            user_id: UserId::new("alice").unwrap(),
            user_display_name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn starts_and_parks_at_toc_approval() {
        let (handler, store) = handler_with_store();
        let result = handler.handle(command()).await.unwrap();

        assert!(matches!(
            result.interrupt,
            WorkflowInterrupt::TocApproval { .. }
        ));

        let persisted = store.get_report(result.report_id).await.unwrap();
        assert_eq!(persisted.status, ReportStatus::TocPending);
        // Nothing in memory and the mock returns prose, so the fixed
        // template wins.
        assert_eq!(persisted.toc.unwrap().source, TocSource::Fixed);
        assert!(persisted.lock.is_some());
    }

    #[tokio::test]
    async fn polish_on_a_new_report_is_rejected() {
        let (handler, _store) = handler_with_store();
        let mut cmd = command();
        cmd.generation_mode = GenerationMode::Polish;

        let err = handler.handle(cmd).await.unwrap_err();
        assert!(matches!(err, StartReportError::NoPriorGeneration));
    }
}
