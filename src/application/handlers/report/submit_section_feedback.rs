//! SubmitSectionFeedbackHandler - applies a review decision and advances the
//! section loop.

use tracing::{info, warn};

use crate::domain::foundation::{ReportId, ReportStatus, UserId};
use crate::domain::report::workflow::{
    process_section_feedback, route_after_feedback, route_after_finalize, FinalizeRoute,
    SectionRoute, WorkflowError, WorkflowNodes,
};
use crate::domain::report::{ReportSummary, SectionFeedbackResponse, WorkflowInterrupt};
use crate::ports::ReportStoreError;

use super::generate_and_suspend;

/// Command carrying one review decision.
#[derive(Debug, Clone)]
pub struct SubmitSectionFeedbackCommand {
    pub report_id: ReportId,
    pub response: SectionFeedbackResponse,
    pub user_id: UserId,
}

/// Outcome of applying feedback: another section to review, or done.
#[derive(Debug, Clone)]
pub enum SubmitSectionFeedbackResult {
    /// The next (or regenerated) section awaits review.
    AwaitingFeedback(WorkflowInterrupt),
    /// Every section is reviewed; the report is complete.
    Completed(ReportSummary),
}

/// Error type for section feedback.
///
/// Lock and not-found conflicts surface as the shared `WorkflowError`
/// variants so every resume entry point reports them the same way.
#[derive(Debug, thiserror::Error)]
pub enum SubmitSectionFeedbackError {
    #[error("Report is not generating (status: {0:?})")]
    NotGenerating(ReportStatus),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] ReportStoreError),
}

/// Handler for resuming from the section feedback interrupt.
pub struct SubmitSectionFeedbackHandler {
    nodes: WorkflowNodes,
}

impl SubmitSectionFeedbackHandler {
    pub fn new(nodes: WorkflowNodes) -> Self {
        Self { nodes }
    }

    pub async fn handle(
        &self,
        cmd: SubmitSectionFeedbackCommand,
    ) -> Result<SubmitSectionFeedbackResult, SubmitSectionFeedbackError> {
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
        if state.status != ReportStatus::Generating {
            return Err(SubmitSectionFeedbackError::NotGenerating(state.status));
        }

        let state = process_section_feedback(state, cmd.response)?;

        match route_after_feedback(&state) {
            SectionRoute::Regenerate | SectionRoute::NextSection => {
                let (_state, interrupt) = generate_and_suspend(&self.nodes, state).await?;
                Ok(SubmitSectionFeedbackResult::AwaitingFeedback(interrupt))
            }
            SectionRoute::Finalize => {
                let mut state = self.nodes.finalize(state).await?;
                if route_after_finalize(&state) == FinalizeRoute::TransmittalAppendix {
                    state = self.nodes.generate_transmittal_section(state).await?;
                }

                if let Some(toc) = &state.toc {
                    if let Err(err) = self
                        .nodes
                        .toc_memory()
                        .record_pattern(
                            state.organization_id,
                            state.report_type,
                            &state.target,
                            toc,
                        )
                        .await
                    {
                        warn!(report_id = %state.report_id, error = %err, "failed to record TOC pattern");
                    }
                }

                state.release_lock();
                self.nodes.store().save_report(state.report_id, &state).await?;
                info!(report_id = %state.report_id, "report generation completed");
                Ok(SubmitSectionFeedbackResult::Completed(state.summary()))
            }
        }
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
    use crate::domain::foundation::{OrganizationId, ProjectId};
    use crate::domain::report::{
        GeneratedSection, ReportState, ReportTarget, TableOfContents, TocSection, TocSource,
    };
    use crate::ports::{ReportStore, TocMemory};

    fn nodes_with_deps() -> (
        WorkflowNodes,
        Arc<InMemoryReportStore>,
        Arc<InMemoryTocMemory>,
    ) {
        let store = Arc::new(InMemoryReportStore::new());
        let memory = Arc::new(InMemoryTocMemory::new());
        let nodes = WorkflowNodes::new(
            Arc::new(InMemoryPlanningSource::new()),
            memory.clone(),
            Arc::new(
                InMemoryRetriever::new(8)
                    .with_chunk(
                        "c1",
                        "Tender A.pdf",
                        "Executive summary of the concrete tender recommendation",
                        vec!["tenders".to_string()],
                    )
                    .with_chunk(
                        "c2",
                        "Tender B.pdf",
                        "Recommendation on the preferred concrete tenderer",
                        vec!["tenders".to_string()],
                    ),
            ),
            Arc::new(MockAIProvider::new()),
            store.clone(),
        );
        (nodes, store, memory)
    }

    /// State mid-generation: cursor on section 0, which has a draft.
    fn generating_state(user: &UserId) -> ReportState {
        let mut state = ReportState::new(
            ProjectId::new(),
            OrganizationId::new(),
            "Tender Recommendation",
            ReportTarget::trade("Concrete Works"),
        )
        .with_document_sets(vec!["tenders".to_string()]);
        state.toc = Some(TableOfContents::new(
            vec![
                TocSection::new("executive-summary", "Executive Summary", 1),
                TocSection::new("recommendation", "Recommendation", 1),
            ],
            TocSource::Fixed,
        ));
        state.status = ReportStatus::Generating;
        state.sections.push(GeneratedSection::generated(
            "executive-summary",
            "Executive Summary",
            "draft",
        ));
        state.active_source_ids = vec!["c1".to_string()];
        state.claim_lock(user.clone(), "Alice");
        state
    }

    #[tokio::test]
    async fn approve_moves_to_the_next_section() {
        let (nodes, store, _memory) = nodes_with_deps();
        let user = UserId::new("alice").unwrap();
        let state = generating_state(&user);
        let report_id = state.report_id;
        store.save_report(report_id, &state).await.unwrap();

        let handler = SubmitSectionFeedbackHandler::new(nodes);
        let result = handler
            .handle(SubmitSectionFeedbackCommand {
                report_id,
                response: SectionFeedbackResponse::approve(),
                user_id: user,
            })
            .await
            .unwrap();

        assert!(matches!(
            result,
            SubmitSectionFeedbackResult::AwaitingFeedback(WorkflowInterrupt::SectionFeedback { .. })
        ));
        let persisted = store.get_report(report_id).await.unwrap();
        assert_eq!(persisted.current_section_index, 1);
        assert_eq!(persisted.sections.len(), 2);
    }

    #[tokio::test]
    async fn final_approval_completes_and_records_the_pattern() {
        let (nodes, store, memory) = nodes_with_deps();
        let user = UserId::new("alice").unwrap();
        let mut state = generating_state(&user);
        // Park on the last section with a draft in place.
        state.current_section_index = 1;
        state.sections.push(GeneratedSection::generated(
            "recommendation",
            "Recommendation",
            "final draft",
        ));
        let report_id = state.report_id;
        let org = state.organization_id;
        let report_type = state.report_type;
        let target = state.target.clone();
        store.save_report(report_id, &state).await.unwrap();

        let handler = SubmitSectionFeedbackHandler::new(nodes);
        let result = handler
            .handle(SubmitSectionFeedbackCommand {
                report_id,
                response: SectionFeedbackResponse::approve(),
                user_id: user,
            })
            .await
            .unwrap();

        let summary = match result {
            SubmitSectionFeedbackResult::Completed(summary) => summary,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(summary.completed_sections, 2);
        assert_eq!(summary.total_sections, 2);

        let persisted = store.get_report(report_id).await.unwrap();
        assert_eq!(persisted.status, ReportStatus::Complete);
        assert!(persisted.lock.is_none());

        let pattern = memory
            .fetch_memory_toc(org, report_type, &target)
            .await
            .unwrap();
        assert!(pattern.is_some());
    }

    #[tokio::test]
    async fn regenerate_reviews_the_same_section_again() {
        let (nodes, store, _memory) = nodes_with_deps();
        let user = UserId::new("alice").unwrap();
        let state = generating_state(&user);
        let report_id = state.report_id;
        store.save_report(report_id, &state).await.unwrap();

        let handler = SubmitSectionFeedbackHandler::new(nodes);
        let result = handler
            .handle(SubmitSectionFeedbackCommand {
                report_id,
                response: SectionFeedbackResponse::regenerate(
                    Some("tighter".to_string()),
                    Some(vec![]),
                ),
                user_id: user,
            })
            .await
            .unwrap();

        match result {
            SubmitSectionFeedbackResult::AwaitingFeedback(WorkflowInterrupt::SectionFeedback {
                section,
                ..
            }) => {
                assert_eq!(section.id, "executive-summary");
                assert_eq!(section.regeneration_count, 1);
            }
            other => panic!("expected section feedback, got {:?}", other),
        }

        let persisted = store.get_report(report_id).await.unwrap();
        assert_eq!(persisted.current_section_index, 0);
        assert!(persisted
            .excluded_source_ids
            .contains(&"c1".to_string()));
    }

    #[tokio::test]
    async fn unknown_report_is_not_found() {
        let (nodes, _store, _memory) = nodes_with_deps();
        let handler = SubmitSectionFeedbackHandler::new(nodes);
        let err = handler
            .handle(SubmitSectionFeedbackCommand {
                report_id: ReportId::new(),
                response: SectionFeedbackResponse::approve(),
                user_id: UserId::new("alice").unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitSectionFeedbackError::Workflow(WorkflowError::ReportNotFound(_))
        ));
    }

    #[tokio::test]
    async fn lock_and_status_guards_apply() {
        let (nodes, store, _memory) = nodes_with_deps();
        let alice = UserId::new("alice").unwrap();
        let state = generating_state(&alice);
        let report_id = state.report_id;
        store.save_report(report_id, &state).await.unwrap();

        let handler = SubmitSectionFeedbackHandler::new(nodes);
        let err = handler
            .handle(SubmitSectionFeedbackCommand {
                report_id,
                response: SectionFeedbackResponse::approve(),
                user_id: UserId::new("bob").unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitSectionFeedbackError::Workflow(WorkflowError::ReportLocked {
                ref locked_by_name,
                ..
            }) if locked_by_name == "Alice"
        ));

        let mut parked = store.get_report(report_id).await.unwrap();
        parked.status = ReportStatus::TocPending;
        store.save_report(report_id, &parked).await.unwrap();
        let err = handler
            .handle(SubmitSectionFeedbackCommand {
                report_id,
                response: SectionFeedbackResponse::approve(),
                user_id: alice,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitSectionFeedbackError::NotGenerating(ReportStatus::TocPending)
        ));
    }
}
