//! In-process workflow driver.
//!
//! Runs the whole node graph in one task, handing each interrupt payload to
//! an `InterruptHandler` and feeding its decision straight back in. The
//! API-driven mode skips this driver and calls the same nodes from resume
//! handlers; state is persisted at every suspension boundary either way.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::report::interrupt::{
    SectionFeedbackResponse, TocApprovalResponse, WorkflowInterrupt,
};
use crate::domain::report::state::{GenerationMode, ReportState};

use super::nodes::{process_section_feedback, process_toc_approval, WorkflowNodes};
use super::routing::{route_after_feedback, route_after_finalize, FinalizeRoute, SectionRoute};
use super::WorkflowError;

/// Supplies decisions at the two suspension points.
///
/// Implementations range from an auto-approving runner for demos and batch
/// use to an interactive shim that blocks on a human.
#[async_trait]
pub trait InterruptHandler: Send + Sync {
    /// Decide on a proposed table of contents.
    async fn on_toc_approval(
        &self,
        interrupt: WorkflowInterrupt,
    ) -> Result<TocApprovalResponse, WorkflowError>;

    /// Decide on a generated section.
    async fn on_section_feedback(
        &self,
        interrupt: WorkflowInterrupt,
    ) -> Result<SectionFeedbackResponse, WorkflowError>;
}

/// Drives one report generation from draft to completion.
pub struct ReportWorkflow {
    nodes: WorkflowNodes,
}

impl ReportWorkflow {
    pub fn new(nodes: WorkflowNodes) -> Self {
        Self { nodes }
    }

    /// Runs the full workflow for `state`, consulting `handler` at each
    /// suspension point.
    ///
    /// State is saved before every interrupt and once after completion, so
    /// an abandoned run can be resumed through the API handlers. Node errors
    /// propagate unmodified; marking the persisted report failed is the
    /// caller's decision.
    pub async fn run(
        &self,
        state: ReportState,
        handler: &dyn InterruptHandler,
    ) -> Result<ReportState, WorkflowError> {
        if state.generation_mode == GenerationMode::Polish && state.sections.is_empty() {
            return Err(WorkflowError::NoPriorGeneration);
        }

        let mut state = self.nodes.fetch_planning_context(state).await?;
        state = self.nodes.generate_toc(state).await?;
        self.nodes.store().save_report(state.report_id, &state).await?;

        let proposed = state.toc.clone().ok_or(WorkflowError::MissingToc)?;
        let decision = handler
            .on_toc_approval(WorkflowInterrupt::toc_approval(proposed))
            .await?;
        state = process_toc_approval(state, decision)?;

        while !state.is_generation_complete() {
            state = self.nodes.retrieve_context(state).await?;
            state = self.nodes.generate_section(state).await?;
            self.nodes.store().save_report(state.report_id, &state).await?;

            let section = state
                .current_section()
                .cloned()
                .ok_or(WorkflowError::MissingSection {
                    index: state.current_section_index,
                })?;
            let decision = handler
                .on_section_feedback(WorkflowInterrupt::section_feedback(section))
                .await?;
            state = process_section_feedback(state, decision)?;

            match route_after_feedback(&state) {
                SectionRoute::Regenerate | SectionRoute::NextSection => continue,
                SectionRoute::Finalize => break,
            }
        }

        state = self.nodes.finalize(state).await?;
        if route_after_finalize(&state) == FinalizeRoute::TransmittalAppendix {
            state = self.nodes.generate_transmittal_section(state).await?;
        }

        // Pattern upsert is best-effort; a memory outage never fails a
        // finished report.
        if let Some(toc) = &state.toc {
            if let Err(err) = self
                .nodes
                .toc_memory()
                .record_pattern(state.organization_id, state.report_type, &state.target, toc)
                .await
            {
                warn!(report_id = %state.report_id, error = %err, "failed to record TOC pattern");
            }
        }

        self.nodes.store().save_report(state.report_id, &state).await?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::domain::foundation::{
        OrganizationId, ProjectId, ReportId, ReportStatus, StakeholderId,
    };
    use crate::domain::report::planning::{PlanningContext, ProjectDetails, ReportTarget};
    use crate::domain::report::section::RetrievedChunk;
    use crate::domain::report::toc::{TableOfContents, TocSection, TocSource};
    use crate::domain::report::transmittal::{TransmittalContext, TransmittalDocument};
    use crate::ports::{
        AIError, AIProvider, ChunkRetriever, CompletionRequest, CompletionResponse, FinishReason,
        MemoryTocResult, PlanningSource, PlanningSourceError, ProviderInfo, ReportStore,
        ReportStoreError, RetrievalError, TocMemory, TocMemoryError, TokenUsage,
    };

    struct StubPlanning {
        transmittal: Option<TransmittalContext>,
    }

    #[async_trait]
    impl PlanningSource for StubPlanning {
        async fn fetch_planning_context(
            &self,
            _project_id: ProjectId,
        ) -> Result<Option<PlanningContext>, PlanningSourceError> {
            Ok(Some(PlanningContext {
                details: ProjectDetails {
                    project_id: None,
                    name: "Collins St Tower".to_string(),
                    address: None,
                    description: None,
                    jurisdiction: None,
                },
                ..PlanningContext::default()
            }))
        }

        async fn fetch_transmittal(
            &self,
            _project_id: ProjectId,
            _stakeholder_id: StakeholderId,
        ) -> Result<Option<TransmittalContext>, PlanningSourceError> {
            Ok(self.transmittal.clone())
        }

        async fn stakeholder_name(
            &self,
            _stakeholder_id: StakeholderId,
        ) -> Result<Option<String>, PlanningSourceError> {
            Ok(None)
        }
    }

    struct StubMemory {
        toc: Option<TableOfContents>,
        recorded: Mutex<Vec<TableOfContents>>,
    }

    #[async_trait]
    impl TocMemory for StubMemory {
        async fn fetch_memory_toc(
            &self,
            _organization_id: OrganizationId,
            _report_type: crate::domain::report::ReportType,
            _target: &ReportTarget,
        ) -> Result<Option<MemoryTocResult>, TocMemoryError> {
            Ok(self.toc.clone().map(|toc| MemoryTocResult {
                toc,
                times_used: 3,
            }))
        }

        async fn record_pattern(
            &self,
            _organization_id: OrganizationId,
            _report_type: crate::domain::report::ReportType,
            _target: &ReportTarget,
            toc: &TableOfContents,
        ) -> Result<(), TocMemoryError> {
            self.recorded.lock().unwrap().push(toc.clone());
            Ok(())
        }
    }

    struct StubRetriever;

    #[async_trait]
    impl ChunkRetriever for StubRetriever {
        async fn retrieve_chunks(
            &self,
            _query: &str,
            _document_set_ids: &[String],
            excluded_ids: &[String],
        ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
            Ok(["c1", "c2"]
                .iter()
                .filter(|id| !excluded_ids.iter().any(|e| e == *id))
                .map(|id| RetrievedChunk {
                    id: id.to_string(),
                    document_name: format!("Tender {}.pdf", id),
                    content: "tendered lump sum".to_string(),
                    score: 0.9,
                })
                .collect())
        }
    }

    struct StubAI {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AIProvider for StubAI {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, AIError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                content: format!("Drafted content for call {}.", call),
                usage: TokenUsage::new(500, 200),
                model: "stub".to_string(),
                finish_reason: FinishReason::Stop,
            })
        }

        fn provider_info(&self) -> ProviderInfo {
            ProviderInfo::new("stub", "stub", 200_000)
        }
    }

    #[derive(Default)]
    struct StubStore {
        reports: Mutex<HashMap<ReportId, ReportState>>,
    }

    #[async_trait]
    impl ReportStore for StubStore {
        async fn get_report(&self, id: ReportId) -> Result<ReportState, ReportStoreError> {
            self.reports
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(ReportStoreError::NotFound(id))
        }

        async fn save_report(
            &self,
            id: ReportId,
            state: &ReportState,
        ) -> Result<(), ReportStoreError> {
            self.reports.lock().unwrap().insert(id, state.clone());
            Ok(())
        }

        async fn update_report_status(
            &self,
            id: ReportId,
            status: ReportStatus,
        ) -> Result<(), ReportStoreError> {
            if let Some(state) = self.reports.lock().unwrap().get_mut(&id) {
                state.status = status;
            }
            Ok(())
        }

        async fn exists(&self, id: ReportId) -> Result<bool, ReportStoreError> {
            Ok(self.reports.lock().unwrap().contains_key(&id))
        }

        async fn delete(&self, id: ReportId) -> Result<(), ReportStoreError> {
            self.reports.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    struct AutoApprove;

    #[async_trait]
    impl InterruptHandler for AutoApprove {
        async fn on_toc_approval(
            &self,
            interrupt: WorkflowInterrupt,
        ) -> Result<TocApprovalResponse, WorkflowError> {
            match interrupt {
                WorkflowInterrupt::TocApproval { toc, .. } => {
                    Ok(TocApprovalResponse { approved_toc: toc })
                }
                other => Err(WorkflowError::Interrupt(format!(
                    "unexpected interrupt: {:?}",
                    other
                ))),
            }
        }

        async fn on_section_feedback(
            &self,
            _interrupt: WorkflowInterrupt,
        ) -> Result<SectionFeedbackResponse, WorkflowError> {
            Ok(SectionFeedbackResponse::approve())
        }
    }

    /// Regenerates the first section once, dropping every source, then
    /// approves everything.
    struct RegenerateFirstOnce {
        regenerated: AtomicUsize,
    }

    #[async_trait]
    impl InterruptHandler for RegenerateFirstOnce {
        async fn on_toc_approval(
            &self,
            interrupt: WorkflowInterrupt,
        ) -> Result<TocApprovalResponse, WorkflowError> {
            match interrupt {
                WorkflowInterrupt::TocApproval { toc, .. } => {
                    Ok(TocApprovalResponse { approved_toc: toc })
                }
                other => Err(WorkflowError::Interrupt(format!(
                    "unexpected interrupt: {:?}",
                    other
                ))),
            }
        }

        async fn on_section_feedback(
            &self,
            _interrupt: WorkflowInterrupt,
        ) -> Result<SectionFeedbackResponse, WorkflowError> {
            if self.regenerated.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(SectionFeedbackResponse::regenerate(
                    Some("More detail on pricing".to_string()),
                    Some(vec![]),
                ))
            } else {
                Ok(SectionFeedbackResponse::approve())
            }
        }
    }

    fn two_section_toc() -> TableOfContents {
        TableOfContents::new(
            vec![
                TocSection::new("executive-summary", "Executive Summary", 1),
                TocSection::new("recommendation", "Recommendation", 1),
            ],
            TocSource::Memory,
        )
    }

    fn workflow(
        transmittal: Option<TransmittalContext>,
        memory: Arc<StubMemory>,
        store: Arc<StubStore>,
    ) -> ReportWorkflow {
        ReportWorkflow::new(WorkflowNodes::new(
            Arc::new(StubPlanning { transmittal }),
            memory,
            Arc::new(StubRetriever),
            Arc::new(StubAI {
                calls: AtomicUsize::new(0),
            }),
            store,
        ))
    }

    fn draft_state() -> ReportState {
        ReportState::new(
            ProjectId::new(),
            OrganizationId::new(),
            "Tender Recommendation",
            ReportTarget::trade("Concrete Works"),
        )
        .with_document_sets(vec!["tenders".to_string()])
    }

    #[tokio::test]
    async fn happy_path_completes_and_persists() {
        let memory = Arc::new(StubMemory {
            toc: Some(two_section_toc()),
            recorded: Mutex::new(vec![]),
        });
        let store = Arc::new(StubStore::default());
        let workflow = workflow(None, memory.clone(), store.clone());

        let state = workflow.run(draft_state(), &AutoApprove).await.unwrap();

        assert_eq!(state.status, ReportStatus::Complete);
        assert_eq!(state.sections.len(), 2);
        assert_eq!(state.current_section_index, 2);
        assert_eq!(state.toc.as_ref().unwrap().version, 2);
        assert_eq!(state.toc.as_ref().unwrap().source, TocSource::Memory);

        let persisted = store.get_report(state.report_id).await.unwrap();
        assert_eq!(persisted, state);
        assert_eq!(memory.recorded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn regeneration_replaces_in_place_and_excludes_sources() {
        let memory = Arc::new(StubMemory {
            toc: Some(two_section_toc()),
            recorded: Mutex::new(vec![]),
        });
        let store = Arc::new(StubStore::default());
        let workflow = workflow(None, memory, store);

        let handler = RegenerateFirstOnce {
            regenerated: AtomicUsize::new(0),
        };
        let state = workflow.run(draft_state(), &handler).await.unwrap();

        assert_eq!(state.status, ReportStatus::Complete);
        assert_eq!(state.sections.len(), 2);
        assert_eq!(state.sections[0].regeneration_count, 1);
        // All sources active at the first pass were dropped, so the
        // regenerated first section drew from an empty pool.
        assert!(state.sections[0].source_chunk_ids.is_empty());
        assert_eq!(state.excluded_source_ids.len(), 2);
    }

    #[tokio::test]
    async fn transmittal_appendix_lands_after_prose_sections() {
        let transmittal = TransmittalContext::new(vec![TransmittalDocument {
            name: "Structural Drawings".to_string(),
            version: "Rev C".to_string(),
            category: "Drawings".to_string(),
        }]);
        let memory = Arc::new(StubMemory {
            toc: Some(two_section_toc()),
            recorded: Mutex::new(vec![]),
        });
        let store = Arc::new(StubStore::default());
        let workflow = workflow(Some(transmittal), memory, store);

        let state = workflow
            .run(
                draft_state().with_stakeholder(StakeholderId::new()),
                &AutoApprove,
            )
            .await
            .unwrap();

        assert_eq!(state.sections.len(), 3);
        let appendix = state.sections.last().unwrap();
        assert!(appendix.is_appendix);
        assert!(appendix.content.contains("Structural Drawings"));
        assert!(appendix.source_chunk_ids.is_empty());
    }

    #[tokio::test]
    async fn polish_mode_without_prior_sections_is_rejected() {
        let memory = Arc::new(StubMemory {
            toc: None,
            recorded: Mutex::new(vec![]),
        });
        let store = Arc::new(StubStore::default());
        let workflow = workflow(None, memory, store);

        let mut state = draft_state();
        state.generation_mode = GenerationMode::Polish;
        let err = workflow.run(state, &AutoApprove).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NoPriorGeneration));
    }
}
