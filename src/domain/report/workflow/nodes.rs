//! Workflow nodes.
//!
//! Each node takes the current state by value and returns the updated state.
//! Nodes that need no ports (`process_toc_approval`, `process_section_feedback`)
//! are free functions so the API resume handlers can call them directly; the
//! rest live on `WorkflowNodes`, which holds the injected ports.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{ReportStatus, SectionStatus, StateMachine};
use crate::domain::report::feedback::{FeedbackAction, UserFeedback};
use crate::domain::report::planning::PlanningContext;
use crate::domain::report::section::GeneratedSection;
use crate::domain::report::state::ReportState;
use crate::domain::report::toc::{validate_toc, TableOfContents, TocSection, TocSource};
use crate::domain::report::interrupt::{SectionFeedbackResponse, TocApprovalResponse};
use crate::ports::{
    AIProvider, ChunkRetriever, CompletionRequest, MessageRole, PlanningSource, ReportStore,
    TocMemory,
};

use super::templates;
use super::WorkflowError;

/// The port bundle every generation run is built from.
#[derive(Clone)]
pub struct WorkflowNodes {
    planning: Arc<dyn PlanningSource>,
    toc_memory: Arc<dyn TocMemory>,
    retriever: Arc<dyn ChunkRetriever>,
    ai: Arc<dyn AIProvider>,
    store: Arc<dyn ReportStore>,
}

impl WorkflowNodes {
    pub fn new(
        planning: Arc<dyn PlanningSource>,
        toc_memory: Arc<dyn TocMemory>,
        retriever: Arc<dyn ChunkRetriever>,
        ai: Arc<dyn AIProvider>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            planning,
            toc_memory,
            retriever,
            ai,
            store,
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn ReportStore> {
        &self.store
    }

    pub(crate) fn toc_memory(&self) -> &Arc<dyn TocMemory> {
        &self.toc_memory
    }

    /// Fetches the authoritative project snapshot and, when the report
    /// concerns a stakeholder, the transmittal attached to their artifact.
    ///
    /// A project with no planning data yet gets an empty context rather than
    /// failing; generation then leans entirely on retrieval.
    pub async fn fetch_planning_context(
        &self,
        mut state: ReportState,
    ) -> Result<ReportState, WorkflowError> {
        let context = self.planning.fetch_planning_context(state.project_id).await?;
        if context.is_none() {
            warn!(
                report_id = %state.report_id,
                project_id = %state.project_id,
                "project has no planning data; proceeding with an empty context"
            );
        }
        state.planning_context = Some(context.unwrap_or_else(PlanningContext::default));

        if let Some(stakeholder_id) = state.stakeholder_id {
            state.transmittal = self
                .planning
                .fetch_transmittal(state.project_id, stakeholder_id)
                .await?;
        }

        info!(
            report_id = %state.report_id,
            has_transmittal = state.transmittal.as_ref().map(|t| t.has_documents()).unwrap_or(false),
            "planning context fetched"
        );
        Ok(state)
    }

    /// Produces the TOC and parks the report awaiting approval.
    ///
    /// Resolution order: remembered pattern for this organization, then LLM
    /// generation from the project record, then the fixed template. Memory
    /// and LLM failures degrade to the next option and never fail the node.
    pub async fn generate_toc(&self, mut state: ReportState) -> Result<ReportState, WorkflowError> {
        if state.planning_context.is_none() {
            return Err(WorkflowError::MissingPlanningContext);
        }
        let has_transmittal = state
            .transmittal
            .as_ref()
            .map(|t| t.has_documents())
            .unwrap_or(false);

        let memory_hit = match self
            .toc_memory
            .fetch_memory_toc(state.organization_id, state.report_type, &state.target)
            .await
        {
            Ok(hit) => hit,
            Err(err) => {
                warn!(report_id = %state.report_id, error = %err, "TOC memory lookup failed");
                None
            }
        };

        let toc = match memory_hit {
            Some(result) => {
                info!(
                    report_id = %state.report_id,
                    times_used = result.times_used,
                    "reusing remembered TOC pattern"
                );
                TableOfContents {
                    times_used: Some(result.times_used),
                    ..result.toc
                }
            }
            None => match self.generate_toc_with_llm(&state).await {
                Some(sections) => {
                    info!(report_id = %state.report_id, sections = sections.len(), "TOC generated");
                    TableOfContents::new(sections, TocSource::Generated)
                }
                None => {
                    warn!(report_id = %state.report_id, "falling back to fixed TOC template");
                    templates::fixed_toc(&state.target, has_transmittal)
                }
            },
        };

        state.toc = Some(toc);
        state.status = state.status.transition_to(ReportStatus::TocPending)?;
        Ok(state)
    }

    /// One LLM attempt at a TOC. Any failure (call, parse, validation)
    /// returns `None` so the caller can fall back.
    async fn generate_toc_with_llm(&self, state: &ReportState) -> Option<Vec<TocSection>> {
        let request = CompletionRequest::new()
            .with_system_prompt(templates::toc_system_prompt())
            .with_message(MessageRole::User, templates::toc_prompt(state))
            .with_max_tokens(2048)
            .with_temperature(0.2);

        let response = match self.ai.complete(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(report_id = %state.report_id, error = %err, "TOC generation call failed");
                return None;
            }
        };

        let sections = parse_toc_response(&response.content)?;
        let candidate = TableOfContents::new(sections, TocSource::Generated);
        let validation = validate_toc(&candidate);
        if !validation.valid {
            warn!(
                report_id = %state.report_id,
                errors = ?validation.errors,
                "generated TOC failed validation"
            );
            return None;
        }
        Some(candidate.sections)
    }

    /// Retrieves ranked chunks for the section at the cursor and records
    /// them as the active sources for this pass.
    pub async fn retrieve_context(
        &self,
        mut state: ReportState,
    ) -> Result<ReportState, WorkflowError> {
        let toc = state.toc.as_ref().ok_or(WorkflowError::MissingToc)?;
        let section = toc
            .sections
            .get(state.current_section_index)
            .ok_or(WorkflowError::SectionIndexOutOfRange {
                index: state.current_section_index,
                total: toc.len(),
            })?;

        let query = match &section.description {
            Some(description) => format!("{} {}: {}", state.target, section.title, description),
            None => format!("{} {}", state.target, section.title),
        };

        let chunks = self
            .retriever
            .retrieve_chunks(&query, &state.document_set_ids, &state.excluded_source_ids)
            .await?;

        info!(
            report_id = %state.report_id,
            section = %section.id,
            chunks = chunks.len(),
            "retrieved section context"
        );

        state.active_source_ids = chunks.iter().map(|c| c.id.clone()).collect();
        state.retrieved_chunks = chunks;
        Ok(state)
    }

    /// Drafts the section at the cursor from the retrieved context.
    ///
    /// A regeneration replaces the existing record in place and bumps its
    /// regeneration count; section order always mirrors the TOC.
    pub async fn generate_section(
        &self,
        mut state: ReportState,
    ) -> Result<ReportState, WorkflowError> {
        let toc = state.toc.as_ref().ok_or(WorkflowError::MissingToc)?;
        let toc_section = toc
            .sections
            .get(state.current_section_index)
            .ok_or(WorkflowError::SectionIndexOutOfRange {
                index: state.current_section_index,
                total: toc.len(),
            })?
            .clone();

        let request = CompletionRequest::new()
            .with_system_prompt(templates::section_system_prompt())
            .with_message(
                MessageRole::User,
                templates::section_prompt(&state, &toc_section, &state.retrieved_chunks),
            )
            .with_max_tokens(4096)
            .with_temperature(0.4);
        let response = self.ai.complete(request).await?;

        let scores: HashMap<String, f32> = state
            .retrieved_chunks
            .iter()
            .map(|c| (c.id.clone(), c.score))
            .collect();
        let mut sources: Vec<String> = Vec::new();
        for chunk in &state.retrieved_chunks {
            if !sources.contains(&chunk.document_name) {
                sources.push(chunk.document_name.clone());
            }
        }
        let mut section = GeneratedSection::generated(
            toc_section.id.clone(),
            toc_section.title.clone(),
            response.content,
        )
        .with_sources(state.active_source_ids.clone(), scores, sources);

        match state.sections.iter().position(|s| s.id == toc_section.id) {
            Some(pos) => {
                section.regeneration_count = state.sections[pos].regeneration_count + 1;
                state.sections[pos] = section;
            }
            None => state.sections.push(section),
        }

        info!(
            report_id = %state.report_id,
            section = %toc_section.id,
            tokens = response.usage.total_tokens,
            "section drafted"
        );
        Ok(state)
    }

    /// Closes out generation: logs the report card and marks the persisted
    /// report complete.
    pub async fn finalize(&self, mut state: ReportState) -> Result<ReportState, WorkflowError> {
        let summary = state.summary();
        if summary.completed_sections < summary.total_sections {
            warn!(
                report_id = %state.report_id,
                completed = summary.completed_sections,
                planned = summary.total_sections,
                "finalizing with incomplete sections"
            );
        }
        info!(
            report_id = %state.report_id,
            sections = summary.completed_sections,
            words = summary.word_count,
            sources = summary.unique_sources,
            "report generation finalized"
        );

        state.status = state.status.transition_to(ReportStatus::Complete)?;
        self.store
            .update_report_status(state.report_id, ReportStatus::Complete)
            .await?;
        Ok(state)
    }

    /// Appends the transmittal appendix after all prose sections.
    ///
    /// Routing only enters this node when a non-empty transmittal exists; an
    /// empty or absent transmittal makes this a no-op.
    pub async fn generate_transmittal_section(
        &self,
        mut state: ReportState,
    ) -> Result<ReportState, WorkflowError> {
        let Some(transmittal) = state.transmittal.as_ref() else {
            return Ok(state);
        };
        if !transmittal.has_documents() {
            return Ok(state);
        }

        let appendix = transmittal.to_appendix_section();
        if state.sections.iter().any(|s| s.id == appendix.id) {
            return Ok(state);
        }

        info!(
            report_id = %state.report_id,
            documents = transmittal.documents.len(),
            "transmittal appendix added"
        );
        state.sections.push(appendix);
        Ok(state)
    }
}

/// Accepts the user's (possibly edited) TOC and enters the generation loop.
///
/// Approval always produces a new TOC version; provenance and reuse count
/// carry over from the proposal.
pub fn process_toc_approval(
    mut state: ReportState,
    response: TocApprovalResponse,
) -> Result<ReportState, WorkflowError> {
    let proposed = state.toc.as_ref().ok_or(WorkflowError::MissingToc)?;

    state.toc = Some(TableOfContents {
        sections: response.approved_toc.sections,
        source: proposed.source,
        version: proposed.version + 1,
        times_used: proposed.times_used,
    });
    state.status = state.status.transition_to(ReportStatus::Generating)?;
    state.current_section_index = 0;
    Ok(state)
}

/// Applies the user's decision on the section at the cursor.
///
/// Approve and skip accept the current content and advance the cursor;
/// regenerate holds the cursor, records the instructions, and excludes the
/// sources the user dropped so the next retrieval pass cannot bring them
/// back.
pub fn process_section_feedback(
    mut state: ReportState,
    response: SectionFeedbackResponse,
) -> Result<ReportState, WorkflowError> {
    let toc = state.toc.as_ref().ok_or(WorkflowError::MissingToc)?;
    let toc_section = toc
        .sections
        .get(state.current_section_index)
        .ok_or(WorkflowError::SectionIndexOutOfRange {
            index: state.current_section_index,
            total: toc.len(),
        })?;
    let section_pos = state
        .sections
        .iter()
        .position(|s| s.id == toc_section.id)
        .ok_or(WorkflowError::MissingSection {
            index: state.current_section_index,
        })?;

    match response.action {
        FeedbackAction::Approve | FeedbackAction::Skip => {
            state.sections[section_pos].status = SectionStatus::Complete;
            state.user_feedback = None;
            state.retrieved_chunks.clear();
            state.active_source_ids.clear();
            state.current_section_index += 1;
        }
        FeedbackAction::Regenerate => {
            let dropped: Vec<String> = match &response.remaining_sources {
                Some(remaining) => state
                    .active_source_ids
                    .iter()
                    .filter(|id| !remaining.contains(id))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            for id in &dropped {
                if !state.excluded_source_ids.contains(id) {
                    state.excluded_source_ids.push(id.clone());
                }
            }
            state.sections[section_pos].status = SectionStatus::Regenerating;
            state.user_feedback = Some(UserFeedback {
                action: FeedbackAction::Regenerate,
                instructions: response.instructions,
                excluded_source_ids: dropped,
            });
        }
    }
    Ok(state)
}

/// Tolerant parse of an LLM TOC response: accepts a bare JSON array or one
/// wrapped in a Markdown code fence.
fn parse_toc_response(content: &str) -> Option<Vec<TocSection>> {
    let trimmed = content.trim();
    let body = if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    };
    let sections: Vec<TocSection> = serde_json::from_str(body).ok()?;
    if sections.is_empty() {
        return None;
    }
    Some(sections)
}
