//! Report state - the workflow's working memory.
//!
//! One workflow instance owns one `ReportState` for the lifetime of one
//! report generation. Between interrupt/resume cycles the full state is
//! serialized to the report store and read back, so everything here is
//! serde-friendly. "Not yet fetched" is always `None`, never an empty
//! placeholder value.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{
    OrganizationId, ProjectId, ReportId, ReportStatus, StakeholderId, Timestamp, UserId,
};

use super::feedback::UserFeedback;
use super::planning::{PlanningContext, ReportTarget};
use super::section::{GeneratedSection, RetrievedChunk};
use super::toc::{TableOfContents, TocSection};
use super::transmittal::TransmittalContext;

/// The kind of report being generated. Currently a single variant; kept as
/// an enum because memory-TOC patterns are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    TenderRecommendation,
}

/// How content generation should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Fresh generation from retrieved context.
    Standard,
    /// Rework an existing report's sections; requires a prior session.
    Polish,
}

impl Default for GenerationMode {
    fn default() -> Self {
        Self::Standard
    }
}

/// Target length of generated section content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentLength {
    Brief,
    Standard,
    Extended,
}

impl Default for ContentLength {
    fn default() -> Self {
        Self::Standard
    }
}

/// Advisory single-writer claim on a report.
///
/// Not a distributed lock: callers must check it before admitting a new
/// request for the same report and surface a conflict to the second user.
/// The workflow itself never enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLock {
    pub locked_by: UserId,
    pub locked_by_name: String,
    pub locked_at: Timestamp,
}

/// Final report card shown when generation completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub title: String,
    pub target: ReportTarget,
    pub completed_sections: usize,
    pub total_sections: usize,
    pub word_count: usize,
    pub unique_sources: usize,
    pub has_transmittal: bool,
    pub transmittal_document_count: usize,
}

/// Working memory of one report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportState {
    // Identity
    pub report_id: ReportId,
    pub project_id: ProjectId,
    pub organization_id: OrganizationId,
    pub report_type: ReportType,
    pub title: String,
    pub target: ReportTarget,
    /// Stakeholder the tender recommendation concerns, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakeholder_id: Option<StakeholderId>,
    /// Document sets retrieval may draw from.
    #[serde(default)]
    pub document_set_ids: Vec<String>,

    // Generation configuration
    #[serde(default)]
    pub generation_mode: GenerationMode,
    #[serde(default)]
    pub content_length: ContentLength,
    /// Baseline text reused for Extended/Polish variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_baseline: Option<String>,

    // Fetched context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning_context: Option<PlanningContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmittal: Option<TransmittalContext>,

    // Generation progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<TableOfContents>,
    #[serde(default)]
    pub sections: Vec<GeneratedSection>,
    /// Cursor into `toc.sections`; generation is done when it reaches the
    /// TOC length.
    #[serde(default)]
    pub current_section_index: usize,

    // Per-pass retrieval scratch, carried in state between nodes
    #[serde(default)]
    pub retrieved_chunks: Vec<RetrievedChunk>,
    #[serde(default)]
    pub active_source_ids: Vec<String>,
    #[serde(default)]
    pub excluded_source_ids: Vec<String>,

    /// Last feedback decision; cleared when a section advances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<UserFeedback>,

    pub status: ReportStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<ReportLock>,
}

impl ReportState {
    /// Creates the initial draft state for a new report.
    pub fn new(
        project_id: ProjectId,
        organization_id: OrganizationId,
        title: impl Into<String>,
        target: ReportTarget,
    ) -> Self {
        Self {
            report_id: ReportId::new(),
            project_id,
            organization_id,
            report_type: ReportType::TenderRecommendation,
            title: title.into(),
            target,
            stakeholder_id: None,
            document_set_ids: Vec::new(),
            generation_mode: GenerationMode::default(),
            content_length: ContentLength::default(),
            template_baseline: None,
            planning_context: None,
            transmittal: None,
            toc: None,
            sections: Vec::new(),
            current_section_index: 0,
            retrieved_chunks: Vec::new(),
            active_source_ids: Vec::new(),
            excluded_source_ids: Vec::new(),
            user_feedback: None,
            status: ReportStatus::Draft,
            lock: None,
        }
    }

    /// Sets the document sets retrieval may draw from.
    pub fn with_document_sets(mut self, ids: Vec<String>) -> Self {
        self.document_set_ids = ids;
        self
    }

    /// Sets the stakeholder the report concerns.
    pub fn with_stakeholder(mut self, stakeholder_id: StakeholderId) -> Self {
        self.stakeholder_id = Some(stakeholder_id);
        self
    }

    /// Sets the content length target.
    pub fn with_content_length(mut self, length: ContentLength) -> Self {
        self.content_length = length;
        self
    }

    /// The TOC section the cursor currently points at, if generation is
    /// still in progress.
    pub fn current_toc_section(&self) -> Option<&TocSection> {
        self.toc
            .as_ref()
            .and_then(|toc| toc.sections.get(self.current_section_index))
    }

    /// The generated section record at the cursor, if one exists yet.
    pub fn current_section(&self) -> Option<&GeneratedSection> {
        let toc_section = self.current_toc_section()?;
        self.sections.iter().find(|s| s.id == toc_section.id)
    }

    /// True once the cursor has passed the last TOC section.
    pub fn is_generation_complete(&self) -> bool {
        match &self.toc {
            Some(toc) => self.current_section_index >= toc.len(),
            None => false,
        }
    }

    /// Percentage of TOC sections generated so far, for progress display.
    pub fn progress_percentage(&self) -> u8 {
        match &self.toc {
            Some(toc) if !toc.is_empty() => {
                let done = self.current_section_index.min(toc.len());
                ((done * 100) / toc.len()) as u8
            }
            _ => 0,
        }
    }

    /// True when the report reached its terminal Complete status.
    pub fn is_report_complete(&self) -> bool {
        self.status == ReportStatus::Complete
    }

    /// Number of non-appendix sections with accepted content.
    pub fn completed_section_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| !s.is_appendix && s.status.is_complete())
            .count()
    }

    /// Whitespace-tokenized word count across all sections.
    pub fn total_word_count(&self) -> usize {
        self.sections.iter().map(GeneratedSection::word_count).sum()
    }

    /// Count of distinct source chunk ids across all sections.
    pub fn unique_source_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.source_chunk_ids.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Builds the final report card.
    pub fn summary(&self) -> ReportSummary {
        let transmittal_document_count = self
            .transmittal
            .as_ref()
            .map(|t| t.documents.len())
            .unwrap_or(0);
        ReportSummary {
            title: self.title.clone(),
            target: self.target.clone(),
            completed_sections: self.completed_section_count(),
            total_sections: self.toc.as_ref().map(TableOfContents::len).unwrap_or(0),
            word_count: self.total_word_count(),
            unique_sources: self.unique_source_count(),
            has_transmittal: transmittal_document_count > 0,
            transmittal_document_count,
        }
    }

    /// Claims the advisory lock for a user.
    pub fn claim_lock(&mut self, user: UserId, display_name: impl Into<String>) {
        self.lock = Some(ReportLock {
            locked_by: user,
            locked_by_name: display_name.into(),
            locked_at: Timestamp::now(),
        });
    }

    /// Releases the advisory lock.
    pub fn release_lock(&mut self) {
        self.lock = None;
    }

    /// True when someone other than `user` holds the advisory lock.
    pub fn is_locked_by_other(&self, user: &UserId) -> bool {
        match &self.lock {
            Some(lock) => &lock.locked_by != user,
            None => false,
        }
    }
}
