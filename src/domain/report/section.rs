//! Generated report sections.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::SectionStatus;

/// A ranked document chunk returned by retrieval for one section pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    /// Document the chunk came from, for human-readable attribution.
    pub document_name: String,
    pub content: String,
    /// Relevance score; higher is more relevant.
    pub score: f32,
}

/// One generated section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSection {
    /// Matches the TOC section id this content was generated for.
    pub id: String,
    pub title: String,
    pub content: String,

    /// Ids of the retrieved chunks actually used for this generation pass.
    /// Always a subset of what retrieval returned; empty for appendices.
    #[serde(default)]
    pub source_chunk_ids: Vec<String>,

    /// Relevance score per chunk id.
    #[serde(default)]
    pub source_scores: HashMap<String, f32>,

    /// Human-readable source list for UI display.
    #[serde(default)]
    pub sources: Vec<String>,

    pub status: SectionStatus,

    /// How many times the user has asked for this section to be regenerated.
    #[serde(default)]
    pub regeneration_count: u32,

    /// True only for the data-driven transmittal appendix.
    #[serde(default)]
    pub is_appendix: bool,
}

impl GeneratedSection {
    /// Creates a completed AI-generated section.
    pub fn generated(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            source_chunk_ids: Vec::new(),
            source_scores: HashMap::new(),
            sources: Vec::new(),
            status: SectionStatus::Complete,
            regeneration_count: 0,
            is_appendix: false,
        }
    }

    /// Creates a data-driven appendix section. Appendices carry no AI
    /// sources.
    pub fn appendix(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            is_appendix: true,
            ..Self::generated(id, title, content)
        }
    }

    /// Attaches source attribution to a generated section.
    pub fn with_sources(
        mut self,
        chunk_ids: Vec<String>,
        scores: HashMap<String, f32>,
        sources: Vec<String>,
    ) -> Self {
        self.source_chunk_ids = chunk_ids;
        self.source_scores = scores;
        self.sources = sources;
        self
    }

    /// Whitespace-tokenized word count of the section content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
