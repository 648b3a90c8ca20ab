//! Table of contents - versioned, user-editable section plan.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Provenance of a table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TocSource {
    /// Reused from a previously approved pattern for this organization.
    Memory,
    /// Produced by an LLM call.
    Generated,
    /// Built from the fixed fallback template.
    Fixed,
}

/// One planned report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSection {
    /// Unique within one TOC version.
    pub id: String,
    pub title: String,
    /// Nesting level; 1 for top-level sections, 2 for subsections.
    pub level: u8,
    /// What the section should cover; drives retrieval and generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TocSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A versioned table of contents.
///
/// `version` increments by exactly 1 each time a user-approved edit is
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub sections: Vec<TocSection>,
    pub source: TocSource,
    pub version: u32,
    /// How many reports have reused this memory pattern; for UI display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_used: Option<u32>,
}

impl TableOfContents {
    /// Creates a version-1 TOC with the given provenance.
    pub fn new(sections: Vec<TocSection>, source: TocSource) -> Self {
        Self {
            sections,
            source,
            version: 1,
            times_used: None,
        }
    }

    /// Number of planned sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true when the TOC has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Structured validation result, rendered inline by the UI rather than
/// surfaced as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validates a TOC edit before it is accepted.
///
/// Checks: at least one section, unique section ids, non-empty titles,
/// levels within 1..=2. Never panics; all problems come back as messages.
pub fn validate_toc(toc: &TableOfContents) -> TocValidation {
    let mut errors = Vec::new();

    if toc.sections.is_empty() {
        errors.push("Table of contents must have at least one section".to_string());
    }

    let mut seen_ids = HashSet::new();
    for section in &toc.sections {
        if !seen_ids.insert(section.id.as_str()) {
            errors.push(format!("Duplicate section id '{}'", section.id));
        }
        if section.title.trim().is_empty() {
            errors.push(format!("Section '{}' has an empty title", section.id));
        }
        if !(1..=2).contains(&section.level) {
            errors.push(format!(
                "Section '{}' has invalid level {} (must be 1 or 2)",
                section.id, section.level
            ));
        }
    }

    TocValidation {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_section_toc() -> TableOfContents {
        TableOfContents::new(
            vec![
                TocSection::new("s1", "Executive Summary", 1),
                TocSection::new("s2", "Recommendation", 1),
            ],
            TocSource::Fixed,
        )
    }

    #[test]
    fn new_toc_starts_at_version_one() {
        let toc = two_section_toc();
        assert_eq!(toc.version, 1);
        assert_eq!(toc.len(), 2);
    }

    #[test]
    fn valid_toc_passes_validation() {
        let result = validate_toc(&two_section_toc());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn empty_toc_fails_validation() {
        let toc = TableOfContents::new(vec![], TocSource::Generated);
        let result = validate_toc(&toc);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let toc = TableOfContents::new(
            vec![
                TocSection::new("s1", "A", 1),
                TocSection::new("s1", "B", 1),
            ],
            TocSource::Fixed,
        );
        let result = validate_toc(&toc);
        assert!(!result.valid);
        assert!(result.errors[0].contains("Duplicate section id 's1'"));
    }

    #[test]
    fn invalid_level_and_empty_title_are_reported_together() {
        let toc = TableOfContents::new(
            vec![TocSection::new("s1", "  ", 3)],
            TocSource::Fixed,
        );
        let result = validate_toc(&toc);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn source_serializes_to_snake_case() {
        let json = serde_json::to_string(&TocSource::Memory).unwrap();
        assert_eq!(json, "\"memory\"");
    }
}
