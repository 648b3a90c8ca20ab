//! Interrupt payloads and resume decisions.
//!
//! The workflow suspends at exactly two points: TOC approval and section
//! feedback. At each point it hands a tagged payload to the caller and
//! resumes only when a structured decision comes back. Payloads always carry
//! a human-readable `message` telling the user what to decide.

use serde::{Deserialize, Serialize};

use super::feedback::FeedbackAction;
use super::section::GeneratedSection;
use super::toc::TableOfContents;

/// A workflow suspension payload sent to the UI/API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowInterrupt {
    /// The generated TOC awaits user approval or edits.
    TocApproval {
        toc: TableOfContents,
        message: String,
    },
    /// A generated section awaits approve/regenerate/skip.
    SectionFeedback {
        section: GeneratedSection,
        /// Human-readable source list for the review UI.
        sources: Vec<String>,
        message: String,
    },
}

impl WorkflowInterrupt {
    /// Builds the TOC approval payload.
    pub fn toc_approval(toc: TableOfContents) -> Self {
        let message = format!(
            "Review the proposed table of contents ({} sections). Edit or approve to start generation.",
            toc.len()
        );
        Self::TocApproval { toc, message }
    }

    /// Builds the section feedback payload.
    pub fn section_feedback(section: GeneratedSection) -> Self {
        let message = format!(
            "Review section \"{}\". Approve to continue, regenerate with instructions, or skip.",
            section.title
        );
        let sources = section.sources.clone();
        Self::SectionFeedback {
            section,
            sources,
            message,
        }
    }
}

/// Decision supplied to resume from a TOC approval interrupt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocApprovalResponse {
    /// The TOC as the user accepted it (possibly edited).
    pub approved_toc: TableOfContents,
}

/// Decision supplied to resume from a section feedback interrupt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedbackResponse {
    pub action: FeedbackAction,

    /// Regeneration instructions; only meaningful for `Regenerate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Source chunk ids to keep for the regeneration pass; ids missing from
    /// this list are excluded from future retrieval. `None` keeps all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_sources: Option<Vec<String>>,
}

impl SectionFeedbackResponse {
    /// Approves the section as generated.
    pub fn approve() -> Self {
        Self {
            action: FeedbackAction::Approve,
            instructions: None,
            remaining_sources: None,
        }
    }

    /// Keeps the current content and advances.
    pub fn skip() -> Self {
        Self {
            action: FeedbackAction::Skip,
            instructions: None,
            remaining_sources: None,
        }
    }

    /// Requests regeneration with optional instructions and source trim.
    pub fn regenerate(
        instructions: Option<String>,
        remaining_sources: Option<Vec<String>>,
    ) -> Self {
        Self {
            action: FeedbackAction::Regenerate,
            instructions,
            remaining_sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::toc::{TocSection, TocSource};

    #[test]
    fn toc_approval_serializes_with_type_tag() {
        let toc = TableOfContents::new(
            vec![TocSection::new("s1", "Executive Summary", 1)],
            TocSource::Fixed,
        );
        let interrupt = WorkflowInterrupt::toc_approval(toc);
        let json = serde_json::to_value(&interrupt).unwrap();
        assert_eq!(json["type"], "toc_approval");
        assert!(json["message"].as_str().unwrap().contains("1 sections"));
    }

    #[test]
    fn section_feedback_serializes_with_type_tag_and_sources() {
        let section = GeneratedSection::generated("s1", "Evaluation", "text").with_sources(
            vec!["c1".to_string()],
            Default::default(),
            vec!["Tender A.pdf".to_string()],
        );
        let interrupt = WorkflowInterrupt::section_feedback(section);
        let json = serde_json::to_value(&interrupt).unwrap();
        assert_eq!(json["type"], "section_feedback");
        assert_eq!(json["sources"][0], "Tender A.pdf");
        assert!(json["message"].as_str().unwrap().contains("Evaluation"));
    }

    #[test]
    fn response_constructors_set_actions() {
        assert_eq!(
            SectionFeedbackResponse::approve().action,
            FeedbackAction::Approve
        );
        assert_eq!(SectionFeedbackResponse::skip().action, FeedbackAction::Skip);
        let regen =
            SectionFeedbackResponse::regenerate(Some("shorter".to_string()), Some(vec![]));
        assert_eq!(regen.action, FeedbackAction::Regenerate);
        assert_eq!(regen.remaining_sources, Some(vec![]));
    }
}
