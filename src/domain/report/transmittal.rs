//! Transmittal - a dated document bundle rendered as a data-only appendix.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::section::GeneratedSection;

/// Section id used for the transmittal appendix.
pub(crate) const TRANSMITTAL_SECTION_ID: &str = "appendix-transmittal";

/// A document listed in a transmittal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmittalDocument {
    pub name: String,
    pub version: String,
    pub category: String,
}

/// A dated bundle of documents attached to a procurement artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmittalContext {
    pub documents: Vec<TransmittalDocument>,
    pub issued_at: Timestamp,
}

impl TransmittalContext {
    pub fn new(documents: Vec<TransmittalDocument>) -> Self {
        Self {
            documents,
            issued_at: Timestamp::now(),
        }
    }

    /// True when there is at least one document to render. Presence of a
    /// non-empty transmittal is a first-class workflow branch condition.
    pub fn has_documents(&self) -> bool {
        !self.documents.is_empty()
    }
}

impl TransmittalContext {
    /// Renders the transmittal as a pure data table and wraps it as the
    /// appendix section. No LLM call involved; appendices never carry AI
    /// sources.
    pub fn to_appendix_section(&self) -> GeneratedSection {
        let mut table = String::from("| Document | Version | Category |\n|---|---|---|\n");
        for doc in &self.documents {
            table.push_str(&format!(
                "| {} | {} | {} |\n",
                doc.name, doc.version, doc.category
            ));
        }
        GeneratedSection::appendix(TRANSMITTAL_SECTION_ID, "Appendix A - Transmittal", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transmittal() -> TransmittalContext {
        TransmittalContext::new(vec![
            TransmittalDocument {
                name: "Architectural Drawings".to_string(),
                version: "Rev C".to_string(),
                category: "Drawings".to_string(),
            },
            TransmittalDocument {
                name: "Structural Specification".to_string(),
                version: "Rev A".to_string(),
                category: "Specifications".to_string(),
            },
        ])
    }

    #[test]
    fn appendix_section_is_flagged_and_sourceless() {
        let section = sample_transmittal().to_appendix_section();
        assert!(section.is_appendix);
        assert!(section.source_chunk_ids.is_empty());
        assert_eq!(section.id, TRANSMITTAL_SECTION_ID);
        assert_eq!(section.title, "Appendix A - Transmittal");
        assert!(section.title.is_ascii());
    }

    #[test]
    fn appendix_table_lists_every_document() {
        let section = sample_transmittal().to_appendix_section();
        assert!(section.content.contains("| Architectural Drawings | Rev C | Drawings |"));
        assert!(section
            .content
            .contains("| Structural Specification | Rev A | Specifications |"));
    }

    #[test]
    fn empty_transmittal_has_no_documents() {
        let transmittal = TransmittalContext::new(vec![]);
        assert!(!transmittal.has_documents());
    }
}
