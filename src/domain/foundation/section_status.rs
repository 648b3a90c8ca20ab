//! Per-section generation status.

use serde::{Deserialize, Serialize};

/// Status of a single generated report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// Not yet generated.
    Pending,
    /// Generation in progress.
    Generating,
    /// Content generated and (implicitly or explicitly) accepted.
    Complete,
    /// User requested regeneration; a new pass is pending.
    Regenerating,
}

impl SectionStatus {
    /// Returns true if the section holds accepted content.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for SectionStatus {
    fn default() -> Self {
        Self::Pending
    }
}
