//! User feedback on a generated section.

use serde::{Deserialize, Serialize};

/// The decision a user makes when reviewing a generated section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    /// Accept the section as generated.
    Approve,
    /// Generate the section again, optionally with instructions and a
    /// trimmed source list.
    Regenerate,
    /// Keep whatever content exists and move on.
    Skip,
}

impl FeedbackAction {
    /// Returns true if the decision advances the section cursor.
    pub fn advances(&self) -> bool {
        matches!(self, Self::Approve | Self::Skip)
    }
}

/// The last feedback decision, kept in state only while it is pending
/// (cleared once the section advances).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFeedback {
    pub action: FeedbackAction,

    /// Free-text regeneration instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Source chunk ids the user chose to drop for the next pass.
    #[serde(default)]
    pub excluded_source_ids: Vec<String>,
}
