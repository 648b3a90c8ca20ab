//! Report Store Port - Interface for persisting report workflow state.
//!
//! The full `ReportState` is written at every suspension boundary and read
//! back on resume, so a stateless server can pick up a parked workflow after
//! a restart. Implementations must support atomic read of a single report
//! and atomic write of its full JSON-serializable state.

use async_trait::async_trait;

use crate::domain::foundation::{ReportId, ReportStatus};
use crate::domain::report::ReportState;

/// Errors that can occur during report store operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportStoreError {
    #[error("Report not found: {0}")]
    NotFound(ReportId),

    #[error("Failed to serialize report state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize report state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Port for persisting and loading report workflow state.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Load the full state of a report.
    ///
    /// # Errors
    /// Returns `ReportStoreError::NotFound` if no report exists.
    async fn get_report(&self, id: ReportId) -> Result<ReportState, ReportStoreError>;

    /// Save the full state of a report, replacing any previous state.
    async fn save_report(&self, id: ReportId, state: &ReportState) -> Result<(), ReportStoreError>;

    /// Update only the lifecycle status of a persisted report.
    async fn update_report_status(
        &self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportStoreError>;

    /// Check if a report exists.
    async fn exists(&self, id: ReportId) -> Result<bool, ReportStoreError>;

    /// Delete a report's state.
    async fn delete(&self, id: ReportId) -> Result<(), ReportStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_names_the_report() {
        let id = ReportId::new();
        let err = ReportStoreError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
