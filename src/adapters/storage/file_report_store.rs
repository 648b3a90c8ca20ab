//! File-based Report Store
//!
//! Persists each report's full state as one JSON file under a base
//! directory, so a parked workflow survives a process restart and the files
//! stay easy to inspect while debugging.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{ReportId, ReportStatus};
use crate::domain::report::ReportState;
use crate::ports::{ReportStore, ReportStoreError};

/// Report store backed by JSON files on disk.
#[derive(Debug, Clone)]
pub struct FileReportStore {
    base_path: PathBuf,
}

impl FileReportStore {
    /// Create a new file store rooted at `base_path`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn report_file_path(&self, id: ReportId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    async fn ensure_base_dir(&self) -> Result<(), ReportStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ReportStoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn get_report(&self, id: ReportId) -> Result<ReportState, ReportStoreError> {
        let file_path = self.report_file_path(id);
        if !file_path.exists() {
            return Err(ReportStoreError::NotFound(id));
        }

        let json = fs::read_to_string(&file_path)
            .await
            .map_err(|e| ReportStoreError::IoError(e.to_string()))?;

        serde_json::from_str(&json)
            .map_err(|e| ReportStoreError::DeserializationFailed(e.to_string()))
    }

    async fn save_report(&self, id: ReportId, state: &ReportState) -> Result<(), ReportStoreError> {
        self.ensure_base_dir().await?;

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| ReportStoreError::SerializationFailed(e.to_string()))?;

        fs::write(self.report_file_path(id), json)
            .await
            .map_err(|e| ReportStoreError::IoError(e.to_string()))
    }

    async fn update_report_status(
        &self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportStoreError> {
        let mut state = self.get_report(id).await?;
        state.status = status;
        self.save_report(id, &state).await
    }

    async fn exists(&self, id: ReportId) -> Result<bool, ReportStoreError> {
        Ok(self.report_file_path(id).exists())
    }

    async fn delete(&self, id: ReportId) -> Result<(), ReportStoreError> {
        let file_path = self.report_file_path(id);
        if file_path.exists() {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| ReportStoreError::IoError(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrganizationId, ProjectId};
    use crate::domain::report::ReportTarget;
    use tempfile::TempDir;

    fn test_state() -> ReportState {
        ReportState::new(
            ProjectId::new(),
            OrganizationId::new(),
            "Tender Recommendation",
            ReportTarget::trade("Concrete Works"),
        )
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileReportStore::new(temp_dir.path());
        let state = test_state();

        store.save_report(state.report_id, &state).await.unwrap();
        let loaded = store.get_report(state.report_id).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn load_nonexistent_report() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileReportStore::new(temp_dir.path());

        let result = store.get_report(ReportId::new()).await;
        assert!(matches!(result, Err(ReportStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn status_update_rewrites_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileReportStore::new(temp_dir.path());
        let state = test_state();
        store.save_report(state.report_id, &state).await.unwrap();

        store
            .update_report_status(state.report_id, ReportStatus::Complete)
            .await
            .unwrap();

        let loaded = store.get_report(state.report_id).await.unwrap();
        assert_eq!(loaded.status, ReportStatus::Complete);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileReportStore::new(temp_dir.path());
        let state = test_state();

        store.save_report(state.report_id, &state).await.unwrap();
        store.delete(state.report_id).await.unwrap();
        assert!(!store.exists(state.report_id).await.unwrap());

        // Deleting again is a no-op.
        store.delete(state.report_id).await.unwrap();
    }

    #[tokio::test]
    async fn multiple_reports_live_side_by_side() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileReportStore::new(temp_dir.path());

        let a = test_state();
        let b = test_state();
        store.save_report(a.report_id, &a).await.unwrap();
        store.save_report(b.report_id, &b).await.unwrap();

        assert_eq!(store.get_report(a.report_id).await.unwrap(), a);
        assert_eq!(store.get_report(b.report_id).await.unwrap(), b);
    }
}
