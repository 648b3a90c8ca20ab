//! In-memory Report Store - for tests and single-process demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ReportId, ReportStatus};
use crate::domain::report::ReportState;
use crate::ports::{ReportStore, ReportStoreError};

/// Report store backed by a shared in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportStore {
    reports: Arc<RwLock<HashMap<ReportId, ReportState>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reports.read().await.is_empty()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn get_report(&self, id: ReportId) -> Result<ReportState, ReportStoreError> {
        self.reports
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ReportStoreError::NotFound(id))
    }

    async fn save_report(&self, id: ReportId, state: &ReportState) -> Result<(), ReportStoreError> {
        self.reports.write().await.insert(id, state.clone());
        Ok(())
    }

    async fn update_report_status(
        &self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportStoreError> {
        let mut reports = self.reports.write().await;
        let state = reports.get_mut(&id).ok_or(ReportStoreError::NotFound(id))?;
        state.status = status;
        Ok(())
    }

    async fn exists(&self, id: ReportId) -> Result<bool, ReportStoreError> {
        Ok(self.reports.read().await.contains_key(&id))
    }

    async fn delete(&self, id: ReportId) -> Result<(), ReportStoreError> {
        self.reports.write().await.remove(&id);
        Ok(())
    }
}
