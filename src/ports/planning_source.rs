//! Planning Source Port - authoritative project data lookups.

use async_trait::async_trait;

use crate::domain::foundation::{ProjectId, StakeholderId};
use crate::domain::report::{PlanningContext, TransmittalContext};

/// Errors from the planning data source.
#[derive(Debug, thiserror::Error)]
pub enum PlanningSourceError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Planning data error: {0}")]
    DataError(String),
}

/// Port for fetching the authoritative project snapshot.
#[async_trait]
pub trait PlanningSource: Send + Sync {
    /// Fetch the planning context for a project.
    ///
    /// Returns `Ok(None)` when the project exists but has no planning data
    /// yet; this is distinct from the project itself being missing.
    async fn fetch_planning_context(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<PlanningContext>, PlanningSourceError>;

    /// Fetch the transmittal attached to a stakeholder's procurement
    /// artifact, if any.
    async fn fetch_transmittal(
        &self,
        project_id: ProjectId,
        stakeholder_id: StakeholderId,
    ) -> Result<Option<TransmittalContext>, PlanningSourceError>;

    /// Best-effort stakeholder display-name lookup.
    ///
    /// `Ok(None)` means the name could not be resolved; callers substitute a
    /// placeholder rather than failing.
    async fn stakeholder_name(
        &self,
        stakeholder_id: StakeholderId,
    ) -> Result<Option<String>, PlanningSourceError>;
}
