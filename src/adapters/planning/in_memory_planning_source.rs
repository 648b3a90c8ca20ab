//! In-memory Planning Source - seeded project data for tests and demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{ProjectId, StakeholderId};
use crate::domain::report::{PlanningContext, TransmittalContext};
use crate::ports::{PlanningSource, PlanningSourceError};

/// Planning source backed by seeded maps.
#[derive(Default)]
pub struct InMemoryPlanningSource {
    contexts: Mutex<HashMap<ProjectId, PlanningContext>>,
    transmittals: Mutex<HashMap<(ProjectId, StakeholderId), TransmittalContext>>,
    stakeholder_names: Mutex<HashMap<StakeholderId, String>>,
}

impl InMemoryPlanningSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the planning context for a project.
    pub fn with_context(self, project_id: ProjectId, context: PlanningContext) -> Self {
        self.contexts
            .lock()
            .expect("planning lock poisoned")
            .insert(project_id, context);
        self
    }

    /// Seeds a transmittal for a stakeholder's procurement artifact.
    pub fn with_transmittal(
        self,
        project_id: ProjectId,
        stakeholder_id: StakeholderId,
        transmittal: TransmittalContext,
    ) -> Self {
        self.transmittals
            .lock()
            .expect("planning lock poisoned")
            .insert((project_id, stakeholder_id), transmittal);
        self
    }

    /// Seeds a stakeholder display name.
    pub fn with_stakeholder_name(
        self,
        stakeholder_id: StakeholderId,
        name: impl Into<String>,
    ) -> Self {
        self.stakeholder_names
            .lock()
            .expect("planning lock poisoned")
            .insert(stakeholder_id, name.into());
        self
    }
}

#[async_trait]
impl PlanningSource for InMemoryPlanningSource {
    async fn fetch_planning_context(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<PlanningContext>, PlanningSourceError> {
        Ok(self
            .contexts
            .lock()
            .expect("planning lock poisoned")
            .get(&project_id)
            .cloned())
    }

    async fn fetch_transmittal(
        &self,
        project_id: ProjectId,
        stakeholder_id: StakeholderId,
    ) -> Result<Option<TransmittalContext>, PlanningSourceError> {
        Ok(self
            .transmittals
            .lock()
            .expect("planning lock poisoned")
            .get(&(project_id, stakeholder_id))
            .cloned())
    }

    async fn stakeholder_name(
        &self,
        stakeholder_id: StakeholderId,
    ) -> Result<Option<String>, PlanningSourceError> {
        Ok(self
            .stakeholder_names
            .lock()
            .expect("planning lock poisoned")
            .get(&stakeholder_id)
            .cloned())
    }
}
