//! Report generation workflow.
//!
//! The workflow is an explicit state machine: each node takes the current
//! `ReportState` and returns the updated state, and the two human-in-the-loop
//! suspension points are modeled as typed interrupt payloads with matching
//! `process_*` resume entry points. The same node functions back both
//! execution modes (in-process driver and API-driven resume), so the two
//! modes produce identical transitions by construction.

mod driver;
mod nodes;
mod routing;
mod templates;

pub use driver::{InterruptHandler, ReportWorkflow};
pub use nodes::{process_section_feedback, process_toc_approval, WorkflowNodes};
pub use routing::{route_after_feedback, route_after_finalize, FinalizeRoute, SectionRoute};
pub use templates::fixed_toc;

use crate::domain::foundation::{ReportId, ValidationError};
use crate::ports::{AIError, PlanningSourceError, ReportStoreError, RetrievalError};

/// Errors raised by workflow nodes.
///
/// Missing-precondition variants are fatal to the current node and propagate
/// unmodified to the caller, which is responsible for marking the persisted
/// report failed. Best-effort failures (memory lookup, pattern upsert,
/// stakeholder names) never surface here; they are logged inside the node.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("No planning context available; fetch it before generating a TOC")]
    MissingPlanningContext,

    #[error("No table of contents; generate one before awaiting approval")]
    MissingToc,

    #[error("No generated section at index {index} to review")]
    MissingSection { index: usize },

    #[error("Section index {index} is out of range for a {total}-section TOC")]
    SectionIndexOutOfRange { index: usize, total: usize },

    #[error("Polish mode requires a prior generation session")]
    NoPriorGeneration,

    #[error("Report {report_id} is locked by {locked_by_name}")]
    ReportLocked {
        report_id: ReportId,
        locked_by_name: String,
    },

    #[error("Report not found: {0}")]
    ReportNotFound(ReportId),

    #[error("Interrupt handling failed: {0}")]
    Interrupt(String),

    #[error("Invalid report status transition: {0}")]
    InvalidStatusTransition(#[from] ValidationError),

    #[error(transparent)]
    Ai(#[from] AIError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Planning(#[from] PlanningSourceError),

    #[error(transparent)]
    Store(#[from] ReportStoreError),
}
