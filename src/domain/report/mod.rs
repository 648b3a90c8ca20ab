//! Report module - state, TOC, sections, and the generation workflow.

mod feedback;
mod interrupt;
mod planning;
mod section;
mod state;
mod toc;
mod transmittal;
pub mod workflow;

pub use feedback::{FeedbackAction, UserFeedback};
pub use interrupt::{
    SectionFeedbackResponse, TocApprovalResponse, WorkflowInterrupt,
};
pub use planning::{
    Discipline, Objective, PlanningContext, ProjectDetails, ReportTarget, Risk, Stage,
    Stakeholder, TargetKind, Trade,
};
pub use section::{GeneratedSection, RetrievedChunk};
pub use state::{
    ContentLength, GenerationMode, ReportLock, ReportState, ReportSummary, ReportType,
};
pub use toc::{validate_toc, TableOfContents, TocSection, TocSource, TocValidation};
pub use transmittal::{TransmittalContext, TransmittalDocument};
