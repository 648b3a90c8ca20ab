//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the report generation domain.

mod errors;
mod ids;
mod report_status;
mod section_status;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{OrganizationId, ProjectId, ReportId, StakeholderId, UserId};
pub use report_status::ReportStatus;
pub use section_status::SectionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
