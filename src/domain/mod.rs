//! Domain layer - pure business logic, no infrastructure concerns.

pub mod foundation;
pub mod inference;
pub mod report;
