//! Command and query handlers.

pub mod report;
