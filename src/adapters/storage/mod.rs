//! Report store adapters.

mod file_report_store;
mod in_memory_report_store;

pub use file_report_store::FileReportStore;
pub use in_memory_report_store::InMemoryReportStore;
