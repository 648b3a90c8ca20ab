//! TOC Memory Port - previously approved TOC patterns per organization.
//!
//! Pattern reuse is best-effort on both ends: a failed lookup falls back to
//! the fixed template, and a failed pattern upsert is logged and ignored.

use async_trait::async_trait;

use crate::domain::foundation::OrganizationId;
use crate::domain::report::{ReportTarget, ReportType, TableOfContents};

/// Errors from the TOC memory backend.
#[derive(Debug, thiserror::Error)]
pub enum TocMemoryError {
    #[error("Memory lookup failed: {0}")]
    LookupFailed(String),

    #[error("Pattern upsert failed: {0}")]
    UpsertFailed(String),
}

/// A remembered TOC pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTocResult {
    pub toc: TableOfContents,
    /// How many reports have reused this pattern; surfaced in the UI.
    pub times_used: u32,
}

/// Port for recalling and recording approved TOC patterns.
#[async_trait]
pub trait TocMemory: Send + Sync {
    /// Look up a previously approved TOC pattern for this organization,
    /// report type, and target discipline/trade.
    async fn fetch_memory_toc(
        &self,
        organization_id: OrganizationId,
        report_type: ReportType,
        target: &ReportTarget,
    ) -> Result<Option<MemoryTocResult>, TocMemoryError>;

    /// Record an approved TOC back as a pattern for future reuse.
    async fn record_pattern(
        &self,
        organization_id: OrganizationId,
        report_type: ReportType,
        target: &ReportTarget,
        toc: &TableOfContents,
    ) -> Result<(), TocMemoryError>;
}
