//! In-memory TOC Memory - approved patterns keyed per organization.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::OrganizationId;
use crate::domain::report::{ReportTarget, ReportType, TableOfContents};
use crate::ports::{MemoryTocResult, TocMemory, TocMemoryError};

type PatternKey = (OrganizationId, ReportType, ReportTarget);

struct StoredPattern {
    toc: TableOfContents,
    times_used: u32,
}

/// TOC memory backed by an in-process map.
///
/// `record_pattern` counts reuse: recording against an existing key bumps
/// `times_used` and replaces the stored sections with the latest approval.
#[derive(Default)]
pub struct InMemoryTocMemory {
    patterns: Mutex<HashMap<PatternKey, StoredPattern>>,
}

impl InMemoryTocMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TocMemory for InMemoryTocMemory {
    async fn fetch_memory_toc(
        &self,
        organization_id: OrganizationId,
        report_type: ReportType,
        target: &ReportTarget,
    ) -> Result<Option<MemoryTocResult>, TocMemoryError> {
        let patterns = self.patterns.lock().expect("memory lock poisoned");
        Ok(patterns
            .get(&(organization_id, report_type, target.clone()))
            .map(|stored| MemoryTocResult {
                toc: stored.toc.clone(),
                times_used: stored.times_used,
            }))
    }

    async fn record_pattern(
        &self,
        organization_id: OrganizationId,
        report_type: ReportType,
        target: &ReportTarget,
        toc: &TableOfContents,
    ) -> Result<(), TocMemoryError> {
        let mut patterns = self.patterns.lock().expect("memory lock poisoned");
        patterns
            .entry((organization_id, report_type, target.clone()))
            .and_modify(|stored| {
                stored.toc = toc.clone();
                stored.times_used += 1;
            })
            .or_insert_with(|| StoredPattern {
                toc: toc.clone(),
                times_used: 1,
            });
        Ok(())
    }
}
