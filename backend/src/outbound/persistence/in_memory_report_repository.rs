//! `tokio::sync::RwLock`-guarded report map.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::ReportRepository;
use crate::domain::{Report, ReportId};

/// In-memory [`ReportRepository`] with reader-writer locking.
///
/// Lists and lookups share the read lock; saves take the write lock for the
/// single map insert only.
#[derive(Debug, Default)]
pub struct InMemoryReportRepository {
    reports: RwLock<HashMap<ReportId, Report>>,
}

impl InMemoryReportRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn save(&self, report: Report) {
        let id = report.id().clone();
        self.reports.write().await.insert(id, report);
    }

    async fn find_by_id(&self, id: &ReportId) -> Option<Report> {
        self.reports.read().await.get(id).cloned()
    }

    async fn list(&self) -> Vec<Report> {
        self.reports.read().await.values().cloned().collect()
    }
}
