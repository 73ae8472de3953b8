//! Driven port for report storage.
//!
//! Implementations own the authoritative copy of every report and hand out
//! clones, so callers can never mutate stored state in place.

use async_trait::async_trait;

use crate::domain::{Report, ReportId};

/// Keyed report store with upsert semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert or replace the report stored under its id. Last write wins.
    async fn save(&self, report: Report);

    /// Fetch a copy of the report stored under `id`.
    async fn find_by_id(&self, id: &ReportId) -> Option<Report>;

    /// Snapshot every stored report. Order is unspecified.
    async fn list(&self) -> Vec<Report>;
}
