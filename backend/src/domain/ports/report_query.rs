//! Driving port for report reads.

use async_trait::async_trait;

use crate::domain::{Error, Report};

/// Domain use-case port for listing reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportQuery: Send + Sync {
    /// Return every stored report. Order is unspecified.
    async fn list_reports(&self) -> Result<Vec<Report>, Error>;
}
