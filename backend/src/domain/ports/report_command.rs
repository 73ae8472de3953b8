//! Driving port for report mutations.
//!
//! Inbound adapters use this port to prepare and submit reports without
//! knowing which geocoder or capture device sits behind the service.

use async_trait::async_trait;

use crate::domain::{ClipDuration, Error, Report, ReportId};

/// Input for preparing a report.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareReportRequest {
    /// Non-empty identifier of the source device, validated by the caller.
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub duration: ClipDuration,
    pub tags: Vec<String>,
}

/// Result of a successful preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReport {
    pub report: Report,
    /// Identity of the geocoder that resolved the location.
    pub provider: &'static str,
}

/// Input for submitting a stored report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReportRequest {
    pub id: ReportId,
}

/// Domain use-case port for preparing and submitting reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportCommand: Send + Sync {
    /// Geocode, classify, capture a clip, then store a prepared report.
    async fn prepare(&self, request: PrepareReportRequest) -> Result<PreparedReport, Error>;

    /// Mark a stored report as submitted.
    async fn send(&self, request: SendReportRequest) -> Result<Report, Error>;
}
