//! Report orchestration service.
//!
//! Implements the report driving ports by composing the geocoder, the
//! highway classifier, the capture device and the report store. The three
//! outbound steps of `prepare` run strictly in sequence.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    GeocodeResult, PrepareReportRequest, PreparedReport, ReportCommand, ReportQuery,
    ReportRepository, ReverseGeocoder, SendReportRequest, VideoCaptureError, VideoCaptureRequest,
    VideoCaptureSource,
};
use crate::domain::{
    Error, Report, ReportDraft, ReportIdGenerator, UNKNOWN_LOCATION, classify_highway,
};

/// Driven ports consumed by [`ReportService`].
#[derive(Clone)]
pub struct ReportServicePorts {
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub video_capture: Arc<dyn VideoCaptureSource>,
    pub repository: Arc<dyn ReportRepository>,
}

/// Report service implementing [`ReportCommand`] and [`ReportQuery`].
pub struct ReportService {
    geocoder: Arc<dyn ReverseGeocoder>,
    video_capture: Arc<dyn VideoCaptureSource>,
    repository: Arc<dyn ReportRepository>,
    clock: Arc<dyn Clock>,
    ids: ReportIdGenerator,
}

impl ReportService {
    /// Create a service over the given ports, stamping reports with `clock`.
    /// ```rust,ignore
    /// let service = ReportService::new(ports, Arc::new(mockable::DefaultClock));
    /// ```
    #[must_use]
    pub fn new(ports: ReportServicePorts, clock: Arc<dyn Clock>) -> Self {
        let ReportServicePorts {
            geocoder,
            video_capture,
            repository,
        } = ports;
        Self {
            geocoder,
            video_capture,
            repository,
            clock,
            ids: ReportIdGenerator::new(),
        }
    }

    /// Identity of the configured geocoder.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        self.geocoder.provider()
    }

    async fn resolve_location(&self, latitude: f64, longitude: f64) -> GeocodeResult {
        match self.geocoder.reverse_geocode(latitude, longitude).await {
            Ok(location) => location,
            Err(error) => {
                warn!(
                    provider = self.geocoder.provider(),
                    error = %error,
                    "reverse geocoding failed; storing placeholder location"
                );
                GeocodeResult {
                    city: UNKNOWN_LOCATION.to_owned(),
                    road: UNKNOWN_LOCATION.to_owned(),
                    category: String::new(),
                }
            }
        }
    }
}

fn map_capture_error(error: VideoCaptureError) -> Error {
    let code = match &error {
        VideoCaptureError::Transport { .. } => "device_transport",
        VideoCaptureError::Timeout { .. } => "device_timeout",
        VideoCaptureError::Decode { .. } => "device_decode",
        VideoCaptureError::NoClipAvailable { .. } => "no_clip_available",
    };
    Error::upstream_unavailable(format!("capture video failed: {error}"))
        .with_details(json!({ "code": code }))
}

#[async_trait]
impl ReportCommand for ReportService {
    async fn prepare(&self, request: PrepareReportRequest) -> Result<PreparedReport, Error> {
        let PrepareReportRequest {
            device_id,
            latitude,
            longitude,
            duration,
            tags,
        } = request;

        let location = self.resolve_location(latitude, longitude).await;
        let is_highway = classify_highway(&location.category, &location.road);

        let video_url = self
            .video_capture
            .capture_recent_video(&VideoCaptureRequest {
                device_id: device_id.clone(),
                duration,
            })
            .await
            .map_err(map_capture_error)?;

        let now = self.clock.utc();
        let report = Report::prepared(ReportDraft {
            id: self.ids.next_id(now),
            created_at: now,
            latitude,
            longitude,
            city: location.city,
            road_name: location.road,
            is_highway,
            video_url,
            device_id,
            tags,
        });
        self.repository.save(report.clone()).await;

        info!(
            report_id = %report.id(),
            device_id = report.device_id(),
            is_highway,
            "report prepared"
        );
        Ok(PreparedReport {
            report,
            provider: self.geocoder.provider(),
        })
    }

    async fn send(&self, request: SendReportRequest) -> Result<Report, Error> {
        let mut report = self
            .repository
            .find_by_id(&request.id)
            .await
            .ok_or_else(|| Error::not_found(format!("report {} not found", request.id)))?;

        report.mark_submitted();
        self.repository.save(report.clone()).await;

        info!(report_id = %report.id(), "report submitted");
        Ok(report)
    }
}

#[async_trait]
impl ReportQuery for ReportService {
    async fn list_reports(&self) -> Result<Vec<Report>, Error> {
        Ok(self.repository.list().await)
    }
}

#[cfg(test)]
#[path = "report_service_tests.rs"]
mod tests;
