//! Report HTTP handlers.
//!
//! ```text
//! POST /reports/prepare
//! POST /reports/send
//! GET  /reports
//! ```

use actix_web::{get, post, web};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{PrepareReportRequest, PreparedReport, SendReportRequest};
use crate::domain::{ClipDuration, Error, Report, ReportId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for preparing a report.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PrepareReportRequestBody {
    #[serde(default)]
    #[schema(example = "dashcam-7")]
    pub device_id: String,
    #[schema(example = 31.2304)]
    pub lat: Option<f64>,
    #[schema(example = 121.4737)]
    pub lng: Option<f64>,
    /// Clip length; zero, negative or absent means 20 seconds.
    pub duration_sec: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for submitting a prepared report.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendReportRequestBody {
    #[serde(default)]
    #[schema(example = "rep_1a2b3c")]
    pub id: String,
}

/// Full report representation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ReportBody {
    pub id: String,
    #[schema(format = "date-time", example = "2026-05-04T09:15:00Z")]
    pub timestamp: String,
    pub lat: f64,
    pub lng: f64,
    pub city: String,
    pub road_name: String,
    pub is_highway: bool,
    pub video_url: String,
    #[schema(example = "prepared")]
    pub status: String,
    pub device_id: String,
    pub tags: Vec<String>,
}

/// Prepare response: the stored report plus the active geocoder identity.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct PreparedReportBody {
    #[serde(flatten)]
    pub report: ReportBody,
    #[schema(example = "nominatim")]
    pub provider: String,
}

/// Send response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct SendReportResponseBody {
    pub id: String,
    #[schema(example = "submitted")]
    pub status: String,
    pub submitted: bool,
}

impl From<&Report> for ReportBody {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id().to_string(),
            timestamp: report
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            lat: report.latitude(),
            lng: report.longitude(),
            city: report.city().to_owned(),
            road_name: report.road_name().to_owned(),
            is_highway: report.is_highway(),
            video_url: report.video_url().to_owned(),
            status: report.status().to_string(),
            device_id: report.device_id().to_owned(),
            tags: report.tags().to_vec(),
        }
    }
}

impl From<PreparedReport> for PreparedReportBody {
    fn from(value: PreparedReport) -> Self {
        Self {
            report: ReportBody::from(&value.report),
            provider: value.provider.to_owned(),
        }
    }
}

fn missing_field(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn parse_coordinate(value: Option<f64>, field: &str, limit: f64) -> Result<f64, Error> {
    let value = value.ok_or_else(|| missing_field(field))?;
    if !value.is_finite() || !(-limit..=limit).contains(&value) {
        return Err(
            Error::invalid_request(format!("{field} must be within [-{limit}, {limit}]"))
                .with_details(json!({ "field": field, "value": value, "code": "out_of_range" })),
        );
    }
    Ok(value)
}

fn parse_prepare_request(body: PrepareReportRequestBody) -> Result<PrepareReportRequest, Error> {
    if body.device_id.trim().is_empty() {
        return Err(missing_field("device_id"));
    }
    Ok(PrepareReportRequest {
        latitude: parse_coordinate(body.lat, "lat", 90.0)?,
        longitude: parse_coordinate(body.lng, "lng", 180.0)?,
        device_id: body.device_id,
        duration: ClipDuration::from_requested(body.duration_sec.unwrap_or_default()),
        tags: body.tags,
    })
}

fn parse_send_request(body: SendReportRequestBody) -> Result<SendReportRequest, Error> {
    let id = ReportId::new(body.id).map_err(|_| missing_field("id"))?;
    Ok(SendReportRequest { id })
}

/// Geocode the position, capture the latest clip and store a prepared
/// report.
#[utoipa::path(
    post,
    path = "/reports/prepare",
    request_body = PrepareReportRequestBody,
    responses(
        (status = 200, description = "Report prepared", body = PreparedReportBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 502, description = "Video capture failed", body = Error)
    ),
    tags = ["reports"],
    operation_id = "prepareReport"
)]
#[post("/reports/prepare")]
pub async fn prepare_report(
    state: web::Data<HttpState>,
    payload: web::Json<PrepareReportRequestBody>,
) -> ApiResult<web::Json<PreparedReportBody>> {
    let request = parse_prepare_request(payload.into_inner())?;
    let prepared = state.reports.prepare(request).await?;
    Ok(web::Json(PreparedReportBody::from(prepared)))
}

/// Mark a prepared report as submitted. Re-sending is accepted.
#[utoipa::path(
    post,
    path = "/reports/send",
    request_body = SendReportRequestBody,
    responses(
        (status = 200, description = "Report submitted", body = SendReportResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown report id", body = Error)
    ),
    tags = ["reports"],
    operation_id = "sendReport"
)]
#[post("/reports/send")]
pub async fn send_report(
    state: web::Data<HttpState>,
    payload: web::Json<SendReportRequestBody>,
) -> ApiResult<web::Json<SendReportResponseBody>> {
    let request = parse_send_request(payload.into_inner())?;
    let report = state.reports.send(request).await?;
    Ok(web::Json(SendReportResponseBody {
        id: report.id().to_string(),
        status: report.status().to_string(),
        submitted: true,
    }))
}

/// List every stored report in no particular order.
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "Stored reports", body = [ReportBody])
    ),
    tags = ["reports"],
    operation_id = "listReports"
)]
#[get("/reports")]
pub async fn list_reports(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ReportBody>>> {
    let reports = state.reports_query.list_reports().await?;
    Ok(web::Json(reports.iter().map(ReportBody::from).collect()))
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
