//! HTTP inbound adapter exposing the report endpoints and health probes.

pub mod error;
pub mod health;
pub mod reports;
pub mod state;

pub use error::ApiResult;

use actix_web::web;

use crate::domain::Error;

/// JSON extractor configuration returning the domain error envelope for
/// malformed bodies instead of Actix's plain-text default.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _request| {
        Error::invalid_request(format!("invalid json: {error}")).into()
    })
}

/// Register report routes, health routes and the JSON extractor config.
///
/// Callers still provide `web::Data<HttpState>` and
/// `web::Data<HealthState>` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(reports::prepare_report)
        .service(reports::send_report)
        .service(reports::list_reports)
        .service(health::health)
        .service(health::ready)
        .service(health::live);
}
