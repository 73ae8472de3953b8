//! Server construction and adapter wiring.

mod config;

pub use config::AppSettings;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

#[cfg(debug_assertions)]
use snapreport_backend::doc::ApiDoc;
use snapreport_backend::domain::ports::{ReverseGeocoder, VideoCaptureSource};
use snapreport_backend::domain::{ReportService, ReportServicePorts};
use snapreport_backend::inbound::http;
use snapreport_backend::inbound::http::health::HealthState;
use snapreport_backend::inbound::http::state::HttpState;
use snapreport_backend::outbound::device::DeviceVideoClient;
use snapreport_backend::outbound::geocoding::{AMapGeocoder, NominatimGeocoder};
use snapreport_backend::outbound::persistence::InMemoryReportRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use config::{GeocoderKind, SettingsError, mask_api_key};

fn build_geocoder(settings: &AppSettings) -> Result<Arc<dyn ReverseGeocoder>, SettingsError> {
    let timeout = settings.geocoder_timeout();
    match settings.geocoder_kind() {
        GeocoderKind::AMap => {
            let api_key = settings.geocoder_api_key()?;
            let geocoder = AMapGeocoder::new(settings.amap_endpoint()?, api_key, timeout)
                .map_err(|source| SettingsError::Client {
                    adapter: "amap",
                    source,
                })?;
            info!(api_key = %mask_api_key(api_key), "using AMap geocoder");
            Ok(Arc::new(geocoder))
        }
        GeocoderKind::Nominatim => {
            let user_agent = settings.geocoder_user_agent();
            let geocoder =
                NominatimGeocoder::new(settings.nominatim_endpoint()?, user_agent, timeout)
                    .map_err(|source| SettingsError::Client {
                        adapter: "nominatim",
                        source,
                    })?;
            info!(user_agent, "using Nominatim geocoder");
            Ok(Arc::new(geocoder))
        }
    }
}

fn build_video_capture(
    settings: &AppSettings,
) -> Result<Arc<dyn VideoCaptureSource>, SettingsError> {
    let client = DeviceVideoClient::new(
        settings.device_base_url()?,
        settings.device_timeout_seconds(),
        settings.device_mock_mode,
    )
    .map_err(|source| SettingsError::Client {
        adapter: "device",
        source,
    })?;
    info!(mock_mode = settings.device_mock_mode, "device client configured");
    Ok(Arc::new(client))
}

fn build_http_state(settings: &AppSettings) -> Result<HttpState, SettingsError> {
    let service = Arc::new(ReportService::new(
        ReportServicePorts {
            geocoder: build_geocoder(settings)?,
            video_capture: build_video_capture(settings)?,
            repository: Arc::new(InMemoryReportRepository::new()),
        },
        Arc::new(DefaultClock),
    ));
    Ok(HttpState::new(service.clone(), service))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(http::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Wire adapters from `settings` and construct the Actix server.
///
/// # Errors
/// Returns [`std::io::Error`] when adapter configuration is invalid or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &AppSettings,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(settings).map_err(std::io::Error::other)?);
    let bind_addr = settings.bind_addr();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "SnapReport backend listening");
    health_state.mark_ready();
    Ok(server)
}
