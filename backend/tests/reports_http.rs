//! End-to-end tests for the report HTTP surface over real adapters.

mod support;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};
use snapreport_backend::domain::ports::{
    FixtureReverseGeocoder, FixtureVideoCaptureSource, ReverseGeocoder, VideoCaptureSource,
};
use snapreport_backend::domain::{ReportService, ReportServicePorts};
use snapreport_backend::inbound::http;
use snapreport_backend::inbound::http::health::HealthState;
use snapreport_backend::inbound::http::reports::{PreparedReportBody, ReportBody};
use snapreport_backend::inbound::http::state::HttpState;
use snapreport_backend::outbound::device::DeviceVideoClient;
use snapreport_backend::outbound::geocoding::NominatimGeocoder;
use snapreport_backend::outbound::persistence::InMemoryReportRepository;
use support::closed_port_url;

async fn init_app(
    geocoder: Arc<dyn ReverseGeocoder>,
    video_capture: Arc<dyn VideoCaptureSource>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let service = Arc::new(ReportService::new(
        ReportServicePorts {
            geocoder,
            video_capture,
            repository: Arc::new(InMemoryReportRepository::new()),
        },
        Arc::new(DefaultClock),
    ));
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    actix_test::init_service(
        App::new()
            .app_data(health)
            .app_data(web::Data::new(HttpState::new(service.clone(), service)))
            .configure(http::configure),
    )
    .await
}

async fn fixture_app()
-> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    init_app(
        Arc::new(FixtureReverseGeocoder),
        Arc::new(FixtureVideoCaptureSource),
    )
    .await
}

fn prepare_request(device_id: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/reports/prepare")
        .set_json(json!({"device_id": device_id, "lat": 31.2304, "lng": 121.4737}))
        .to_request()
}

fn send_request(id: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/reports/send")
        .set_json(json!({ "id": id }))
        .to_request()
}

fn list_request() -> actix_http::Request {
    actix_test::TestRequest::get().uri("/reports").to_request()
}

#[rstest]
#[actix_web::test]
async fn list_after_prepares_returns_every_report_as_a_set() {
    let app = fixture_app().await;

    let mut prepared_ids = HashSet::new();
    for device in ["cam-a", "cam-b", "cam-c"] {
        let body: PreparedReportBody =
            actix_test::call_and_read_body_json(&app, prepare_request(device)).await;
        assert_eq!(body.report.status, "prepared");
        assert_eq!(body.provider, "fixture");
        assert!(!body.report.video_url.is_empty());
        prepared_ids.insert(body.report.id);
    }
    assert_eq!(prepared_ids.len(), 3, "ids are pairwise distinct");

    let listed: Vec<ReportBody> = actix_test::call_and_read_body_json(&app, list_request()).await;
    let listed_ids: HashSet<String> = listed.into_iter().map(|report| report.id).collect();
    assert_eq!(listed_ids, prepared_ids);
}

#[rstest]
#[actix_web::test]
async fn send_is_idempotent_and_visible_in_list() {
    let app = fixture_app().await;
    let prepared: PreparedReportBody =
        actix_test::call_and_read_body_json(&app, prepare_request("cam-a")).await;
    let id = prepared.report.id;

    for _ in 0..2 {
        let response = actix_test::call_service(&app, send_request(&id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body, json!({"id": id, "status": "submitted", "submitted": true}));
    }

    let listed: Vec<ReportBody> = actix_test::call_and_read_body_json(&app, list_request()).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, "submitted");
    assert_eq!(listed[0].city, prepared.report.city);
}

#[rstest]
#[actix_web::test]
async fn send_unknown_id_is_not_found_and_leaves_store_unchanged() {
    let app = fixture_app().await;
    let _: PreparedReportBody =
        actix_test::call_and_read_body_json(&app, prepare_request("cam-a")).await;

    let response = actix_test::call_service(&app, send_request("rep_missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed: Vec<ReportBody> = actix_test::call_and_read_body_json(&app, list_request()).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, "prepared");
}

#[rstest]
#[actix_web::test]
async fn geocoder_outage_still_stores_placeholder_location() {
    let geocoder =
        NominatimGeocoder::new(closed_port_url(), "SnapReport/1.0", Duration::from_secs(2))
            .expect("client builds");
    let app = init_app(Arc::new(geocoder), Arc::new(FixtureVideoCaptureSource)).await;

    let body: PreparedReportBody =
        actix_test::call_and_read_body_json(&app, prepare_request("cam-a")).await;

    assert_eq!(body.report.city, "Unknown");
    assert_eq!(body.report.road_name, "Unknown");
    assert!(!body.report.is_highway);
    assert_eq!(body.provider, "nominatim");
}

#[rstest]
#[actix_web::test]
async fn mock_mode_device_outage_yields_synthetic_clip() {
    let device = DeviceVideoClient::new(closed_port_url(), 2, true).expect("client builds");
    let app = init_app(Arc::new(FixtureReverseGeocoder), Arc::new(device)).await;

    let body: PreparedReportBody =
        actix_test::call_and_read_body_json(&app, prepare_request("cam-9")).await;

    assert_eq!(body.report.video_url, "ddpai://device/cam-9/clip?duration=20");
}

#[rstest]
#[actix_web::test]
async fn device_outage_without_mock_mode_is_bad_gateway_and_stores_nothing() {
    let device = DeviceVideoClient::new(closed_port_url(), 2, false).expect("client builds");
    let app = init_app(Arc::new(FixtureReverseGeocoder), Arc::new(device)).await;

    let response = actix_test::call_service(&app, prepare_request("cam-9")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "upstream_unavailable");
    assert_eq!(body["details"]["code"], "device_transport");

    let listed: Vec<ReportBody> = actix_test::call_and_read_body_json(&app, list_request()).await;
    assert!(listed.is_empty());
}

#[rstest]
#[actix_web::test]
async fn health_endpoints_are_served() {
    let app = fixture_app().await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/health").to_request(),
    )
    .await;
    assert_eq!(body, json!({"status": "ok"}));

    let ready = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(ready.status(), StatusCode::OK);
}
