//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the report and health endpoints together with their
//! request, response and error schemas. Swagger UI serves it in debug
//! builds and `cargo run --bin openapi-dump` exports it for tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::HealthStatusBody;
use crate::inbound::http::reports::{
    PrepareReportRequestBody, PreparedReportBody, ReportBody, SendReportRequestBody,
    SendReportResponseBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SnapReport backend API",
        description = "Prepare, submit and list dashcam incident reports."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::reports::prepare_report,
        crate::inbound::http::reports::send_report,
        crate::inbound::http::reports::list_reports,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        HealthStatusBody,
        PrepareReportRequestBody,
        PreparedReportBody,
        ReportBody,
        SendReportRequestBody,
        SendReportResponseBody,
    )),
    tags(
        (name = "reports", description = "Incident report lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/reports/prepare")]
    #[case("/reports/send")]
    #[case("/reports")]
    #[case("/health")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn registers_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("ReportBody", "road_name")]
    #[case("ReportBody", "is_highway")]
    #[case("SendReportResponseBody", "submitted")]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }
}
