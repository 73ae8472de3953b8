//! Reverse-geocoding outbound adapters.
//!
//! Two reqwest-backed implementations of the `ReverseGeocoder` port with
//! divergent wire formats. Adapters own transport details only: request
//! construction, timeout and HTTP error mapping, and JSON decoding.

mod amap;
mod dto;
mod lenient;
mod nominatim;

pub use amap::{AMapGeocoder, DEFAULT_AMAP_ENDPOINT};
pub use nominatim::{DEFAULT_NOMINATIM_ENDPOINT, NominatimGeocoder};

use reqwest::{StatusCode, Url};

use crate::domain::ports::GeocoderError;

/// Append path segments to a provider base URL, tolerating a trailing slash.
fn endpoint_with_path(base: &Url, segments: &[&str]) -> Result<Url, GeocoderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| GeocoderError::transport(format!("endpoint {base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    if error.is_timeout() {
        GeocoderError::timeout(error.to_string())
    } else {
        GeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocoderError {
    let preview = body_preview(body);
    if preview.is_empty() {
        GeocoderError::status(format!("status {}", status.as_u16()))
    } else {
        GeocoderError::status(format!("status {}: {preview}", status.as_u16()))
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Issue a GET and return the body of a successful response.
async fn fetch_body(request: reqwest::RequestBuilder) -> Result<Vec<u8>, GeocoderError> {
    fetch_body_accepting(request, |_| false).await
}

/// Issue a GET and return the body of a successful response, or of a
/// non-success response that `accept` admits for decoding.
async fn fetch_body_accepting(
    request: reqwest::RequestBuilder,
    accept: fn(&reqwest::Response) -> bool,
) -> Result<Vec<u8>, GeocoderError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let admitted = status.is_success() || accept(&response);
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !admitted {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    //! Coverage for shared URL and error helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://nominatim.openstreetmap.org", "https://nominatim.openstreetmap.org/reverse")]
    #[case("https://mirror.example/osm/", "https://mirror.example/osm/reverse")]
    #[case("http://127.0.0.1:8081", "http://127.0.0.1:8081/reverse")]
    fn appends_segments_to_base(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        let url = endpoint_with_path(&base, &["reverse"]).expect("joinable");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn status_errors_include_compacted_body() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"upstream\n   down");
        assert_eq!(error, GeocoderError::status("status 502: upstream down"));
    }

    #[rstest]
    fn status_errors_without_body_report_code_only() {
        let error = map_status_error(StatusCode::FOUND, b"");
        assert_eq!(error, GeocoderError::status("status 302"));
    }
}
