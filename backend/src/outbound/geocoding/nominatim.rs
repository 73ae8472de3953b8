//! Reqwest-backed Nominatim reverse geocoder.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::NominatimReverseDto;
use super::{endpoint_with_path, fetch_body_accepting};
use crate::domain::ports::{GeocodeResult, GeocoderError, ReverseGeocoder};

/// Public OSM Nominatim instance.
pub const DEFAULT_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

const PROVIDER: &str = "nominatim";
const MAX_REDIRECTS: usize = 10;

/// Nominatim adapter issuing `GET /reverse?format=jsonv2` requests.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl NominatimGeocoder {
    /// Build an adapter with TLS 1.2 or newer, no ambient proxy and no
    /// redirects to plain HTTP.
    /// ```rust,ignore
    /// let geocoder = NominatimGeocoder::new(endpoint, "SnapReport/1.0", timeout)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .no_proxy()
            .redirect(Policy::custom(refuse_insecure_redirect))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: user_agent.into(),
        })
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> Result<Url, GeocoderError> {
        let mut url = endpoint_with_path(&self.endpoint, &["reverse"])?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &format!("{latitude:.6}"))
            .append_pair("lon", &format!("{longitude:.6}"));
        Ok(url)
    }
}

// A stopped redirect hands the 3xx response back to the caller, whose body is
// then decoded as the final answer.
fn refuse_insecure_redirect(attempt: Attempt<'_>) -> reqwest::redirect::Action {
    if attempt.url().scheme() == "http" {
        attempt.stop()
    } else if attempt.previous().len() >= MAX_REDIRECTS {
        attempt.error("too many redirects")
    } else {
        attempt.follow()
    }
}

/// True when `status` is a redirect whose `location` resolves to plain HTTP,
/// i.e. one that [`refuse_insecure_redirect`] declined to follow.
fn is_stopped_downgrade(status: StatusCode, current: &Url, location: Option<&str>) -> bool {
    status.is_redirection()
        && location
            .and_then(|target| current.join(target).ok())
            .is_some_and(|target| target.scheme() == "http")
}

fn accept_stopped_downgrade(response: &reqwest::Response) -> bool {
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok());
    is_stopped_downgrade(response.status(), response.url(), location)
}

fn parse_reverse(body: &[u8]) -> Result<GeocodeResult, GeocoderError> {
    let decoded: NominatimReverseDto = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid Nominatim JSON payload: {error}"))
    })?;
    decoded.into_domain()
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodeResult, GeocoderError> {
        let url = self.reverse_url(latitude, longitude)?;
        debug!(provider = PROVIDER, %url, "reverse geocoding");
        let body = fetch_body_accepting(
            self.client
                .get(url)
                .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
                .header(reqwest::header::ACCEPT, "application/json"),
            accept_stopped_downgrade,
        )
        .await?;
        parse_reverse(&body)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}
