//! Reqwest-backed AMap (Gaode) reverse geocoder.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::AMapRegeoDto;
use super::{endpoint_with_path, fetch_body};
use crate::domain::ports::{GeocodeResult, GeocoderError, ReverseGeocoder};

/// Public AMap web service host.
pub const DEFAULT_AMAP_ENDPOINT: &str = "https://restapi.amap.com";

const PROVIDER: &str = "amap";

/// AMap adapter issuing `GET /v3/geocode/regeo` requests.
pub struct AMapGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl AMapGeocoder {
    /// Build an adapter authenticated with `api_key`.
    /// ```rust,ignore
    /// let geocoder = AMapGeocoder::new(endpoint, key, timeout)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// AMap takes `location` as `lng,lat`.
    fn regeo_url(&self, latitude: f64, longitude: f64) -> Result<Url, GeocoderError> {
        let mut url = endpoint_with_path(&self.endpoint, &["v3", "geocode", "regeo"])?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("location", &format!("{longitude:.6},{latitude:.6}"))
            .append_pair("output", "json")
            .append_pair("extensions", "base")
            .append_pair("roadlevel", "1");
        Ok(url)
    }
}

fn parse_regeo(body: &[u8]) -> Result<GeocodeResult, GeocoderError> {
    let decoded: AMapRegeoDto = serde_json::from_slice(body)
        .map_err(|error| GeocoderError::decode(format!("invalid AMap JSON payload: {error}")))?;
    decoded.into_domain()
}

#[async_trait]
impl ReverseGeocoder for AMapGeocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodeResult, GeocoderError> {
        let url = self.regeo_url(latitude, longitude)?;
        // The URL carries the key; log coordinates only.
        debug!(provider = PROVIDER, latitude, longitude, "reverse geocoding");
        let body = fetch_body(
            self.client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json"),
        )
        .await?;
        parse_regeo(&body)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    //! Non-network coverage for the AMap adapter.

    use super::*;
    use rstest::rstest;

    fn geocoder() -> AMapGeocoder {
        AMapGeocoder::new(
            Url::parse(DEFAULT_AMAP_ENDPOINT).expect("valid endpoint"),
            "test-key",
            Duration::from_secs(10),
        )
        .expect("client builds")
    }

    #[rstest]
    fn regeo_url_puts_longitude_first() {
        let url = geocoder().regeo_url(22.543096, 114.057865).expect("url builds");
        assert_eq!(url.path(), "/v3/geocode/regeo");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("key", "test-key"),
                ("location", "114.057865,22.543096"),
                ("output", "json"),
                ("extensions", "base"),
                ("roadlevel", "1"),
            ]
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
        );
    }

    #[rstest]
    fn reports_provider_identity() {
        assert_eq!(geocoder().provider(), "amap");
    }

    #[rstest]
    fn failed_status_is_a_provider_error() {
        let body = br#"{"status":"0","info":"DAILY_QUERY_OVER_LIMIT","infocode":"10003"}"#;
        let error = parse_regeo(body).expect_err("status 0");
        assert_eq!(
            error,
            GeocoderError::provider("amap api error: DAILY_QUERY_OVER_LIMIT")
        );
    }

    #[rstest]
    fn malformed_payload_is_a_decode_error() {
        let error = parse_regeo(b"{").expect_err("truncated");
        assert!(matches!(error, GeocoderError::Decode { .. }));
    }
}
