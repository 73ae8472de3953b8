//! Application settings loaded via OrthoConfig.
//!
//! Values layer defaults, an optional configuration file, `SNAPREPORT_*`
//! environment variables and command-line flags.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use snapreport_backend::outbound::geocoding::{DEFAULT_AMAP_ENDPOINT, DEFAULT_NOMINATIM_ENDPOINT};
use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_DEVICE_BASE_URL: &str = "http://193.168.0.1";
const DEFAULT_DEVICE_TIMEOUT_SECONDS: i64 = 5;
const DEFAULT_USER_AGENT: &str = "SnapReport/1.0";
const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 10;

/// Reverse-geocoding backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderKind {
    Nominatim,
    AMap,
}

/// Errors raised while turning settings into adapters.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// AMap was selected without an API key.
    #[error("geocoder_provider = amap requires geocoder_api_key")]
    MissingApiKey,
    /// A URL-valued setting did not parse.
    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    /// An HTTP client could not be built.
    #[error("failed to build {adapter} HTTP client: {source}")]
    Client {
        adapter: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Process configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SNAPREPORT")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Base URL of the dashcam's CGI interface.
    pub device_base_url: Option<String>,
    /// Device request timeout; zero or negative means the default.
    pub device_timeout_seconds: Option<i64>,
    /// Synthesize clip URLs whenever the device cannot supply one.
    #[ortho_config(default = false)]
    pub device_mock_mode: bool,
    /// `nominatim` or `amap`.
    pub geocoder_provider: Option<String>,
    /// User-Agent sent to Nominatim.
    pub geocoder_user_agent: Option<String>,
    /// AMap web-service key.
    pub geocoder_api_key: Option<String>,
    /// Geocoder request timeout.
    pub geocoder_timeout_seconds: Option<u64>,
    /// Nominatim base URL override.
    pub nominatim_endpoint: Option<String>,
    /// AMap base URL override.
    pub amap_endpoint: Option<String>,
}

impl AppSettings {
    /// Socket address to listen on.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Parsed device base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn device_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "device_base_url",
            self.device_base_url
                .as_deref()
                .unwrap_or(DEFAULT_DEVICE_BASE_URL),
        )
    }

    /// Device request timeout in seconds; values of zero or less mean the adapter default.
    #[must_use]
    pub fn device_timeout_seconds(&self) -> i64 {
        self.device_timeout_seconds
            .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECONDS)
    }

    /// Selected geocoder; anything other than `amap` means Nominatim.
    #[must_use]
    pub fn geocoder_kind(&self) -> GeocoderKind {
        match self.geocoder_provider.as_deref().map(str::trim) {
            Some(provider) if provider.eq_ignore_ascii_case("amap") => GeocoderKind::AMap,
            _ => GeocoderKind::Nominatim,
        }
    }

    /// User-Agent sent to Nominatim.
    #[must_use]
    pub fn geocoder_user_agent(&self) -> &str {
        self.geocoder_user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Non-blank AMap key.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingApiKey`] when unset or blank.
    pub fn geocoder_api_key(&self) -> Result<&str, SettingsError> {
        self.geocoder_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingApiKey)
    }

    /// Per-request geocoder timeout; zero means the default.
    #[must_use]
    pub fn geocoder_timeout(&self) -> Duration {
        let seconds = self
            .geocoder_timeout_seconds
            .filter(|seconds| *seconds > 0)
            .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }

    /// Parsed Nominatim base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the override does not parse.
    pub fn nominatim_endpoint(&self) -> Result<Url, SettingsError> {
        parse_url(
            "nominatim_endpoint",
            self.nominatim_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_NOMINATIM_ENDPOINT),
        )
    }

    /// Parsed AMap base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the override does not parse.
    pub fn amap_endpoint(&self) -> Result<Url, SettingsError> {
        parse_url(
            "amap_endpoint",
            self.amap_endpoint.as_deref().unwrap_or(DEFAULT_AMAP_ENDPOINT),
        )
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|source| SettingsError::InvalidUrl { field, source })
}

/// Mask a secret for logging, keeping four characters at each end.
///
/// Keys of eight characters or fewer are fully hidden.
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_owned();
    }
    let head: String = chars.iter().take(4).collect();
    let tail: String = chars.iter().skip(chars.len() - 4).collect();
    format!("{head}***{tail}")
}
