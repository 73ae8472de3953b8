//! Driven port for reverse geocoding a coordinate pair.
//!
//! Providers return raw location fields. Placeholder substitution on failure
//! is the report service's job, never the adapter's.

use async_trait::async_trait;
use thiserror::Error;

/// Raw provider output before highway classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeocodeResult {
    /// City, or the closest administrative area the provider offers.
    pub city: String,
    /// Road name as reported by the provider.
    pub road: String,
    /// OSM-style road category; empty when unknown.
    pub category: String,
}

/// Errors surfaced while calling a reverse-geocoding provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocoderError {
    /// Network transport failed before a response arrived.
    #[error("geocoder transport failed: {message}")]
    Transport { message: String },
    /// The provider did not answer within the configured timeout.
    #[error("geocoder timeout: {message}")]
    Timeout { message: String },
    /// The provider answered with a non-success HTTP status.
    #[error("geocoder returned {message}")]
    Status { message: String },
    /// The response body could not be decoded.
    #[error("geocoder response decode failed: {message}")]
    Decode { message: String },
    /// The provider reported a failure inside a well-formed response.
    #[error("geocoder provider error: {message}")]
    Provider { message: String },
}

impl GeocoderError {
    /// Helper for transport failures.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for timeouts.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for HTTP status failures.
    #[must_use]
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Helper for provider-reported failures.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

/// Port for resolving coordinates into city, road and road category.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve one WGS84 coordinate pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snapreport_backend::domain::ports::{FixtureReverseGeocoder, ReverseGeocoder};
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let geocoder = FixtureReverseGeocoder;
    /// let result = geocoder.reverse_geocode(31.23, 121.47).await.expect("fixture");
    /// assert_eq!(result.city, "Fixture City");
    /// # });
    /// ```
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodeResult, GeocoderError>;

    /// Stable provider identity used in responses and logs.
    fn provider(&self) -> &'static str;
}

/// Fixture geocoder returning a fixed, non-highway location.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureReverseGeocoder;

#[async_trait]
impl ReverseGeocoder for FixtureReverseGeocoder {
    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<GeocodeResult, GeocoderError> {
        Ok(GeocodeResult {
            city: "Fixture City".to_owned(),
            road: "Fixture Road".to_owned(),
            category: "residential".to_owned(),
        })
    }

    fn provider(&self) -> &'static str {
        "fixture"
    }
}
