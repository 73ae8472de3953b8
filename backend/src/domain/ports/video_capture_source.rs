//! Driven port for pulling a recent clip off a capture device.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ClipDuration;

/// Domain-owned capture request passed to the device adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCaptureRequest {
    /// Identifier of the device the clip belongs to.
    pub device_id: String,
    /// Requested clip length.
    pub duration: ClipDuration,
}

/// Errors surfaced while capturing a clip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoCaptureError {
    /// Network transport to the device failed.
    #[error("device transport failed: {message}")]
    Transport { message: String },
    /// The device did not answer within the configured timeout.
    #[error("device timeout: {message}")]
    Timeout { message: String },
    /// A device response could not be decoded.
    #[error("device response decode failed: {message}")]
    Decode { message: String },
    /// The device answered but offered nothing downloadable.
    #[error("no clip available: {reason}")]
    NoClipAvailable { reason: String },
}

impl VideoCaptureError {
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

    /// Helper for decode failures.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Helper for an empty playback list or an unnamed latest clip.
    #[must_use]
    pub fn no_clip_available(reason: impl Into<String>) -> Self {
        Self::NoClipAvailable {
            reason: reason.into(),
        }
    }
}

/// Port for resolving a downloadable URL for the device's most recent clip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCaptureSource: Send + Sync {
    /// Resolve the clip URL for one capture request.
    async fn capture_recent_video(
        &self,
        request: &VideoCaptureRequest,
    ) -> Result<String, VideoCaptureError>;
}

/// Fixture source returning a deterministic synthetic URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureVideoCaptureSource;

#[async_trait]
impl VideoCaptureSource for FixtureVideoCaptureSource {
    async fn capture_recent_video(
        &self,
        request: &VideoCaptureRequest,
    ) -> Result<String, VideoCaptureError> {
        Ok(format!(
            "fixture://device/{}/clip?duration={}",
            request.device_id, request.duration
        ))
    }
}
