//! Reqwest-backed capture client for the dashcam CGI protocol.
//!
//! One capture runs three device calls in order: session acquisition, the
//! best-effort elevated-download toggle, and the playback listing. The
//! download URL is built locally and never fetched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::dto::{clip_name, playback_items, session_token};
use crate::domain::ports::{VideoCaptureError, VideoCaptureRequest, VideoCaptureSource};

/// Device request timeout applied when the configured value is not positive.
pub const DEFAULT_DEVICE_TIMEOUT_SECONDS: u64 = 5;

const COMMAND_PATH: &str = "cmd.cgi";
const MOCK_SCHEME: &str = "ddpai";

/// Capture client driving one device base URL.
pub struct DeviceVideoClient {
    client: Client,
    base_url: Url,
    mock_mode: bool,
}

impl DeviceVideoClient {
    /// Build a client for `base_url`.
    ///
    /// `timeout_seconds` values of zero or below fall back to
    /// [`DEFAULT_DEVICE_TIMEOUT_SECONDS`]. With `mock_mode` set, every
    /// device failure resolves to a synthetic `ddpai://` URL instead.
    /// ```rust,ignore
    /// let client = DeviceVideoClient::new(base_url, 5, false)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout_seconds: i64,
        mock_mode: bool,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(effective_timeout(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url,
            mock_mode,
        })
    }

    fn command_url(
        &self,
        command: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, VideoCaptureError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                VideoCaptureError::transport(format!(
                    "device base URL {} cannot be a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(COMMAND_PATH);
        url.query_pairs_mut()
            .append_pair("cmd", command)
            .extend_pairs(params);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, VideoCaptureError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body)
            .map_err(|error| VideoCaptureError::decode(format!("invalid device JSON: {error}")))
    }

    async fn acquire_session(&self) -> Result<Option<String>, VideoCaptureError> {
        let url = self.command_url("API_SessionReq", &[])?;
        match self.get_json(url).await {
            Ok(raw) => Ok(session_token(&raw)),
            Err(VideoCaptureError::Decode { message }) => {
                debug!(
                    error = %message,
                    "session response not decodable; continuing without session"
                );
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    async fn enable_super_download(&self, session: Option<&str>) {
        let result = async {
            let mut params = vec![("enable", "1")];
            params.extend(session_param(session));
            let url = self.command_url("API_SuperDownloadReq", &params)?;
            self.client
                .get(url)
                .send()
                .await
                .map_err(map_transport_error)?;
            Ok::<(), VideoCaptureError>(())
        }
        .await;
        if let Err(error) = result {
            debug!(error = %error, "super download toggle failed; continuing");
        }
    }

    async fn playback_list(
        &self,
        session: Option<&str>,
    ) -> Result<Vec<serde_json::Map<String, Value>>, VideoCaptureError> {
        let params: Vec<_> = session_param(session).into_iter().collect();
        let url = self.command_url("API_PlaybackListReq", &params)?;
        let raw = self.get_json(url).await?;
        Ok(playback_items(raw))
    }

    fn download_url(&self, file: &str, session: Option<&str>) -> Result<Url, VideoCaptureError> {
        let mut params = vec![("file", file)];
        params.extend(session_param(session));
        self.command_url("API_FileDownloadReq", &params)
    }

    /// Run the protocol without any mock fallback.
    async fn capture_from_device(&self) -> Result<String, VideoCaptureError> {
        let session = self.acquire_session().await?;
        self.enable_super_download(session.as_deref()).await;

        let items = self.playback_list(session.as_deref()).await?;
        let latest = items
            .last()
            .ok_or_else(|| VideoCaptureError::no_clip_available("playback list is empty"))?;
        let file = clip_name(latest).ok_or_else(|| {
            VideoCaptureError::no_clip_available("latest playback item has no name")
        })?;

        Ok(self.download_url(file, session.as_deref())?.into())
    }
}

fn session_param(session: Option<&str>) -> Option<(&'static str, &str)> {
    session.map(|token| ("session", token))
}

/// Synthetic clip URL, deterministic for a device and duration.
fn mock_url(request: &VideoCaptureRequest) -> String {
    format!(
        "{MOCK_SCHEME}://device/{}/clip?duration={}",
        request.device_id, request.duration
    )
}

fn effective_timeout(timeout_seconds: i64) -> Duration {
    let seconds = u64::try_from(timeout_seconds)
        .ok()
        .filter(|seconds| *seconds > 0)
        .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECONDS);
    Duration::from_secs(seconds)
}

fn map_transport_error(error: reqwest::Error) -> VideoCaptureError {
    if error.is_timeout() {
        VideoCaptureError::timeout(error.to_string())
    } else {
        VideoCaptureError::transport(error.to_string())
    }
}

#[async_trait]
impl VideoCaptureSource for DeviceVideoClient {
    async fn capture_recent_video(
        &self,
        request: &VideoCaptureRequest,
    ) -> Result<String, VideoCaptureError> {
        match self.capture_from_device().await {
            Ok(url) => Ok(url),
            Err(error) if self.mock_mode => {
                info!(
                    device_id = %request.device_id,
                    error = %error,
                    "device capture failed; returning mock clip URL"
                );
                Ok(mock_url(request))
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Non-network coverage for URL construction and timeout handling.

    use super::*;
    use crate::domain::ClipDuration;
    use rstest::rstest;

    fn client(base: &str) -> DeviceVideoClient {
        DeviceVideoClient::new(Url::parse(base).expect("valid base"), 5, false)
            .expect("client builds")
    }

    #[rstest]
    #[case(0, 5)]
    #[case(-3, 5)]
    #[case(1, 1)]
    #[case(30, 30)]
    fn non_positive_timeouts_fall_back_to_default(#[case] configured: i64, #[case] expected: u64) {
        assert_eq!(effective_timeout(configured), Duration::from_secs(expected));
    }

    #[rstest]
    #[case("http://193.168.0.1")]
    #[case("http://193.168.0.1/")]
    fn command_url_targets_cgi_endpoint(#[case] base: &str) {
        let url = client(base)
            .command_url("API_SessionReq", &[])
            .expect("url builds");
        assert_eq!(url.as_str(), "http://193.168.0.1/cmd.cgi?cmd=API_SessionReq");
    }

    #[rstest]
    fn download_url_carries_file_and_session() {
        let url = client("http://193.168.0.1")
            .download_url("20260504091500_0020.mp4", Some("s3ss10n"))
            .expect("url builds");
        assert_eq!(
            url.as_str(),
            "http://193.168.0.1/cmd.cgi?cmd=API_FileDownloadReq&file=20260504091500_0020.mp4&session=s3ss10n"
        );
    }

    #[rstest]
    fn download_url_omits_missing_session_and_encodes_names() {
        let url = client("http://193.168.0.1")
            .download_url("clip 1&2.mp4", None)
            .expect("url builds");
        assert_eq!(
            url.as_str(),
            "http://193.168.0.1/cmd.cgi?cmd=API_FileDownloadReq&file=clip+1%262.mp4"
        );
    }

    #[rstest]
    fn mock_url_encodes_device_and_duration() {
        let request = VideoCaptureRequest {
            device_id: "dashcam-7".to_owned(),
            duration: ClipDuration::from_requested(0),
        };
        assert_eq!(mock_url(&request), "ddpai://device/dashcam-7/clip?duration=20");
    }
}
