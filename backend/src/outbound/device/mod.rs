//! Dashcam device outbound adapter.
//!
//! Speaks the device's CGI command protocol over plain HTTP and resolves a
//! download URL for the most recent recorded clip.

mod dto;
mod http_client;

pub use http_client::{DEFAULT_DEVICE_TIMEOUT_SECONDS, DeviceVideoClient};
