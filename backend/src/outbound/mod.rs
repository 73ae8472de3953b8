//! Outbound adapters implementing the driven ports.
//!
//! - **geocoding**: reqwest clients for Nominatim and AMap
//! - **device**: reqwest client for the dashcam CGI protocol
//! - **persistence**: in-memory report store
//!
//! Adapters translate between wire formats and domain types and contain no
//! business logic.

pub mod device;
pub mod geocoding;
pub mod persistence;
