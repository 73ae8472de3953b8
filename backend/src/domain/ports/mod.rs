//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (geocoder, capture device, report store) expose strongly
//! typed errors so adapters map their failures into predictable variants.
//! Driving ports (report command and query) return the domain [`Error`].
//!
//! [`Error`]: crate::domain::Error

mod report_command;
mod report_query;
mod report_repository;
mod reverse_geocoder;
mod video_capture_source;

#[cfg(test)]
pub use report_command::MockReportCommand;
pub use report_command::{PrepareReportRequest, PreparedReport, ReportCommand, SendReportRequest};
#[cfg(test)]
pub use report_query::MockReportQuery;
pub use report_query::ReportQuery;
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::ReportRepository;
#[cfg(test)]
pub use reverse_geocoder::MockReverseGeocoder;
pub use reverse_geocoder::{FixtureReverseGeocoder, GeocodeResult, GeocoderError, ReverseGeocoder};
#[cfg(test)]
pub use video_capture_source::MockVideoCaptureSource;
pub use video_capture_source::{
    FixtureVideoCaptureSource, VideoCaptureError, VideoCaptureRequest, VideoCaptureSource,
};
