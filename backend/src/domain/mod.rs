//! Domain primitives, aggregates and services.
//!
//! Purpose: define the incident report aggregate, the pure highway
//! heuristics and the report service that composes the driven ports.
//! Nothing here knows about HTTP or reqwest.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - Report, ReportId, ReportStatus, ClipDuration: the report aggregate.
//! - classify_highway, infer_road_category: road heuristics.
//! - ReportService: implementation of the report driving ports.

pub mod error;
pub mod highway;
pub mod ports;
pub mod report;
pub mod report_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::highway::{classify_highway, infer_road_category};
pub use self::report::{
    ClipDuration, DEFAULT_CLIP_SECONDS, Report, ReportDraft, ReportId, ReportIdGenerator,
    ReportIdValidationError, ReportStatus, UNKNOWN_LOCATION,
};
pub use self::report_service::{ReportService, ReportServicePorts};
