//! SnapReport backend library.
//!
//! Prepares dashcam incident reports from a reverse-geocoded position, a
//! highway heuristic and a freshly captured clip, then tracks their
//! submission.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
