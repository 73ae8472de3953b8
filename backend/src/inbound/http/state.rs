//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ReportCommand, ReportQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub reports: Arc<dyn ReportCommand>,
    pub reports_query: Arc<dyn ReportQuery>,
}

impl HttpState {
    /// Bundle the report ports.
    #[must_use]
    pub fn new(reports: Arc<dyn ReportCommand>, reports_query: Arc<dyn ReportQuery>) -> Self {
        Self {
            reports,
            reports_query,
        }
    }
}
