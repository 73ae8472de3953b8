//! Incident report aggregate and its identifiers.
//!
//! A [`Report`] is assembled once by the report service and afterwards only
//! its [`ReportStatus`] may change. Everything else is fixed at creation.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SubsecRound, Utc};

/// Placeholder stored when reverse geocoding fails.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Clip length used when the caller asks for zero or a negative duration.
pub const DEFAULT_CLIP_SECONDS: u32 = 20;

const REPORT_ID_PREFIX: &str = "rep_";

/// Opaque, process-unique report identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportId(String);

/// Validation errors returned when constructing a [`ReportId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("report id must not be empty")]
    Empty,
    /// Identifier carries leading or trailing whitespace.
    #[error("report id must not contain surrounding whitespace")]
    ContainsWhitespace,
}

impl ReportId {
    /// Wrap a caller-supplied identifier after validating it.
    ///
    /// # Examples
    /// ```
    /// use snapreport_backend::domain::ReportId;
    ///
    /// let id = ReportId::new("rep_abc123").expect("valid id");
    /// assert_eq!(id.as_str(), "rep_abc123");
    /// assert!(ReportId::new("  ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, ReportIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ReportIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(ReportIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ReportId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Issues `rep_<base36 nanos>` identifiers.
///
/// Identifiers are strictly increasing for one generator, so two reports
/// prepared within the same clock tick still receive distinct ids.
#[derive(Debug, Default)]
pub struct ReportIdGenerator {
    last_nanos: AtomicI64,
}

impl ReportIdGenerator {
    /// Create a generator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next identifier for a report created at `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use snapreport_backend::domain::ReportIdGenerator;
    ///
    /// let generator = ReportIdGenerator::new();
    /// let now = Utc.timestamp_opt(0, 36).single().expect("valid time");
    /// assert_eq!(generator.next_id(now).as_str(), "rep_10");
    /// assert_eq!(generator.next_id(now).as_str(), "rep_11");
    /// ```
    #[must_use]
    pub fn next_id(&self, now: DateTime<Utc>) -> ReportId {
        let observed = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
        let previous = self
            .last_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(observed.max(last.saturating_add(1)))
            })
            .unwrap_or(observed);
        let issued = observed.max(previous.saturating_add(1));
        ReportId(format!("{REPORT_ID_PREFIX}{}", to_base36(issued)))
    }
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut remaining = value.unsigned_abs();
    let mut out = Vec::new();
    loop {
        let digit = usize::try_from(remaining % 36).unwrap_or_default();
        out.push(char::from(DIGITS.get(digit).copied().unwrap_or(b'0')));
        remaining /= 36;
        if remaining == 0 {
            break;
        }
    }
    if value < 0 {
        out.push('-');
    }
    out.iter().rev().collect()
}

/// Lifecycle state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    /// Assembled and stored, not yet handed over.
    Prepared,
    /// Handed over by the caller. Re-submission keeps this state.
    Submitted,
}

impl ReportStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prepared => "prepared",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested clip length in seconds, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipDuration(u32);

impl ClipDuration {
    /// Normalise a caller-supplied duration, substituting
    /// [`DEFAULT_CLIP_SECONDS`] for zero or negative values.
    ///
    /// # Examples
    /// ```
    /// use snapreport_backend::domain::ClipDuration;
    ///
    /// assert_eq!(ClipDuration::from_requested(0).seconds(), 20);
    /// assert_eq!(ClipDuration::from_requested(-3).seconds(), 20);
    /// assert_eq!(ClipDuration::from_requested(45).seconds(), 45);
    /// ```
    #[must_use]
    pub fn from_requested(seconds: i64) -> Self {
        if seconds <= 0 {
            return Self::default();
        }
        Self(u32::try_from(seconds).unwrap_or(u32::MAX))
    }

    /// Duration in whole seconds.
    #[must_use]
    pub fn seconds(self) -> u32 {
        self.0
    }
}

impl Default for ClipDuration {
    fn default() -> Self {
        Self(DEFAULT_CLIP_SECONDS)
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input required to build a [`Report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub id: ReportId,
    pub created_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub road_name: String,
    pub is_highway: bool,
    pub video_url: String,
    pub device_id: String,
    pub tags: Vec<String>,
}

/// A stored incident report.
///
/// ## Invariants
/// - `timestamp` is UTC with whole-second precision.
/// - Only `status` changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    id: ReportId,
    timestamp: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    city: String,
    road_name: String,
    is_highway: bool,
    video_url: String,
    status: ReportStatus,
    device_id: String,
    tags: Vec<String>,
}

impl Report {
    /// Build a freshly prepared report.
    #[must_use]
    pub fn prepared(draft: ReportDraft) -> Self {
        let ReportDraft {
            id,
            created_at,
            latitude,
            longitude,
            city,
            road_name,
            is_highway,
            video_url,
            device_id,
            tags,
        } = draft;
        Self {
            id,
            timestamp: created_at.trunc_subsecs(0),
            latitude,
            longitude,
            city,
            road_name,
            is_highway,
            video_url,
            status: ReportStatus::Prepared,
            device_id,
            tags,
        }
    }

    /// Transition to [`ReportStatus::Submitted`]. Calling this again is a no-op.
    pub fn mark_submitted(&mut self) {
        self.status = ReportStatus::Submitted;
    }

    /// Returns the report id.
    #[must_use]
    pub fn id(&self) -> &ReportId {
        &self.id
    }

    /// Returns the creation time, truncated to whole seconds.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the incident latitude.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the incident longitude.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the resolved city, or [`UNKNOWN_LOCATION`].
    #[must_use]
    pub fn city(&self) -> &str {
        self.city.as_str()
    }

    /// Returns the resolved road name, or [`UNKNOWN_LOCATION`].
    #[must_use]
    pub fn road_name(&self) -> &str {
        self.road_name.as_str()
    }

    /// Returns whether the road was classified as a highway.
    #[must_use]
    pub fn is_highway(&self) -> bool {
        self.is_highway
    }

    /// Returns the captured clip URL.
    #[must_use]
    pub fn video_url(&self) -> &str {
        self.video_url.as_str()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    /// Returns the capturing device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        self.device_id.as_str()
    }

    /// Returns the caller-supplied tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }
}
