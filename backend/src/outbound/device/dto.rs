//! Shape normalisation for device protocol responses.
//!
//! Firmware revisions disagree on field names and envelope shapes, so the
//! responses are inspected as raw JSON rather than decoded into fixed
//! structs.

use serde_json::{Map, Value};

/// Extract a session token, preferring `session` over `sid`.
///
/// The first string-valued field wins even when empty; an empty token means
/// the device runs without sessions.
pub(super) fn session_token(raw: &Value) -> Option<String> {
    ["session", "sid"]
        .into_iter()
        .find_map(|field| raw.get(field).and_then(Value::as_str))
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Normalise a playback listing into its object-shaped items.
///
/// Accepts a bare array or an object carrying a `list` array. Non-object
/// elements are dropped and any other shape yields an empty list.
pub(super) fn playback_items(raw: Value) -> Vec<Map<String, Value>> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("list") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(fields),
            _ => None,
        })
        .collect()
}

/// Resolve a clip's file name from `name`, else `file`.
pub(super) fn clip_name(item: &Map<String, Value>) -> Option<&str> {
    ["name", "file"]
        .into_iter()
        .filter_map(|field| item.get(field).and_then(Value::as_str))
        .find(|name| !name.is_empty())
}
