//! Shape-tolerant serde helpers for provider payloads.
//!
//! AMap encodes an empty string field as `[]` and an empty object as `[]`.
//! These helpers inspect the raw JSON value before assigning so one odd
//! field never fails the whole decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Normalise a string-or-array field.
///
/// A string is kept as-is, an array yields its first element when that is a
/// string, and anything else (empty array, null, number) becomes empty.
pub(super) fn string_or_first<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalise_string(raw))
}

fn normalise_string(raw: Value) -> String {
    match raw {
        Value::String(text) => text,
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::String(first)) => first,
            _ => String::new(),
        },
        _ => String::new(),
    }
}

/// Decode an object field, falling back to `T::default()` for any other shape.
pub(super) fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        object @ Value::Object(_) => T::deserialize(object).map_err(serde::de::Error::custom),
        _ => Ok(T::default()),
    }
}
