//! Field decoders that degrade instead of failing the whole row.
//!
//! Optional columns are read as a raw `serde_json::Value` first. A value of
//! the wrong shape is logged and dropped, so one odd row cannot fail the
//! list it arrived in.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an optional field, mapping unknown or malformed values to `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::warn!("Ignoring malformed field value {}: {}", value, e);
            Ok(None)
        },
    }
}

/// Decode an optional list, keeping only the entries that decode.
///
/// Anything other than an array yields `None`.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        other => {
            tracing::warn!("Expected a list, ignoring {}", other);
            return Ok(None);
        },
    };
    let total = items.len();
    let kept: Vec<T> =
        items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect();
    if kept.len() < total {
        tracing::warn!("Dropped {} malformed list entries", total - kept.len());
    }
    Ok(Some(kept))
}
