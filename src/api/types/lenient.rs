//! Tolerant request-field deserializers
//!
//! The dashboard has always sent loosely-typed bodies; wrong-typed optional
//! fields fall back to safe defaults instead of rejecting the request. Each
//! helper is meant for `#[serde(default, deserialize_with = ...)]`, so a
//! missing field and a wrong-typed field both land on `None`.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Accept a JSON string; any other type becomes `None`.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::String(text) => Some(text),
        _ => None,
    }))
}

/// Accept an array made only of strings; anything else becomes `None`.
pub fn string_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => None,
    }))
}

/// Accept a JSON object; anything else becomes `None`.
pub fn object<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::Object(map) => Some(map),
        _ => None,
    }))
}

/// Accept a number or a numeric string. Other non-null types map to NaN so
/// the route-level range check rejects them with a specific message.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::Number(number) => Some(number.as_f64().unwrap_or(f64::NAN)),
        Value::String(text) => Some(text.trim().parse().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    }))
}
