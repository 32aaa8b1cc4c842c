//! Field deserializers that never reject editor input.
//!
//! The editor stores whatever the user typed, so a price may arrive as a
//! number, a height as a string, and a list as `null`. Each helper maps the
//! shapes it understands and treats everything else as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Scalar text: strings pass through, numbers and booleans are stringified.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Numbers, or strings that parse as numbers (`"0.5"`, `" 40 "`, `"40px"`).
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(&s),
        _ => None,
    })
}

/// Arrays decode item by item; items of the wrong shape are skipped and any
/// non-array value yields an empty list.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::debug!(found = %kind(&other), "expected a list, treating as empty");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed list item");
                None
            }
        })
        .collect())
}

/// Objects decode as `T`; any other shape, or an object `T` rejects, is absent.
pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)
            .map_err(|err| tracing::debug!(error = %err, "ignoring malformed record"))
            .ok()),
        _ => Ok(None),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
