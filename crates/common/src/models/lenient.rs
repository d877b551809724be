//! Tolerant field deserializers
//!
//! Listings arrive from API clients and from the search index with loosely
//! typed fields. Any JSON value is accepted for a business field and
//! coerced to the field's type, or to its default when no sensible
//! coercion exists. Only a payload that is not a JSON object is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text(Value::deserialize(deserializer)?))
}

/// Arrays keep their non-null items; a scalar becomes a one-item list
pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    })
}

/// `true`, `"true"` (any case) and non-zero numbers are true
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// Unparsable ids become 0; the store assigns real ids on creation
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

pub fn opt_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Loose {
        #[serde(deserialize_with = "string")]
        name: String,
        #[serde(deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(deserialize_with = "flag")]
        enabled: bool,
        #[serde(deserialize_with = "id")]
        id: u64,
        #[serde(deserialize_with = "opt_i32")]
        year: Option<i32>,
        #[serde(deserialize_with = "opt_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn parse(value: Value) -> Loose {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalars_coerce_to_text() {
        assert_eq!(parse(json!({ "name": 42 })).name, "42");
        assert_eq!(parse(json!({ "name": null })).name, "");
        assert_eq!(parse(json!({ "tags": "rust" })).tags, vec!["rust"]);
        assert_eq!(parse(json!({ "tags": [1, null, "go"] })).tags, vec!["1", "go"]);
        assert!(parse(json!({ "tags": null })).tags.is_empty());
    }

    #[test]
    fn test_flags() {
        assert!(parse(json!({ "enabled": "TRUE" })).enabled);
        assert!(parse(json!({ "enabled": 1 })).enabled);
        assert!(!parse(json!({ "enabled": "no" })).enabled);
        assert!(!parse(json!({ "enabled": [] })).enabled);
    }

    #[test]
    fn test_numbers_and_dates() {
        assert_eq!(parse(json!({ "id": "tmp" })).id, 0);
        assert_eq!(parse(json!({ "id": "12" })).id, 12);
        assert_eq!(parse(json!({ "year": "2010" })).year, Some(2010));
        assert_eq!(parse(json!({ "year": 1e12 })).year, None);
        assert!(parse(json!({ "at": "2024-01-15T00:00:00Z" })).at.is_some());
        assert!(parse(json!({ "at": "yesterday" })).at.is_none());
    }
}
