//! Cache Entry Module
//!
//! Defines a cached response and its single-line on-disk encoding:
//! `{unix_seconds} -//- {json}`.

use std::time::Duration;

use serde_json::Value;

use crate::error::{Result, StatsError};

/// Field separator token between timestamp and payload.
pub const SEPARATOR: &str = "-//-";

/// Separator as it appears in a line, padded with single spaces.
const FIELD_SEPARATOR: &str = " -//- ";

// == Cache Entry ==
/// A cached API response with the moment it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Write time (Unix seconds, fractional)
    pub timestamp: f64,
    /// The response body as returned by the API
    pub payload: Value,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(timestamp: f64, payload: Value) -> Self {
        Self { timestamp, payload }
    }

    // == Encode ==
    /// Renders the entry as one store line, without terminator.
    pub fn encode(&self) -> Result<String> {
        Ok(format!(
            "{} {} {}",
            self.timestamp,
            SEPARATOR,
            payload_text(&self.payload)?
        ))
    }

    // == Decode ==
    /// Parses one store line.
    ///
    /// The line is split at the first padded separator. A numeric timestamp
    /// can never contain the token, so payloads that do contain it still
    /// decode intact.
    pub fn decode(line: &str) -> Result<Self> {
        let (left, right) = line
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| StatsError::Decode(format!("missing separator in {:?}", line)))?;

        let timestamp: f64 = left
            .trim()
            .parse()
            .map_err(|_| StatsError::Decode(format!("invalid timestamp {:?}", left)))?;
        if !timestamp.is_finite() {
            return Err(StatsError::Decode(format!("invalid timestamp {:?}", left)));
        }

        let payload = serde_json::from_str(right)
            .map_err(|e| StatsError::Decode(format!("invalid payload: {}", e)))?;

        Ok(Self { timestamp, payload })
    }

    // == Freshness ==
    /// True while less than `window` has passed since the write.
    ///
    /// Boundary condition: an entry exactly `window` old is stale.
    pub fn is_fresh(&self, now: f64, window: Duration) -> bool {
        now - self.timestamp < window.as_secs_f64()
    }

    /// The payload's `name` field, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.payload.get("name").and_then(Value::as_str)
    }
}

// == Utility Functions ==
/// Compact JSON text of a payload, as written to the store.
pub fn payload_text(payload: &Value) -> Result<String> {
    serde_json::to_string(payload).map_err(|e| StatsError::Internal(e.to_string()))
}

/// Null, `{}`, `[]` and `""` carry nothing worth caching.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_line_format() {
        let entry = CacheEntry::new(1700000000.25, json!({"name": "Alice", "level": 3}));

        let line = entry.encode().unwrap();
        assert_eq!(line, r#"1700000000.25 -//- {"level":3,"name":"Alice"}"#);
    }

    #[test]
    fn test_decode_legacy_line() {
        let line = r#"1699999999.123456 -//- {"name": "Bob", "kills": 10}"#;

        let entry = CacheEntry::decode(line).unwrap();
        assert_eq!(entry.timestamp, 1699999999.123456);
        assert_eq!(entry.payload, json!({"name": "Bob", "kills": 10}));
        assert_eq!(entry.name(), Some("Bob"));
    }

    #[test]
    fn test_decode_payload_containing_separator() {
        let entry = CacheEntry::new(10.5, json!({"motd": "a -//- b", "name": "x"}));

        let decoded = CacheEntry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_decode_missing_separator() {
        let result = CacheEntry::decode("1700000000 {}");
        assert!(matches!(result, Err(StatsError::Decode(_))));
    }

    #[test]
    fn test_decode_non_numeric_timestamp() {
        let result = CacheEntry::decode(r#"yesterday -//- {"name":"x"}"#);
        assert!(matches!(result, Err(StatsError::Decode(_))));

        let result = CacheEntry::decode(r#"NaN -//- {"name":"x"}"#);
        assert!(matches!(result, Err(StatsError::Decode(_))));
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = CacheEntry::decode("1700000000 -//- {not json");
        assert!(matches!(result, Err(StatsError::Decode(_))));
    }

    #[test]
    fn test_freshness_boundary() {
        let window = Duration::from_secs(60);
        let entry = CacheEntry::new(1000.0, json!({"a": 1}));

        assert!(entry.is_fresh(1000.0, window));
        assert!(entry.is_fresh(1059.999, window));
        assert!(!entry.is_fresh(1060.0, window), "Entry should be stale at boundary");
        assert!(!entry.is_fresh(2000.0, window));
    }

    #[test]
    fn test_name_requires_string() {
        let entry = CacheEntry::new(0.0, json!({"name": 42}));
        assert_eq!(entry.name(), None);

        let entry = CacheEntry::new(0.0, json!([1, 2]));
        assert_eq!(entry.name(), None);
    }

    #[test]
    fn test_empty_payloads() {
        assert!(is_empty_payload(&Value::Null));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!([])));
        assert!(is_empty_payload(&json!("")));
        assert!(!is_empty_payload(&json!({"name": "x"})));
        assert!(!is_empty_payload(&json!(0)));
    }
}
