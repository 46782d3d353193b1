//! SimpleEvent: the record subject to content transformation.
//!
//! Wire convention is camelCase for this schema; every field name happens to
//! be a single word, so no serde renames are needed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{generated_key, DecodeError};

use super::{millis_field, string_field};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimpleEvent {
    pub id: String,
    pub payload: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl SimpleEvent {
    /// Build a SimpleEvent from a loose ingress body.
    ///
    /// Defaults: missing `id` → generated UUID, missing `payload` → empty
    /// string, missing `timestamp` → now. A present-but-non-numeric
    /// timestamp is a DecodeError, not a default.
    pub fn parse_with_defaults(body: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: string_field(body, "id", generated_key),
            payload: string_field(body, "payload", String::new),
            timestamp: millis_field(body, "timestamp")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip() {
        let json = r#"{"id":"x1","payload":"hello","timestamp":1000}"#;

        let event: SimpleEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "x1");
        assert_eq!(event.payload, "hello");
        assert_eq!(event.timestamp, 1000);

        let back = serde_json::to_string(&event).unwrap();
        let reparsed: SimpleEvent = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed, event);
    }

    #[test]
    fn test_decode_rejects_missing_payload() {
        let json = r#"{"id":"x1","timestamp":1000}"#;
        assert!(serde_json::from_str::<SimpleEvent>(json).is_err());
    }

    #[test]
    fn test_parse_with_defaults_fills_every_field() {
        let event = SimpleEvent::parse_with_defaults(&serde_json::json!({})).unwrap();

        assert!(!event.id.is_empty());
        assert_eq!(event.payload, "");
        assert!(event.timestamp > 0);
    }

    #[test]
    fn test_parse_with_defaults_keeps_supplied_values() {
        let body = serde_json::json!({"id": "x1", "payload": "hello", "timestamp": 1000});
        let event = SimpleEvent::parse_with_defaults(&body).unwrap();

        assert_eq!(event.id, "x1");
        assert_eq!(event.payload, "hello");
        assert_eq!(event.timestamp, 1000);
    }

    #[test]
    fn test_parse_rejects_non_numeric_timestamp() {
        let body = serde_json::json!({"timestamp": "not-a-number"});
        assert!(SimpleEvent::parse_with_defaults(&body).is_err());
    }
}
