//! Typed event contracts exchanged on the pipeline channels.
//!
//! Field names must match the wire format EXACTLY (case-sensitive); the
//! camelCase schemas carry serde renames, the snake_case schemas serialize
//! as-is. Each schema also provides `parse_with_defaults` for the loosely
//! typed ingress bodies, substituting the documented default for every
//! missing field.

pub mod action;
pub mod inbound_message;
pub mod legacy;
pub mod simple_event;

pub use action::GenericAction;
pub use inbound_message::{
    CreateChatEvent, CreateMessageEvent, InboundMessageEvent, MessageContent, MessagePayload,
    Sender,
};
pub use legacy::{LegacyEvent, NewFormatEvent};
pub use simple_event::SimpleEvent;

use serde_json::Value;

use crate::codec::{now_millis, DecodeError};

/// Read a string field from a loose body, coercing scalars to their string
/// rendering; absent or null yields the default.
pub(crate) fn string_field(body: &Value, key: &str, default: impl FnOnce() -> String) -> String {
    match body.get(key) {
        None | Some(Value::Null) => default(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Read an epoch-milliseconds field; absent or null yields the current time.
pub(crate) fn millis_field(body: &Value, key: &str) -> Result<i64, DecodeError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(now_millis()),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| DecodeError::new(format!("{} must be an integer timestamp", key))),
        Some(Value::String(s)) => s
            .parse::<i64>()
            .map_err(|_| DecodeError::new(format!("{} must be an integer timestamp", key))),
        Some(_) => Err(DecodeError::new(format!(
            "{} must be an integer timestamp",
            key
        ))),
    }
}

/// Read an integer field with an explicit default for absent or null.
pub(crate) fn int_field(body: &Value, key: &str, default: i32) -> Result<i32, DecodeError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|v| v as i32)
            .ok_or_else(|| DecodeError::new(format!("{} must be an integer", key))),
        Some(Value::String(s)) => s
            .parse::<i32>()
            .map_err(|_| DecodeError::new(format!("{} must be an integer", key))),
        Some(_) => Err(DecodeError::new(format!("{} must be an integer", key))),
    }
}
