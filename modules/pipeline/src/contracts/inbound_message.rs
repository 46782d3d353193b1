//! InboundMessageEvent: the nested inbound chat envelope, and the two
//! records derived from it by the fan-out pipeline.
//!
//! All of these schemas are snake_case on the wire; the two `type` fields
//! carry serde renames because `type` is reserved.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{now_millis, DecodeError};

use super::{int_field, millis_field, string_field};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundMessageEvent {
    pub app: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub version: i32,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: MessagePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePayload {
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: MessageContent,
    pub sender: Sender,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageContent {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sender {
    pub phone: String,
    pub name: String,
    pub country_code: String,
    pub dial_code: String,
}

/// Derived 1:1 from an InboundMessageEvent by the fan-out pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateChatEvent {
    pub chat_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub country_code: String,
    pub dial_code: String,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Derived 1:1 from an InboundMessageEvent by the fan-out pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMessageEvent {
    pub message_id: String,
    pub sender_phone: String,
    pub chat_id: String,
    pub message_type: String,
    pub content: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl InboundMessageEvent {
    /// Build an InboundMessageEvent from a loose ingress body.
    ///
    /// The `payload` object is required; everything else defaults:
    /// `app` → "TestApp", `timestamp` → now, `version` → 2,
    /// `type` → "message", `payload.type` → "text", and every other leaf
    /// field → empty string. Absent `sender`/`content` objects yield
    /// empty-string leaves.
    pub fn parse_with_defaults(body: &Value) -> Result<Self, DecodeError> {
        let payload = body
            .get("payload")
            .filter(|v| !v.is_null())
            .ok_or_else(|| DecodeError::new("payload object is required"))?;

        let empty = Value::Object(serde_json::Map::new());
        let content = payload.get("content").unwrap_or(&empty);
        let sender = payload.get("sender").unwrap_or(&empty);

        Ok(Self {
            app: string_field(body, "app", || "TestApp".to_string()),
            timestamp: millis_field(body, "timestamp")?,
            version: int_field(body, "version", 2)?,
            event_type: string_field(body, "type", || "message".to_string()),
            payload: MessagePayload {
                id: string_field(payload, "id", String::new),
                source: string_field(payload, "source", String::new),
                message_type: string_field(payload, "type", || "text".to_string()),
                content: MessageContent {
                    text: string_field(content, "text", String::new),
                },
                sender: Sender {
                    phone: string_field(sender, "phone", String::new),
                    name: string_field(sender, "name", String::new),
                    country_code: string_field(sender, "country_code", String::new),
                    dial_code: string_field(sender, "dial_code", String::new),
                },
            },
        })
    }
}
