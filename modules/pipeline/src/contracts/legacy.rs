//! LegacyEvent and its schema-conversion output NewFormatEvent.
//!
//! LegacyEvent serializes snake_case as-is; NewFormatEvent is camelCase on
//! the wire (`newFieldName`, `convertedAt`), preserved from the existing
//! contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{now_millis, DecodeError};

use super::string_field;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacyEvent {
    pub old_field_name: String,
    pub value: String,
}

impl LegacyEvent {
    /// Build a LegacyEvent from a loose ingress body; missing fields default
    /// to empty strings.
    pub fn parse_with_defaults(body: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            old_field_name: string_field(body, "old_field_name", String::new),
            value: string_field(body, "value", String::new),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFormatEvent {
    #[serde(rename = "newFieldName")]
    pub new_field_name: String,
    pub data: String,
    /// Epoch milliseconds; defaults to the current time when absent on the
    /// wire.
    #[serde(rename = "convertedAt", default = "now_millis")]
    pub converted_at: i64,
}
