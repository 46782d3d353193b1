//! GenericAction: the record subject to content-based routing.
//!
//! camelCase on the wire (`actionType`), preserved from the existing
//! contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::DecodeError;

use super::string_field;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenericAction {
    #[serde(rename = "actionType")]
    pub action_type: String,
    pub details: String,
}

impl GenericAction {
    /// Build a GenericAction from a loose ingress body; missing fields
    /// default to empty strings (an empty action type routes nowhere).
    pub fn parse_with_defaults(body: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            action_type: string_field(body, "actionType", String::new),
            details: string_field(body, "details", String::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_uses_camel_case_action_type() {
        let json = r#"{"actionType":"A","details":"d"}"#;

        let action: GenericAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.action_type, "A");
        assert_eq!(action.details, "d");

        let back = serde_json::to_string(&action).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_decode_rejects_snake_case_field() {
        let json = r#"{"action_type":"A","details":"d"}"#;
        assert!(serde_json::from_str::<GenericAction>(json).is_err());
    }

    #[test]
    fn test_parse_with_defaults_empty_body() {
        let action = GenericAction::parse_with_defaults(&serde_json::json!({})).unwrap();

        assert_eq!(action.action_type, "");
        assert_eq!(action.details, "");
    }
}
