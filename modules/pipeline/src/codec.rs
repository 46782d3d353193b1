//! JSON wire codec shared by every pipeline, plus the centralized default
//! values substituted during ingress parsing.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A wire payload could not be decoded into the expected typed record.
#[derive(Debug, thiserror::Error)]
#[error("decode failed: {0}")]
pub struct DecodeError(String);

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

/// A typed record could not be rendered as a wire payload.
#[derive(Debug, thiserror::Error)]
#[error("encode failed: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Encode a typed record as a UTF-8 JSON payload.
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(record)?)
}

/// Decode a UTF-8 JSON payload into a typed record.
///
/// Fails when the bytes are not valid JSON for the schema or a required
/// field is absent.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Current wall-clock time in epoch milliseconds.
///
/// The default substituted for a missing timestamp at ingress, and the value
/// stamped on transformed records.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A freshly generated routing key, substituted when the caller supplied none.
pub fn generated_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        name: String,
        count: i64,
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let record = Probe {
            name: "probe".to_string(),
            count: 7,
        };

        let bytes = encode(&record).unwrap();
        let decoded: Probe = decode(&bytes).unwrap();

        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let result: Result<Probe, DecodeError> = decode(b"{not valid json");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_missing_required_field() {
        let result: Result<Probe, DecodeError> = decode(br#"{"name":"probe"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_keys_are_unique() {
        assert_ne!(generated_key(), generated_key());
    }
}
