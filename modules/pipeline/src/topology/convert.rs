//! Schema conversion pipeline: `legacy-events` → `json-converted`.
//!
//! Converts LegacyEvent to NewFormatEvent. Fail-open policy: a record that
//! cannot be converted yields the `ERROR_PROCESSING` sentinel rather than
//! being dropped.

use crate::codec::{self, now_millis};
use crate::contracts::{LegacyEvent, NewFormatEvent};
use crate::error::{fail_open, PipelineError};

use super::Emission;

const PIPELINE: &str = "schema-conversion";

/// Pure conversion: the legacy value becomes the new field, the data field
/// records the system of origin.
pub fn convert(event: &LegacyEvent) -> NewFormatEvent {
    NewFormatEvent {
        new_field_name: event.value.clone(),
        data: "legacy-system".to_string(),
        converted_at: now_millis(),
    }
}

/// The sentinel emitted when a record cannot be converted.
pub fn error_sentinel() -> NewFormatEvent {
    NewFormatEvent {
        new_field_name: "ERROR_PROCESSING".to_string(),
        data: "error-occurred".to_string(),
        converted_at: now_millis(),
    }
}

/// Map one input payload to its emissions on the output channel.
pub fn emissions(output_channel: &str, payload: &[u8]) -> Vec<Emission> {
    match convert_payload(payload) {
        Ok(bytes) => vec![Emission::new(output_channel, bytes)],
        Err(e) => {
            let sentinel =
                codec::encode(&error_sentinel()).unwrap_or_else(|_| b"{}".to_vec());
            fail_open(PIPELINE, &e, vec![Emission::new(output_channel, sentinel)])
        }
    }
}

fn convert_payload(payload: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let event: LegacyEvent = codec::decode(payload)?;
    Ok(codec::encode(&convert(&event))?)
}
