//! Content transformation pipeline: `input` → `transformed`.
//!
//! Prefixes the SimpleEvent payload and restamps the timestamp. Fail-open
//! policy: a record that cannot be decoded or re-encoded passes through
//! unmodified rather than being dropped, so the pipeline never stalls on a
//! bad record.

use crate::codec::{self, now_millis};
use crate::contracts::SimpleEvent;
use crate::error::{fail_open, PipelineError};

use super::Emission;

const PIPELINE: &str = "content-transformation";
pub const PAYLOAD_PREFIX: &str = "TRANSFORMED: ";

/// Pure transform: prefix the payload, stamp the current time.
///
/// Not idempotent; each pass adds one more prefix.
pub fn transform(event: &SimpleEvent) -> SimpleEvent {
    SimpleEvent {
        id: event.id.clone(),
        payload: format!("{}{}", PAYLOAD_PREFIX, event.payload),
        timestamp: now_millis(),
    }
}

/// Map one input payload to its emissions on the output channel.
pub fn emissions(output_channel: &str, payload: &[u8]) -> Vec<Emission> {
    match transform_payload(payload) {
        Ok(bytes) => vec![Emission::new(output_channel, bytes)],
        Err(e) => fail_open(
            PIPELINE,
            &e,
            vec![Emission::new(output_channel, payload.to_vec())],
        ),
    }
}

fn transform_payload(payload: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let event: SimpleEvent = codec::decode(payload)?;
    Ok(codec::encode(&transform(&event))?)
}
