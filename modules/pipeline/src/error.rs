//! Failure taxonomy for the processing core.
//!
//! A missing original event during correlation is deliberately NOT here: it
//! is recorded as a null back-reference, not raised as an error.

use crate::codec::{DecodeError, EncodeError};

/// Errors that can occur while a pipeline handles one record.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The wire payload was not valid JSON for the expected schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A transform step failed to produce an output record.
    #[error("transform failed: {0}")]
    Transform(String),
}

impl From<EncodeError> for PipelineError {
    fn from(e: EncodeError) -> Self {
        PipelineError::Transform(e.to_string())
    }
}

/// The single fail-open policy: log the failure, emit the pipeline's
/// well-defined substitute output.
///
/// Every pipeline routes its transform failures through here, so the policy
/// can be tightened later (bounded retry, dead-letter channel) without
/// touching pipeline logic.
pub fn fail_open<T>(pipeline: &str, error: &PipelineError, substitute: T) -> T {
    tracing::warn!(
        pipeline = %pipeline,
        error = %error,
        "record failed, emitting fail-open substitute"
    );
    substitute
}
