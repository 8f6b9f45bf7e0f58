use llm_service::error_handler::LlmError;
use thiserror::Error;

/// Errors produced while handling one review run.
///
/// Everything here is scoped to a single request; nothing in this enum is
/// fatal to the process.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The outbound LLM call failed (unreachable, non-2xx, undecodable).
    #[error("LLM backend call failed: {0}")]
    Llm(#[from] LlmError),

    /// The model answered, but not with the expected review JSON.
    #[error("model reply was not valid review JSON: {0}")]
    MalformedReply(String),

    /// The run envelope carried no messages to review.
    #[error("run envelope contains no input messages")]
    EmptyRun,

    /// The first message's content did not decode into a review request.
    #[error("invalid review request payload: {0}")]
    InvalidPayload(String),
}
