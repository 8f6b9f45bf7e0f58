use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::ReviewError, request::ReviewRequest};

/// One conversation message inside a run envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user/assistant).
    pub role: String,
    /// Message content; for review runs this is a JSON-encoded [`ReviewRequest`].
    pub content: String,
}

/// Structured input for the agent: a list of messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInput {
    pub messages: Vec<Message>,
}

/// Stateless run envelope shared by both transports.
///
/// The REST endpoint receives this as the request body; the gateway serve
/// loop receives the identical shape as one JSON frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCreateStateless {
    /// The agent ID to run; the service default is used when absent.
    #[serde(default)]
    pub agent_id: Option<String>,
    pub input: RunInput,
    /// Model requested by the caller (e.g., "gpt-4o").
    #[serde(default)]
    pub model: Option<String>,
    /// Metadata to assign to the run; `metadata.id` is echoed back.
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, Value>>,
    /// Logical route, kept for gateway payload parity with the REST API.
    #[serde(default)]
    pub route: Option<String>,
}

impl RunCreateStateless {
    /// Decodes the [`ReviewRequest`] carried in the first input message.
    ///
    /// # Errors
    /// - [`ReviewError::EmptyRun`] when `input.messages` is empty
    /// - [`ReviewError::InvalidPayload`] when the content is not a valid
    ///   review request
    pub fn review_request(&self) -> Result<ReviewRequest, ReviewError> {
        let first = self.input.messages.first().ok_or(ReviewError::EmptyRun)?;
        serde_json::from_str(&first.content)
            .map_err(|e| ReviewError::InvalidPayload(e.to_string()))
    }

    /// The request id from `metadata.id`, or the documented default.
    pub fn message_id(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("id"))
            .and_then(Value::as_str)
            .unwrap_or("default-id")
            .to_string()
    }
}
