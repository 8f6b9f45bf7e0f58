use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{comments::ReviewComment, errors::ReviewError};

/// Response returned over either transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    /// The agent that generated the response.
    pub agent_id: String,
    /// Review findings, wrapped as an assistant message whose content is a
    /// JSON-encoded array of comments.
    pub output: Value,
    /// Model used for the code review.
    pub model: String,
    /// Additional metadata related to the response (request id echo).
    pub metadata: Value,
}

impl ReviewResponse {
    /// Builds the response envelope around a filtered comment list.
    ///
    /// # Errors
    /// [`ReviewError::MalformedReply`] only if the comments fail to
    /// serialize, which would indicate a bug rather than bad input.
    pub fn from_comments(
        agent_id: String,
        model: String,
        message_id: String,
        comments: &[ReviewComment],
    ) -> Result<Self, ReviewError> {
        let content =
            serde_json::to_string(comments).map_err(|e| ReviewError::MalformedReply(e.to_string()))?;
        Ok(Self {
            agent_id,
            output: json!({
                "messages": [{"role": "assistant", "content": content}]
            }),
            model,
            metadata: json!({"id": message_id}),
        })
    }
}
