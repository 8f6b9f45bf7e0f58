use std::sync::Arc;

use llm_service::chat_model::ChatModel;
use tracing::{debug, info, instrument};

use crate::{
    comments::ReviewComments,
    errors::ReviewError,
    prompt::{SYSTEM_PROMPT, build_review_prompt},
    request::ReviewRequest,
    response::ReviewResponse,
    run::RunCreateStateless,
};

const DEFAULT_AGENT_ID: &str = "default-agent";

/// Stateless review service, shared by the REST handler and the gateway
/// serve loop.
///
/// Construct once at startup, wrap in `Arc`, pass clones to both transports.
/// Each call performs exactly one outbound LLM request; failures surface to
/// the caller and are never retried here.
pub struct CodeReviewer {
    model: Arc<dyn ChatModel>,
}

impl CodeReviewer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// The backing model identifier, used when the run does not name one.
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Full run handling: decode the envelope, review, shape the response.
    ///
    /// This is the single entry point both transports call.
    #[instrument(name = "handle_run", skip(self, run), fields(agent_id = run.agent_id.as_deref().unwrap_or(DEFAULT_AGENT_ID)))]
    pub async fn handle_run(&self, run: &RunCreateStateless) -> Result<ReviewResponse, ReviewError> {
        let message_id = run.message_id();
        debug!(%message_id, "decoding review request from run envelope");

        let request = run.review_request()?;
        let comments = self.review(&request).await?;
        let filtered = comments.into_filtered();

        info!(
            message_id = %message_id,
            findings = filtered.len(),
            "review completed"
        );

        ReviewResponse::from_comments(
            run.agent_id
                .clone()
                .unwrap_or_else(|| DEFAULT_AGENT_ID.to_string()),
            run.model
                .clone()
                .unwrap_or_else(|| self.model_name().to_string()),
            message_id,
            &filtered,
        )
    }

    /// Runs one review: prompt construction, one LLM call, reply parsing.
    pub async fn review(&self, request: &ReviewRequest) -> Result<ReviewComments, ReviewError> {
        let prompt = build_review_prompt(request);
        debug!(
            context_files = request.context_files.len(),
            changes = request.changes.len(),
            has_analyzer_output = request.static_analyzer_output.is_some(),
            prompt_len = prompt.len(),
            "sending review prompt"
        );

        let reply = self.model.generate(&prompt, Some(SYSTEM_PROMPT)).await?;
        ReviewComments::parse(&reply)
    }
}
