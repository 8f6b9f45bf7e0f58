//! Provider-agnostic chat seam.
//!
//! The review logic only ever needs "send one prompt, get one reply", so the
//! provider clients are hidden behind the [`ChatModel`] trait. Construct the
//! concrete client once at startup via [`build_chat_model`], wrap it in an
//! `Arc`, and pass clones to dependents.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::LlmError,
    services::{azure_open_ai_service::AzureOpenAiService, open_ai_service::OpenAiService},
};

/// A backend capable of a single non-streaming chat completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generates one completion for `prompt`, optionally preceded by a
    /// system message.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    /// The model (or deployment) identifier, for reporting.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl ChatModel for OpenAiService {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        OpenAiService::generate(self, prompt, system).await
    }

    fn model_name(&self) -> &str {
        self.model()
    }
}

#[async_trait]
impl ChatModel for AzureOpenAiService {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        AzureOpenAiService::generate(self, prompt, system).await
    }

    fn model_name(&self) -> &str {
        self.model()
    }
}

/// Builds the concrete client for the selected backend.
///
/// # Errors
/// Propagates the constructor validation of the underlying service.
pub fn build_chat_model(cfg: LlmModelConfig) -> Result<Arc<dyn ChatModel>, LlmError> {
    match cfg.provider {
        LlmProvider::OpenAI => Ok(Arc::new(OpenAiService::new(cfg)?)),
        LlmProvider::AzureOpenAI => Ok(Arc::new(AzureOpenAiService::new(cfg)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config::{BackendEnv, select_backend};

    #[test]
    fn build_follows_selected_backend() {
        let env = BackendEnv {
            azure_api_key: Some("azure-key".into()),
            azure_endpoint: Some("https://example.openai.azure.com".into()),
            azure_deployment: Some("review-gpt4o".into()),
            ..BackendEnv::default()
        };
        let cfg = select_backend(&env).unwrap();
        let model = build_chat_model(cfg).unwrap();
        assert_eq!(model.model_name(), "review-gpt4o");
    }
}
