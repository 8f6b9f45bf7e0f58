//! Azure OpenAI service for review text generation.
//!
//! Same non-streaming contract as the generic OpenAI client, but routed
//! through an Azure deployment:
//! - POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}
//!
//! Azure authenticates with an `api-key` header instead of a bearer token,
//! and the request body carries no `model` field (the deployment decides).
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::AzureOpenAI`
//! - `cfg.api_key`, `cfg.deployment`, `cfg.api_version` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{HttpError, LlmError, Provider, ProviderError, ProviderErrorKind, make_snippet},
    services::open_ai_service::{ChatCompletionRequest, ChatCompletionResponse},
};

/// Thin client for Azure OpenAI deployments.
#[derive(Debug)]
pub struct AzureOpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl AzureOpenAiService {
    /// Creates a new [`AzureOpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Azure OpenAI
    /// - [`LlmError::Provider`] with `MissingApiKey` / `MissingDeployment` /
    ///   `MissingApiVersion` for absent Azure fields
    /// - [`LlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::AzureOpenAI {
            return Err(ProviderError::new(
                Provider::AzureOpenAI,
                ProviderErrorKind::InvalidProvider,
            )
            .into());
        }

        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(Provider::AzureOpenAI, ProviderErrorKind::MissingApiKey)
        })?;
        let deployment = cfg.deployment.clone().ok_or_else(|| {
            ProviderError::new(Provider::AzureOpenAI, ProviderErrorKind::MissingDeployment)
        })?;
        let api_version = cfg.api_version.clone().ok_or_else(|| {
            ProviderError::new(Provider::AzureOpenAI, ProviderErrorKind::MissingApiVersion)
        })?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::AzureOpenAI,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(
                    Provider::AzureOpenAI,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = chat_url(endpoint, &deployment, &api_version);

        info!(
            provider = ?cfg.provider,
            deployment = %deployment,
            endpoint = %cfg.endpoint,
            api_version = %api_version,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "AzureOpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// The configured model (deployment) identifier.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat completion request against the
    /// configured deployment.
    ///
    /// # Errors
    /// Same taxonomy as the generic OpenAI client: `HttpStatus`, `Decode`,
    /// `EmptyChoices`, or [`LlmError::HttpTransport`].
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system).without_model();

        debug!(
            deployment = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                deployment = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Azure OpenAI chat completion returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::AzureOpenAI,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    deployment = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode Azure chat completion response"
                );
                return Err(ProviderError::new(
                    Provider::AzureOpenAI,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `choices[0].message.content`"
                    )),
                )
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::new(Provider::AzureOpenAI, ProviderErrorKind::EmptyChoices)
            })?;

        info!(
            deployment = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(content)
    }
}

fn chat_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::AzureOpenAI,
            model: "review-gpt4o".into(),
            endpoint: "https://example.openai.azure.com".into(),
            api_key: Some("azure-key".into()),
            deployment: Some("review-gpt4o".into()),
            api_version: Some("2024-03-01-preview".into()),
            max_tokens: None,
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn chat_url_embeds_deployment_and_version() {
        let url = chat_url(
            "https://example.openai.azure.com/",
            "review-gpt4o",
            "2024-03-01-preview",
        );
        assert_eq!(
            url,
            "https://example.openai.azure.com/openai/deployments/review-gpt4o/chat/completions?api-version=2024-03-01-preview"
        );
    }

    #[test]
    fn constructor_rejects_missing_deployment() {
        let mut c = cfg();
        c.deployment = None;
        assert!(AzureOpenAiService::new(c).is_err());
    }

    #[test]
    fn constructor_rejects_missing_api_version() {
        let mut c = cfg();
        c.api_version = None;
        assert!(AzureOpenAiService::new(c).is_err());
    }

    #[test]
    fn constructor_accepts_complete_config() {
        assert!(AzureOpenAiService::new(cfg()).is_ok());
    }
}
