use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// This struct contains both general and provider-specific parameters.
/// The Azure-only fields (`deployment`, `api_version`) stay `None` for the
/// generic OpenAI provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (OpenAI, Azure OpenAI).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-4o"`). For Azure this is the
    /// deployment's underlying model name, used for reporting only.
    pub model: String,

    /// API base endpoint (e.g., `"https://api.openai.com"` or the Azure
    /// resource endpoint).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Azure deployment name. `None` for generic OpenAI.
    pub deployment: Option<String>,

    /// Azure API version (e.g., `"2024-03-01-preview"`). `None` for generic OpenAI.
    pub api_version: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
