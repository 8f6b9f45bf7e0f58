/// Represents the provider (backend) used for large language model inference.
///
/// This enum distinguishes between the generic OpenAI API and the
/// enterprise-hosted Azure OpenAI variant. Adding more providers in the
/// future (e.g., Anthropic Claude, Mistral API) can be done by extending
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI's hosted API (`/v1/chat/completions`).
    OpenAI,
    /// Azure OpenAI deployments (`/openai/deployments/{name}/...`).
    AzureOpenAI,
}
