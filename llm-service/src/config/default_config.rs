//! Backend selection from environment variables.
//!
//! The review service supports two backends and picks one at startup:
//!
//! - **Azure OpenAI** — chosen when both `AZURE_OPENAI_API_KEY` and
//!   `AZURE_OPENAI_ENDPOINT` are set. `AZURE_OPENAI_DEPLOYMENT_NAME` and
//!   `AZURE_OPENAI_API_VERSION` have the usual defaults.
//! - **OpenAI** — chosen otherwise when `OPENAI_API_KEY` is set.
//!
//! When neither is configured, selection fails with [`ConfigError::NoBackend`]
//! and the process must not begin serving.
//!
//! Selection is a pure function of a captured [`BackendEnv`] snapshot, so it
//! is deterministic and testable without touching the process environment.
//!
//! # Environment variables
//!
//! Azure: `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT`,
//! `AZURE_OPENAI_DEPLOYMENT_NAME` (default `gpt-4o`),
//! `AZURE_OPENAI_API_VERSION` (default `2024-03-01-preview`)
//!
//! OpenAI: `OPENAI_API_KEY`, `OPENAI_MODEL_NAME` (default `gpt-4o`)
//!
//! Common: `OPENAI_TEMPERATURE` (default `0.7`), `LLM_TIMEOUT_SECS` (optional)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, LlmError, opt_env, validate_http_endpoint, validate_range_f32},
};

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_AZURE_API_VERSION: &str = "2024-03-01-preview";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const OPENAI_ENDPOINT: &str = "https://api.openai.com";

/// Raw snapshot of the backend-related environment, captured once at startup.
///
/// Keeping the raw strings (instead of reading the environment inside the
/// selection logic) makes [`select_backend`] a pure function.
#[derive(Debug, Clone, Default)]
pub struct BackendEnv {
    pub azure_api_key: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub temperature: Option<String>,
    pub timeout_secs: Option<String>,
}

impl BackendEnv {
    /// Captures the backend configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            azure_api_key: opt_env("AZURE_OPENAI_API_KEY"),
            azure_endpoint: opt_env("AZURE_OPENAI_ENDPOINT"),
            azure_deployment: opt_env("AZURE_OPENAI_DEPLOYMENT_NAME"),
            azure_api_version: opt_env("AZURE_OPENAI_API_VERSION"),
            openai_api_key: opt_env("OPENAI_API_KEY"),
            openai_model: opt_env("OPENAI_MODEL_NAME"),
            temperature: opt_env("OPENAI_TEMPERATURE"),
            timeout_secs: opt_env("LLM_TIMEOUT_SECS"),
        }
    }
}

/// Selects the backend configuration from a captured env snapshot.
///
/// Azure wins when both its key and endpoint are present; otherwise the
/// generic OpenAI backend is used when its key is present. The decision
/// depends only on `env`, never on call order or process state.
///
/// # Errors
///
/// - [`ConfigError::NoBackend`] when neither backend is configured
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for a bad
///   `OPENAI_TEMPERATURE` or `LLM_TIMEOUT_SECS`
/// - [`ConfigError::InvalidFormat`] for a malformed Azure endpoint
pub fn select_backend(env: &BackendEnv) -> Result<LlmModelConfig, LlmError> {
    let temperature = parse_temperature(env.temperature.as_deref())?;
    let timeout_secs = parse_timeout(env.timeout_secs.as_deref())?;

    if let (Some(api_key), Some(endpoint)) = (&env.azure_api_key, &env.azure_endpoint) {
        validate_http_endpoint("AZURE_OPENAI_ENDPOINT", endpoint)?;
        let deployment = env
            .azure_deployment
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        return Ok(LlmModelConfig {
            provider: LlmProvider::AzureOpenAI,
            model: deployment.clone(),
            endpoint: endpoint.clone(),
            api_key: Some(api_key.clone()),
            deployment: Some(deployment),
            api_version: Some(
                env.azure_api_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            ),
            max_tokens: None,
            temperature: Some(temperature),
            top_p: None,
            timeout_secs,
        });
    }

    if let Some(api_key) = &env.openai_api_key {
        return Ok(LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: env
                .openai_model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key: Some(api_key.clone()),
            deployment: None,
            api_version: None,
            max_tokens: None,
            temperature: Some(temperature),
            top_p: None,
            timeout_secs,
        });
    }

    Err(ConfigError::NoBackend.into())
}

fn parse_temperature(raw: Option<&str>) -> Result<f32, LlmError> {
    let value = match raw {
        Some(s) => s.trim().parse::<f32>().map_err(|_| ConfigError::InvalidNumber {
            var: "OPENAI_TEMPERATURE",
            reason: "expected f32",
        })?,
        None => DEFAULT_TEMPERATURE,
    };
    validate_range_f32("temperature", value, 0.0, 2.0)?;
    Ok(value)
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<u64>, LlmError> {
    match raw {
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var: "LLM_TIMEOUT_SECS",
                reason: "expected u64",
            })
            .map_err(LlmError::from),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn azure_env() -> BackendEnv {
        BackendEnv {
            azure_api_key: Some("azure-key".into()),
            azure_endpoint: Some("https://example.openai.azure.com".into()),
            azure_deployment: Some("review-gpt4o".into()),
            azure_api_version: None,
            openai_api_key: None,
            ..BackendEnv::default()
        }
    }

    #[test]
    fn azure_selected_when_azure_fields_set() {
        let cfg = select_backend(&azure_env()).unwrap();
        assert_eq!(cfg.provider, LlmProvider::AzureOpenAI);
        assert_eq!(cfg.deployment.as_deref(), Some("review-gpt4o"));
        assert_eq!(cfg.api_version.as_deref(), Some(DEFAULT_AZURE_API_VERSION));
    }

    #[test]
    fn azure_wins_over_openai_when_both_set() {
        let mut env = azure_env();
        env.openai_api_key = Some("sk-generic".into());
        let cfg = select_backend(&env).unwrap();
        assert_eq!(cfg.provider, LlmProvider::AzureOpenAI);
    }

    #[test]
    fn selection_is_deterministic_across_calls() {
        let env = azure_env();
        let first = select_backend(&env).unwrap();
        for _ in 0..10 {
            assert_eq!(select_backend(&env).unwrap(), first);
        }
    }

    #[test]
    fn openai_fallback_uses_defaults() {
        let env = BackendEnv {
            openai_api_key: Some("sk-test".into()),
            ..BackendEnv::default()
        };
        let cfg = select_backend(&env).unwrap();
        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.endpoint, OPENAI_ENDPOINT);
        assert_eq!(cfg.temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[test]
    fn no_backend_is_a_config_error() {
        let err = select_backend(&BackendEnv::default()).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Config(ConfigError::NoBackend)
        ));
    }

    #[test]
    fn bad_temperature_is_rejected() {
        let env = BackendEnv {
            openai_api_key: Some("sk-test".into()),
            temperature: Some("warm".into()),
            ..BackendEnv::default()
        };
        assert!(select_backend(&env).is_err());

        let env = BackendEnv {
            openai_api_key: Some("sk-test".into()),
            temperature: Some("3.5".into()),
            ..BackendEnv::default()
        };
        assert!(select_backend(&env).is_err());
    }

    #[test]
    fn malformed_azure_endpoint_is_rejected() {
        let mut env = azure_env();
        env.azure_endpoint = Some("example.openai.azure.com".into());
        assert!(select_backend(&env).is_err());
    }
}
