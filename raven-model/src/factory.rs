//! Backend factory keyed by configuration.

use std::sync::Arc;

use tracing::info;

use raven_core::{CoreError, Llm, Result};

use crate::config::{LlmBackend, LlmConfig};
use crate::ollama::OllamaModel;
use crate::openai::OpenAiCompatModel;

/// Construct the configured [`Llm`] backend.
///
/// The OpenAI-compatible profile reads its API key from the environment
/// variable named in the config; a missing key is a configuration error
/// surfaced at construction, not at first request.
pub fn build_llm(config: &LlmConfig) -> Result<Arc<dyn Llm>> {
    match config.backend {
        LlmBackend::OpenAiCompat => {
            let api_key = std::env::var(&config.openai.api_key_env).map_err(|_| {
                CoreError::Config(format!(
                    "environment variable '{}' is not set",
                    config.openai.api_key_env
                ))
            })?;
            info!(model = %config.openai.model, base_url = %config.openai.base_url, "using OpenAI-compatible backend");
            Ok(Arc::new(OpenAiCompatModel::new(&config.openai, api_key)?))
        }
        LlmBackend::Ollama => {
            info!(model = %config.ollama.model, host = %config.ollama.host, "using Ollama backend");
            Ok(Arc::new(OllamaModel::new(&config.ollama)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_backend_builds_without_credentials() {
        let config = LlmConfig::default();
        let llm = build_llm(&config).unwrap();
        assert_eq!(llm.name(), "deepseek-r1:latest");
    }

    #[test]
    fn openai_backend_requires_key_env() {
        let mut config = LlmConfig { backend: LlmBackend::OpenAiCompat, ..Default::default() };
        config.openai.api_key_env = "RAVEN_TEST_KEY_THAT_IS_NOT_SET".to_string();
        let err = build_llm(&config).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
