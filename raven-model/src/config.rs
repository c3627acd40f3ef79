//! Backend selection and per-backend configuration.

use serde::{Deserialize, Serialize};

/// Which generation backend the system talks to.
///
/// A static construction-time choice: switching backends means building a
/// new client through the factory, never mutating a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmBackend {
    /// A remote OpenAI-compatible HTTP endpoint (hosted inference).
    OpenAiCompat,
    /// A locally served Ollama model.
    Ollama,
}

/// Configuration for the OpenAI-compatible remote profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenAiCompatConfig {
    /// Model name requested from the endpoint.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            model: "gemma2-9b-it".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

/// Configuration for the local Ollama profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    /// Model name, as known to the Ollama server.
    pub model: String,
    /// Scheme and host of the Ollama server.
    pub host: String,
    /// Port of the Ollama server.
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-r1:latest".to_string(),
            host: "http://localhost".to_string(),
            port: 11434,
        }
    }
}

/// Top-level model configuration: the active backend plus both profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// The backend the factory constructs.
    pub backend: LlmBackend,
    /// Remote OpenAI-compatible profile.
    pub openai: OpenAiCompatConfig,
    /// Local Ollama profile.
    pub ollama: OllamaConfig,
}

impl Default for LlmBackend {
    fn default() -> Self {
        Self::Ollama
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_deserialize_from_snake_case() {
        let cfg: LlmConfig = serde_json::from_str(r#"{"backend": "open_ai_compat"}"#).unwrap();
        assert_eq!(cfg.backend, LlmBackend::OpenAiCompat);
        let cfg: LlmConfig = serde_json::from_str(r#"{"backend": "ollama"}"#).unwrap();
        assert_eq!(cfg.backend, LlmBackend::Ollama);
    }

    #[test]
    fn defaults_point_at_local_ollama() {
        let cfg = LlmConfig::default();
        assert_eq!(cfg.backend, LlmBackend::Ollama);
        assert_eq!(cfg.ollama.port, 11434);
    }
}
