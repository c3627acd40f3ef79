//! Application-level configuration.
//!
//! One TOML file configures the whole system; every section has working
//! defaults so an empty (or absent) file yields a usable local setup.
//! Secrets stay out of the file: the model backends read API keys from
//! environment variables named in their own sections.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use raven_model::LlmConfig;
use raven_rag::RagConfig;
use raven_tts::TtsConfig;

use crate::error::{ChatError, Result};

/// The persona layer applied to every generation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonaConfig {
    /// The system instruction: who the assistant is and how it must speak.
    pub system_message: String,
    /// Optional URL of a remote prompt template document. When unset or
    /// unreachable, the built-in template is used.
    pub template_url: Option<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            system_message: "You are Raven, a reclusive and sharp-tongued conversationalist. \
                             You always speak in the first person and never describe yourself \
                             from the outside. Your tone is cold, dry, and darkly humorous. \
                             Answer using only the provided context; when the context says \
                             nothing, admit it with disdain rather than inventing facts."
                .to_string(),
            template_url: None,
        }
    }
}

/// Bind address for the HTTP front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8000 }
    }
}

/// Top-level configuration: one section per subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Retrieval pipeline settings.
    pub rag: RagConfig,
    /// Generation backend settings.
    pub llm: LlmConfig,
    /// Persona settings.
    pub persona: PersonaConfig,
    /// Speech synthesis settings.
    pub tts: TtsConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse a config file, validating the retrieval section.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("failed to read '{}': {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            ChatError::Config(format!("failed to parse '{}': {e}", path.display()))
        })?;
        config.rag.validate()?;
        Ok(config)
    }

    /// Load the config file if it exists, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            info!(path = %path.display(), "loading configuration");
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn sections_override_independently() {
        let config: AppConfig = toml::from_str(
            r#"
            [rag]
            chunk_size = 500
            top_k = 4

            [llm]
            backend = "open_ai_compat"

            [server]
            port = 9001
            "#,
        )
        .unwrap();

        assert_eq!(config.rag.chunk_size, 500);
        assert_eq!(config.rag.top_k, 4);
        assert_eq!(config.rag.chunk_overlap, RagConfig::default().chunk_overlap);
        assert_eq!(config.llm.backend, raven_model::LlmBackend::OpenAiCompat);
        assert_eq!(config.server.port, 9001);
    }
}
