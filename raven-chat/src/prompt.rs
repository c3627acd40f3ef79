//! Prompt templates and assembly.
//!
//! A template folds the persona system message, a retrieved context block,
//! and the user's question into a [`Prompt`]. Templates can be fetched from
//! a remote JSON source; any failure there falls back to the built-in
//! template, which performs the same context and question substitution, so
//! the system behaves identically without connectivity.

use serde::Deserialize;
use tracing::{info, warn};

use raven_core::Prompt;

/// The built-in user-turn template. `{context}` and `{question}` are
/// replaced at assembly time.
const BUILTIN_USER_TEMPLATE: &str = "Answer the question based on the following context.\n\n\
                                     Context:\n{context}\n\n\
                                     Question: {question}\n\n\
                                     Answer:";

/// Shape of a remote template document.
#[derive(Deserialize)]
struct RemoteTemplate {
    user: String,
}

/// A prompt template: persona system message plus a user-turn pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    system: String,
    user_template: String,
}

impl PromptTemplate {
    /// The deterministic built-in template for the given persona.
    pub fn builtin(persona: impl Into<String>) -> Self {
        Self { system: persona.into(), user_template: BUILTIN_USER_TEMPLATE.to_string() }
    }

    /// Load a template, preferring the remote source when one is configured.
    ///
    /// Falls back to [`builtin`](PromptTemplate::builtin) on any fetch or
    /// validation failure; the fallback is logged, not raised.
    pub async fn load(persona: &str, template_url: Option<&str>) -> Self {
        let Some(url) = template_url else {
            return Self::builtin(persona);
        };

        match Self::fetch_remote(persona, url).await {
            Ok(template) => {
                info!(url, "using remote prompt template");
                template
            }
            Err(message) => {
                warn!(url, message, "remote prompt template unavailable, using built-in");
                Self::builtin(persona)
            }
        }
    }

    async fn fetch_remote(persona: &str, url: &str) -> std::result::Result<Self, String> {
        let response = reqwest::get(url).await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("server returned {}", response.status()));
        }
        let remote: RemoteTemplate = response.json().await.map_err(|e| e.to_string())?;
        if !remote.user.contains("{context}") || !remote.user.contains("{question}") {
            return Err("template is missing {context} or {question} placeholder".to_string());
        }
        Ok(Self { system: persona.to_string(), user_template: remote.user })
    }

    /// Merge the context block and question into a model-ready [`Prompt`].
    pub fn assemble(&self, context: &str, question: &str) -> Prompt {
        let user = self.user_template.replace("{context}", context).replace("{question}", question);
        Prompt::new(self.system.clone(), user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_substitutes_context_and_question() {
        let template = PromptTemplate::builtin("persona text");
        let prompt = template.assemble("some context", "a question?");

        assert_eq!(prompt.system, "persona text");
        assert!(prompt.user.contains("some context"));
        assert!(prompt.user.contains("a question?"));
        assert!(!prompt.user.contains("{context}"));
        assert!(!prompt.user.contains("{question}"));
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_builtin() {
        let template =
            PromptTemplate::load("persona", Some("http://127.0.0.1:1/notthere")).await;
        assert_eq!(template, PromptTemplate::builtin("persona"));
    }

    #[tokio::test]
    async fn no_url_uses_builtin() {
        let template = PromptTemplate::load("persona", None).await;
        assert_eq!(template, PromptTemplate::builtin("persona"));
    }
}
