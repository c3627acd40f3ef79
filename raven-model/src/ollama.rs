//! Ollama backend for locally served models.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::Ollama;
use tracing::debug;

use raven_core::{CoreError, Llm, Prompt, Result, TokenStream};

use crate::config::OllamaConfig;

/// An [`Llm`] backed by a local Ollama server.
///
/// # Example
///
/// ```rust,ignore
/// use raven_model::{OllamaConfig, OllamaModel};
///
/// let model = OllamaModel::new(&OllamaConfig::default());
/// let answer = model.generate(&prompt).await?;
/// ```
#[derive(Debug)]
pub struct OllamaModel {
    ollama: Ollama,
    model: String,
}

impl OllamaModel {
    /// Create a client for the configured Ollama server and model.
    pub fn new(config: &OllamaConfig) -> Self {
        Self { ollama: Ollama::new(config.host.clone(), config.port), model: config.model.clone() }
    }

    fn build_request(&self, prompt: &Prompt) -> ChatMessageRequest {
        let messages = vec![
            ChatMessage::system(prompt.system.clone()),
            ChatMessage::user(prompt.user.clone()),
        ];
        ChatMessageRequest::new(self.model.clone(), messages)
    }
}

#[async_trait]
impl Llm for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        debug!(model = %self.model, "ollama chat request");
        let response = self
            .ollama
            .send_chat_messages(self.build_request(prompt))
            .await
            .map_err(|e| CoreError::model(&self.model, format!("Ollama request failed: {e}")))?;

        Ok(response.message.content)
    }

    async fn generate_stream(&self, prompt: &Prompt) -> Result<TokenStream> {
        let request = self.build_request(prompt);
        let ollama = self.ollama.clone();
        let model = self.model.clone();

        let stream = try_stream! {
            let mut inner = ollama
                .send_chat_messages_stream(request)
                .await
                .map_err(|e| CoreError::model(&model, format!("Ollama request failed: {e}")))?;

            while let Some(result) = inner.next().await {
                match result {
                    Ok(chunk) => {
                        let content = chunk.message.content;
                        if !content.is_empty() {
                            yield content;
                        }
                    }
                    Err(_) => {
                        Err(CoreError::model(&model, "Ollama stream error"))?;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
