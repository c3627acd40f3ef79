//! OpenAI-compatible backend.
//!
//! Talks to any endpoint speaking the OpenAI chat-completions protocol
//! (Groq, vLLM, the OpenAI API itself) through the
//! [async-openai](https://docs.rs/async-openai) crate.

use async_openai::config::OpenAIConfig as AsyncOpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use raven_core::{CoreError, Llm, Prompt, Result, TokenStream};

use crate::config::OpenAiCompatConfig;

/// An [`Llm`] backed by a remote OpenAI-compatible HTTP endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use raven_model::{OpenAiCompatConfig, OpenAiCompatModel};
///
/// let model = OpenAiCompatModel::new(&OpenAiCompatConfig::default(), api_key)?;
/// let answer = model.generate(&prompt).await?;
/// ```
#[derive(Debug)]
pub struct OpenAiCompatModel {
    client: Client<AsyncOpenAIConfig>,
    model: String,
}

impl OpenAiCompatModel {
    /// Create a client against the configured base URL and model.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the API key is empty.
    pub fn new(config: &OpenAiCompatConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CoreError::Config("API key must not be empty".to_string()));
        }

        let openai_config =
            AsyncOpenAIConfig::new().with_api_key(api_key).with_api_base(&config.base_url);

        Ok(Self { client: Client::with_config(openai_config), model: config.model.clone() })
    }

    fn build_request(&self, prompt: &Prompt, stream: bool) -> Result<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system.as_str())
                .build()
                .map_err(|e| CoreError::model(&self.model, format!("bad system message: {e}")))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user.as_str())
                .build()
                .map_err(|e| CoreError::model(&self.model, format!("bad user message: {e}")))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .stream(stream)
            .build()
            .map_err(|e| CoreError::model(&self.model, format!("failed to build request: {e}")))
    }
}

#[async_trait]
impl Llm for OpenAiCompatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = self.build_request(prompt, false)?;

        debug!(model = %self.model, "chat completion request");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CoreError::model(&self.model, format!("API error: {e}")))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(text)
    }

    async fn generate_stream(&self, prompt: &Prompt) -> Result<TokenStream> {
        let request = self.build_request(prompt, true)?;
        let client = self.client.clone();
        let model = self.model.clone();

        let stream = try_stream! {
            let mut inner = client
                .chat()
                .create_stream(request)
                .await
                .map_err(|e| CoreError::model(&model, format!("API error: {e}")))?;

            while let Some(result) = inner.next().await {
                let chunk = result
                    .map_err(|e| CoreError::model(&model, format!("stream error: {e}")))?;
                if let Some(content) =
                    chunk.choices.into_iter().next().and_then(|c| c.delta.content)
                {
                    if !content.is_empty() {
                        yield content;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
