//! HTTP client for the synthesis service.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::TtsConfig;
use crate::error::{TtsError, TtsResult};

/// Request body understood by GPT-SoVITS-style `/tts` endpoints.
#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    text_lang: &'a str,
    ref_audio_path: &'a str,
    prompt_text: &'a str,
    prompt_lang: &'a str,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    media_type: &'a str,
    streaming_mode: bool,
}

/// A client for one synthesis service instance.
pub struct TtsClient {
    config: TtsConfig,
    http: reqwest::Client,
}

impl TtsClient {
    /// Create a client for the configured service.
    pub fn new(config: TtsConfig) -> Self {
        Self { config, http: reqwest::Client::new() }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &TtsConfig {
        &self.config
    }

    /// Synthesize `text` and write the resulting WAV under the output
    /// directory. Returns the path of the written file.
    pub async fn synthesize(&self, text: &str) -> TtsResult<PathBuf> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TtsError::Request("nothing to synthesize".to_string()));
        }

        let url = format!("{}{}", self.config.base_url, self.config.endpoint);
        let body = SynthesisRequest {
            text,
            text_lang: &self.config.text_lang,
            ref_audio_path: &self.config.ref_audio_path,
            prompt_text: &self.config.prompt_text,
            prompt_lang: &self.config.prompt_lang,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: self.config.top_k,
            media_type: "wav",
            streaming_mode: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TtsError::Api { status, message });
        }

        let audio = response.bytes().await.map_err(|e| TtsError::Request(e.to_string()))?;

        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let filename = format!(
            "tts_{}_{}.wav",
            chrono::Utc::now().format("%Y%m%d%H%M%S"),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        let path = self.config.output_dir.join(filename);
        tokio::fs::write(&path, &audio).await?;

        info!(path = %path.display(), bytes = audio.len(), "synthesized reply audio");
        Ok(path)
    }
}

/// Fire-and-forget synthesis: spawn a task, log the outcome, never fail the
/// caller. Used after a streamed reply has fully drained.
pub fn spawn_synthesize(client: Arc<TtsClient>, text: String) {
    tokio::spawn(async move {
        match client.synthesize(&text).await {
            Ok(path) => info!(path = %path.display(), "background synthesis finished"),
            Err(e) => error!(error = %e, "background synthesis failed"),
        }
    });
}
