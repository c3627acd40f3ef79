//! Configuration for the speech synthesis collaborator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for the GPT-SoVITS-style HTTP synthesis service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    /// Whether replies are synthesized at all.
    pub enabled: bool,
    /// Base URL of the synthesis service.
    pub base_url: String,
    /// Synthesis endpoint path.
    pub endpoint: String,
    /// Directory synthesized WAV files are written to.
    pub output_dir: PathBuf,
    /// Path of the reference audio, as seen by the synthesis service.
    pub ref_audio_path: String,
    /// Transcript of the reference audio.
    pub prompt_text: String,
    /// Language of the reference transcript.
    pub prompt_lang: String,
    /// Language of the text being synthesized.
    pub text_lang: String,
    /// Sampling temperature passed to the synthesis engine.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://127.0.0.1:9880".to_string(),
            endpoint: "/tts".to_string(),
            output_dir: PathBuf::from("output"),
            ref_audio_path: "custom_refs/base-audio.wav".to_string(),
            prompt_text: String::new(),
            prompt_lang: "zh".to_string(),
            text_lang: "zh".to_string(),
            temperature: 0.6,
            top_p: 0.6,
            top_k: 20,
        }
    }
}
