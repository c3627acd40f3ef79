//! Error types for the `raven-tts` crate.

use thiserror::Error;

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum TtsError {
    /// The synthesis service could not be reached.
    #[error("TTS request failed: {0}")]
    Request(String),

    /// The synthesis service answered with a non-success status.
    #[error("TTS service returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Writing the synthesized audio to disk failed.
    #[error("failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience result type for synthesis operations.
pub type TtsResult<T> = std::result::Result<T, TtsError>;
