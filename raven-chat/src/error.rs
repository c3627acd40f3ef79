//! Error types for the `raven-chat` crate.

use thiserror::Error;

/// Errors surfaced by session orchestration.
///
/// Generation failures never appear here: they are converted to
/// user-visible text at the generation client boundary. What remains are
/// ingestion/index domain errors and configuration problems.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A retrieval-side failure (ingestion, index, embedding).
    #[error(transparent)]
    Rag(#[from] raven_rag::RagError),

    /// A model construction failure (bad backend config, missing key).
    #[error(transparent)]
    Model(#[from] raven_core::CoreError),

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
