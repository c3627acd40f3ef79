//! Error types shared across the Raven crates.

use thiserror::Error;

/// Errors produced by core abstractions (model backends, prompt handling).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A model backend failed: transport error, timeout, or API error.
    #[error("Model error ({backend}): {message}")]
    Model {
        /// The backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration value is missing or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Convenience constructor for backend errors.
    pub fn model(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model { backend: backend.into(), message: message.into() }
    }
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
