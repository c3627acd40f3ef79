//! # raven-model
//!
//! Language-model backends for Raven.
//!
//! ## Overview
//!
//! Two serving profiles implement the [`raven_core::Llm`] trait:
//!
//! - [`OpenAiCompatModel`] — remote OpenAI-compatible HTTP endpoints
//!   (Groq, vLLM, OpenAI)
//! - [`OllamaModel`] — a locally served Ollama model
//!
//! plus [`MockLlm`], a deterministic scripted model for tests. The active
//! backend is chosen by [`LlmConfig::backend`] and constructed through
//! [`build_llm`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use raven_model::{build_llm, LlmConfig};
//!
//! let llm = build_llm(&LlmConfig::default())?;
//! let answer = llm.generate(&prompt).await?;
//! ```

pub mod config;
pub mod factory;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{LlmBackend, LlmConfig, OllamaConfig, OpenAiCompatConfig};
pub use factory::build_llm;
pub use mock::MockLlm;
pub use ollama::OllamaModel;
pub use openai::OpenAiCompatModel;
