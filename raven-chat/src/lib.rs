//! # raven-chat
//!
//! Persona prompt assembly and session orchestration for Raven.
//!
//! ## Overview
//!
//! - [`AppConfig`] — one TOML file configuring retrieval, generation,
//!   persona, speech, and the server
//! - [`PromptTemplate`] — persona + context + question → [`raven_core::Prompt`],
//!   with a remote template source and a deterministic built-in fallback
//! - [`GenerationClient`] — the never-crash boundary: backend failures
//!   become user-visible text, mid-stream failures become a final fragment
//! - [`ChatSession`] — the orchestrator owning the lazy lifecycle and the
//!   `ask` / `ask_stream` contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use raven_chat::{AppConfig, ChatSession};
//!
//! let session = ChatSession::new(AppConfig::load_or_default("raven.toml".as_ref())?);
//! session.initialize(false).await?;
//!
//! let answer = session.ask("what's your favorite day of the year?").await?;
//!
//! let mut stream = session.ask_stream("and your least favorite?").await?;
//! while let Some(fragment) = futures::StreamExt::next(&mut stream).await {
//!     print!("{fragment}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod prompt;
pub mod session;

pub use config::{AppConfig, PersonaConfig, ServerConfig};
pub use error::{ChatError, Result};
pub use generation::{strip_reasoning, AnswerStream, GenerationClient};
pub use prompt::PromptTemplate;
pub use session::{ChatSession, ChatSessionBuilder, Engine, SessionState};
