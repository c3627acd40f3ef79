//! # raven-core
//!
//! Shared abstractions for the Raven persona chat system.
//!
//! This crate defines the seams the rest of the workspace is built around:
//!
//! - [`Llm`] — the language-model backend trait (blocking + streaming)
//! - [`Prompt`] — the assembled generation request (system + user payloads)
//! - [`TokenStream`] — the ordered fragment stream a backend produces
//! - [`CoreError`] — the error type model backends report through
//!
//! Concrete backends live in `raven-model`; retrieval lives in `raven-rag`;
//! the session orchestrator that ties them together lives in `raven-chat`.

pub mod error;
pub mod llm;

pub use error::{CoreError, Result};
pub use llm::{Llm, Prompt, TokenStream};
