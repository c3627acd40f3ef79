//! # raven-tts
//!
//! Thin client for a GPT-SoVITS-style speech synthesis service.
//!
//! The contract is deliberately narrow: text in, path of a written WAV file
//! out. Synthesis failures are reported as errors to direct callers and
//! logged-and-swallowed by the fire-and-forget helper: speech is optional
//! and must never take the chat loop down with it.

pub mod client;
pub mod config;
pub mod error;

pub use client::{spawn_synthesize, TtsClient};
pub use config::TtsConfig;
pub use error::{TtsError, TtsResult};
