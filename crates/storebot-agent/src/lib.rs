//! The conversation controller for Storebot.
//!
//! Implements the tool-calling loop: replay the transcript to the generation
//! backend, execute any requested tools through the registry, fold their
//! results back into the transcript, and repeat until the backend produces a
//! final text reply or the bounded turn ceiling is hit.

/// Provider backends.
pub mod backends;
/// Model configuration.
pub mod config;
/// The LLM client and reply type.
pub mod llm;
/// The reason/act loop.
pub mod runner;
/// Thread-keyed chat facade.
pub mod service;
/// Incremental reply events.
pub mod stream;

pub use backends::LlmBackend;
pub use config::{LlmProvider, ModelConfig};
pub use llm::{LlmClient, LlmReply};
pub use runner::AgentRunner;
pub use service::AgentService;
pub use stream::StreamEvent;
