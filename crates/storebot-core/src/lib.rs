//! Core types and error definitions for Storebot.
//!
//! This crate provides the foundational types shared across all Storebot
//! crates: error handling, transcript message representations, and tool call
//! abstractions.
//!
//! # Main types
//!
//! - [`StorebotError`] — Unified error enum for all Storebot subsystems.
//! - [`StorebotResult`] — Convenience alias for `Result<T, StorebotError>`.
//! - [`Role`] / [`Message`] / [`MessageBody`] — A transcript entry and its
//!   tagged payload (text, tool request, or tool output).
//! - [`ToolCall`] — An LLM-initiated tool invocation request.
//! - [`ToolResult`] / [`ToolPayload`] — The outcome of executing a tool call,
//!   with success and failure as distinct variants.

/// Error types.
pub mod error;
/// Transcript message types.
pub mod message;
/// Tool call and result types.
pub mod tool;

pub use error::{StorebotError, StorebotResult};
pub use message::{Message, MessageBody, Role};
pub use tool::{ToolCall, ToolPayload, ToolResult};
