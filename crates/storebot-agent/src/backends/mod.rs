/// OpenAI-compatible chat-completions backend.
pub mod openai;

use crate::llm::LlmReply;
use crate::stream::StreamEvent;
use async_trait::async_trait;
use storebot_core::{Message, StorebotResult};
use storebot_tools::ToolDescriptor;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Trait for generation-backend implementations.
///
/// A backend turns the transcript plus tool descriptors into one reply:
/// final text, or a request to invoke tools. To add a provider with a
/// different wire format, implement this trait in a new module under
/// `backends/` and wire it into `LlmClient::new()`.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// One chat completion over the full transcript.
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> StorebotResult<LlmReply>;

    /// One streaming chat completion over the full transcript.
    ///
    /// Events arrive on the receiver while the reply is generated; the join
    /// handle resolves to the aggregated reply once the stream ends.
    async fn chat_stream(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> StorebotResult<(
        mpsc::Receiver<StreamEvent>,
        JoinHandle<StorebotResult<LlmReply>>,
    )>;
}
