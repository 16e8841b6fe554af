use crate::backends::openai::OpenAiBackend;
use crate::backends::LlmBackend;
use crate::config::ModelConfig;
use crate::stream::StreamEvent;
use storebot_core::{Message, StorebotResult, ToolCall};
use storebot_tools::ToolDescriptor;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Reply from the generation backend.
///
/// `Final` terminates the conversation turn; `ToolUse` asks the dispatcher
/// to execute the listed calls and re-invoke the backend.
#[derive(Debug, Clone)]
pub enum LlmReply {
    /// Terminal assistant text.
    Final(String),
    /// A request to invoke one or more tools, in order.
    ToolUse {
        /// Optional prose accompanying the request.
        content: Option<String>,
        /// The requested calls.
        calls: Vec<ToolCall>,
    },
}

/// LLM client that dispatches to the configured provider backend.
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
}

impl LlmClient {
    /// Builds a client for the configured provider.
    pub fn new(config: ModelConfig) -> StorebotResult<Self> {
        // Both supported providers speak the OpenAI wire format.
        let backend: Box<dyn LlmBackend> = Box::new(OpenAiBackend::new(config)?);
        Ok(Self { backend })
    }

    /// Creates a client from a pre-built backend (stubs, custom providers).
    pub fn from_backend(backend: Box<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// One chat completion over the full transcript.
    pub async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> StorebotResult<LlmReply> {
        self.backend.chat(system_prompt, messages, tools).await
    }

    /// One streaming chat completion: incremental events plus the aggregated
    /// reply from the join handle.
    pub async fn chat_stream(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> StorebotResult<(
        mpsc::Receiver<StreamEvent>,
        JoinHandle<StorebotResult<LlmReply>>,
    )> {
        self.backend
            .chat_stream(system_prompt, messages, tools)
            .await
    }
}
