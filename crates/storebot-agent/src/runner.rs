use crate::config::ModelConfig;
use crate::llm::{LlmClient, LlmReply};
use crate::stream::StreamEvent;
use std::sync::Arc;
use storebot_core::{Message, StorebotError, StorebotResult, ToolCall};
use storebot_session::Session;
use storebot_tools::ToolRegistry;
use tokio::sync::mpsc;
use tracing::{info, warn};

const DEFAULT_SYSTEM_PROMPT: &str = "You are a store assistant for an e-commerce shop. You have \
     access to tools for looking up products, customers, orders and inventory, and for creating \
     products and adjusting stock. Use them when a question needs store data; answer directly \
     otherwise. When a tool reports an error, explain it to the user instead of giving up.";

/// The conversation controller: drives the reason/act loop for one session.
///
/// Each turn replays the full transcript to the backend. A reply with tool
/// calls goes through the dispatcher and its results are appended in request
/// order before the backend is consulted again; a plain text reply ends the
/// turn. The loop is bounded by `max_turns` from [`ModelConfig`].
pub struct AgentRunner {
    llm: LlmClient,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    max_turns: u32,
}

impl AgentRunner {
    /// Creates a runner for the configured backend and tool registry.
    pub fn new(config: ModelConfig, tools: Arc<ToolRegistry>) -> StorebotResult<Self> {
        let max_turns = config.max_turns;
        Ok(Self {
            llm: LlmClient::new(config)?,
            tools,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_turns,
        })
    }

    /// Creates a runner from a pre-built LLM client (stub backends in tests).
    pub fn from_client(llm: LlmClient, tools: Arc<ToolRegistry>, max_turns: u32) -> Self {
        Self {
            llm,
            tools,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_turns,
        }
    }

    /// Replaces the default system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Advances the conversation with one user input and returns the final
    /// assistant text.
    ///
    /// Backend failures propagate; tool execution failures do not — they are
    /// folded into the transcript as error results and the backend decides
    /// how to respond. Exceeding the turn ceiling yields
    /// [`StorebotError::TurnLimitExceeded`].
    pub async fn advance(&self, session: &mut Session, user_input: &str) -> StorebotResult<String> {
        let session_id = session.id;
        session.add_message(Message::user(user_input, session_id));

        let descriptors: Vec<_> = self.tools.descriptors().into_iter().cloned().collect();

        info!(session_id = %session_id, thread_id = %session.thread_id, "Starting conversation turn");

        for turn in 0..self.max_turns {
            let reply = self
                .llm
                .chat(Some(&self.system_prompt), &session.messages, &descriptors)
                .await?;

            match reply {
                LlmReply::Final(text) => {
                    session.add_message(Message::assistant(&text, session_id));
                    info!(session_id = %session_id, turns = turn + 1, "Conversation turn completed");
                    return Ok(text);
                }

                LlmReply::ToolUse { content, calls } => {
                    info!(
                        session_id = %session_id,
                        turn = turn,
                        count = calls.len(),
                        "Backend requested tools"
                    );
                    self.run_tools(session, content, calls).await?;
                }
            }
        }

        warn!(
            session_id = %session_id,
            max_turns = self.max_turns,
            "Conversation turn hit the ceiling"
        );
        Err(StorebotError::TurnLimitExceeded {
            max_turns: self.max_turns,
        })
    }

    /// Like [`AgentRunner::advance`], forwarding the backend's incremental
    /// events to `events` while the turn runs. Tool dispatch happens between
    /// streamed replies exactly as in the non-streaming path.
    pub async fn advance_stream(
        &self,
        session: &mut Session,
        user_input: &str,
        events: mpsc::Sender<StreamEvent>,
    ) -> StorebotResult<String> {
        let session_id = session.id;
        session.add_message(Message::user(user_input, session_id));

        let descriptors: Vec<_> = self.tools.descriptors().into_iter().cloned().collect();

        info!(session_id = %session_id, thread_id = %session.thread_id, "Starting streaming turn");

        for turn in 0..self.max_turns {
            let (mut rx, handle) = self
                .llm
                .chat_stream(Some(&self.system_prompt), &session.messages, &descriptors)
                .await?;

            // Forward until the backend closes the channel; a dropped
            // consumer is not an error, the turn still completes.
            while let Some(event) = rx.recv().await {
                let _ = events.send(event).await;
            }

            let reply = handle
                .await
                .map_err(|e| StorebotError::Backend(format!("Stream task failed: {e}")))??;

            match reply {
                LlmReply::Final(text) => {
                    session.add_message(Message::assistant(&text, session_id));
                    info!(session_id = %session_id, turns = turn + 1, "Streaming turn completed");
                    return Ok(text);
                }

                LlmReply::ToolUse { content, calls } => {
                    info!(
                        session_id = %session_id,
                        turn = turn,
                        count = calls.len(),
                        "Backend requested tools"
                    );
                    self.run_tools(session, content, calls).await?;
                }
            }
        }

        warn!(
            session_id = %session_id,
            max_turns = self.max_turns,
            "Streaming turn hit the ceiling"
        );
        Err(StorebotError::TurnLimitExceeded {
            max_turns: self.max_turns,
        })
    }

    /// Dispatches the requested calls and records the request with its
    /// results, one per call in request order.
    ///
    /// Dispatch runs before anything is recorded: a boundary error (unknown
    /// tool, bad arguments) must not leave an unanswered request in the
    /// transcript, or every later replay of the session would carry a tool
    /// request with no results.
    async fn run_tools(
        &self,
        session: &mut Session,
        content: Option<String>,
        calls: Vec<ToolCall>,
    ) -> StorebotResult<()> {
        let session_id = session.id;
        let results = self.tools.dispatch(&calls).await?;

        session.add_message(Message::tool_request(content, calls, session_id));
        for result in results {
            session.add_message(Message::tool_output(result, session_id));
        }
        Ok(())
    }
}
