use crate::runner::AgentRunner;
use crate::stream::StreamEvent;
use std::sync::Arc;
use storebot_core::StorebotResult;
use storebot_session::SessionRegistry;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Thread-id-keyed chat facade over the runner and the session registry.
///
/// Holding the session's lock for the whole turn enforces one active turn
/// per session; distinct thread ids run independently.
pub struct AgentService {
    runner: Arc<AgentRunner>,
    sessions: Arc<SessionRegistry>,
}

impl AgentService {
    /// Creates the service.
    pub fn new(runner: AgentRunner, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            runner: Arc::new(runner),
            sessions,
        }
    }

    /// Sends one user message on the given thread and returns the final
    /// assistant text. The session is created on first use.
    pub async fn chat(&self, thread_id: &str, message: &str) -> StorebotResult<String> {
        let handle = self.sessions.get_or_create(thread_id);
        let mut session = handle.lock().await;
        self.runner.advance(&mut session, message).await
    }

    /// Streaming variant of [`AgentService::chat`]: incremental events on
    /// the receiver while the turn runs, the final assistant text from the
    /// join handle.
    pub fn stream_chat(
        &self,
        thread_id: &str,
        message: &str,
    ) -> (
        mpsc::Receiver<StreamEvent>,
        JoinHandle<StorebotResult<String>>,
    ) {
        let (tx, rx) = mpsc::channel::<StreamEvent>(64);
        let runner = Arc::clone(&self.runner);
        let handle = self.sessions.get_or_create(thread_id);
        let message = message.to_string();

        let task = tokio::spawn(async move {
            let mut session = handle.lock().await;
            runner.advance_stream(&mut session, &message, tx).await
        });

        (rx, task)
    }

    /// The session registry backing this service.
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }
}
