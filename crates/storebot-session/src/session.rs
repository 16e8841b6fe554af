use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use storebot_core::Message;
use uuid::Uuid;

/// A single ongoing conversation: one thread id, one transcript.
///
/// The transcript is append-only while a conversation turn is running; the
/// full message sequence is replayed to the generation backend on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    pub id: Uuid,
    /// The caller-supplied thread identifier this session is keyed by.
    pub thread_id: String,
    /// The ordered transcript.
    pub messages: Vec<Message>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When a message was last appended.
    pub updated_at: DateTime<Utc>,
    /// Arbitrary key-value metadata attached to the session.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Session {
    /// Creates an empty session for the given thread id.
    pub fn new(thread_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            thread_id: thread_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            metadata: HashMap::new(),
        }
    }

    /// Appends a message to the transcript.
    pub fn add_message(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
