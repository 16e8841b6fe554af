use crate::tool::{ToolCall, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The role of the participant that authored a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human end-user.
    User,
    /// The AI assistant.
    Assistant,
    /// A system-level instruction or prompt.
    System,
    /// Output produced by a tool invocation.
    Tool,
}

/// The payload of a [`Message`], tagged by kind.
///
/// A transcript is a sequence of these three shapes: prose from the user or
/// assistant, an assistant request to invoke tools, and one tool output per
/// requested call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    /// Plain text content.
    Text {
        /// The textual content.
        text: String,
    },
    /// An assistant request to invoke one or more tools, in order.
    ToolRequest {
        /// Optional prose accompanying the request.
        content: Option<String>,
        /// The requested calls, in the order they must be executed.
        calls: Vec<ToolCall>,
    },
    /// The outcome of one requested tool call.
    ToolOutput {
        /// The result, success or error.
        result: ToolResult,
    },
}

/// A single message within a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: Uuid,
    /// The role of the message author.
    pub role: Role,
    /// The tagged payload.
    pub body: MessageBody,
    /// The session this message belongs to.
    pub session_id: Uuid,
    /// UTC timestamp of when the message was created.
    pub timestamp: DateTime<Utc>,
    /// Arbitrary key-value metadata attached to the message.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Message {
    /// Creates a new message with the given role and body.
    pub fn new(role: Role, body: MessageBody, session_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            body,
            session_id,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Creates a user text message.
    pub fn user(text: impl Into<String>, session_id: Uuid) -> Self {
        Self::new(
            Role::User,
            MessageBody::Text { text: text.into() },
            session_id,
        )
    }

    /// Creates an assistant text message.
    pub fn assistant(text: impl Into<String>, session_id: Uuid) -> Self {
        Self::new(
            Role::Assistant,
            MessageBody::Text { text: text.into() },
            session_id,
        )
    }

    /// Creates a system text message.
    pub fn system(text: impl Into<String>, session_id: Uuid) -> Self {
        Self::new(
            Role::System,
            MessageBody::Text { text: text.into() },
            session_id,
        )
    }

    /// Creates an assistant tool-request message.
    pub fn tool_request(
        content: Option<String>,
        calls: Vec<ToolCall>,
        session_id: Uuid,
    ) -> Self {
        Self::new(
            Role::Assistant,
            MessageBody::ToolRequest { content, calls },
            session_id,
        )
    }

    /// Creates a tool-output message for one executed call.
    pub fn tool_output(result: ToolResult, session_id: Uuid) -> Self {
        Self::new(Role::Tool, MessageBody::ToolOutput { result }, session_id)
    }

    /// Returns the text content if this is a plain text message.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tool::ToolPayload;

    #[test]
    fn test_message_creation() {
        let session_id = Uuid::new_v4();
        let msg = Message::user("Hello", session_id);
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("Hello"));
        assert_eq!(msg.session_id, session_id);
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("test", Uuid::new_v4());
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.text(), Some("test"));
        assert_eq!(deserialized.role, Role::User);
    }

    #[test]
    fn test_tool_request_roundtrip() {
        let sid = Uuid::new_v4();
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "list_products".to_string(),
            arguments: serde_json::json!({"limit": 5}),
        };
        let msg = Message::tool_request(None, vec![call], sid);
        assert_eq!(msg.role, Role::Assistant);

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"tool_request\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        match back.body {
            MessageBody::ToolRequest { calls, .. } => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "list_products");
            }
            _ => panic!("expected tool request"),
        }
    }

    #[test]
    fn test_tool_output_role() {
        let sid = Uuid::new_v4();
        let result = ToolResult::success("call_1", "list_products", serde_json::json!([]));
        let msg = Message::tool_output(result, sid);
        assert_eq!(msg.role, Role::Tool);
        match msg.body {
            MessageBody::ToolOutput { result } => {
                assert!(matches!(result.payload, ToolPayload::Success { .. }));
            }
            _ => panic!("expected tool output"),
        }
    }
}
