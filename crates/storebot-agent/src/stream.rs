use serde::{Deserialize, Serialize};

/// Incremental events surfaced while the backend generates a reply.
///
/// Consumers (the chat REPL, a future socket surface) receive these as they
/// arrive; the aggregated reply is still delivered at the end of the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A fragment of assistant text.
    TextDelta {
        /// The text fragment.
        text: String,
    },

    /// The backend started a tool call request.
    ToolCallStart {
        /// Call id assigned by the backend.
        id: String,
        /// Requested tool name.
        name: String,
    },

    /// A fragment of a tool call's JSON-encoded arguments.
    ToolCallDelta {
        /// Call id the fragment belongs to.
        id: String,
        /// The argument fragment.
        arguments_delta: String,
    },

    /// The current backend reply is complete.
    Done,

    /// The stream broke. The same error resolves the join handle.
    Error {
        /// What went wrong.
        message: String,
    },
}
