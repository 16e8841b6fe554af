use serde::{Deserialize, Serialize};

/// A request from the LLM to invoke a specific tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier assigned by the LLM for this tool call.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON arguments to pass to the tool.
    pub arguments: serde_json::Value,
}

/// The outcome of a tool execution: a success value or a structured error.
///
/// Success and failure are distinct variants rather than an `error` key
/// inside a success-shaped mapping, so callers never have to infer failure
/// from payload contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToolPayload {
    /// The tool completed and produced a value.
    Success {
        /// The JSON value produced by the tool.
        value: serde_json::Value,
    },
    /// The tool failed; the conversation continues with this message.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

/// The result returned after executing a [`ToolCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The ID of the [`ToolCall`] this result corresponds to.
    pub call_id: String,
    /// Name of the tool that produced this result.
    pub name: String,
    /// The outcome payload.
    pub payload: ToolPayload,
}

impl ToolResult {
    /// Creates a successful tool result.
    pub fn success(
        call_id: impl Into<String>,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            payload: ToolPayload::Success { value },
        }
    }

    /// Creates an error tool result.
    pub fn error(
        call_id: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            payload: ToolPayload::Error {
                message: message.into(),
            },
        }
    }

    /// Whether this result carries an error payload.
    pub fn is_error(&self) -> bool {
        matches!(self.payload, ToolPayload::Error { .. })
    }

    /// Renders the payload as the JSON the generation backend sees:
    /// the success value itself, or `{"error": message}` on failure.
    pub fn payload_json(&self) -> serde_json::Value {
        match &self.payload {
            ToolPayload::Success { value } => value.clone(),
            ToolPayload::Error { message } => serde_json::json!({ "error": message }),
        }
    }
}
