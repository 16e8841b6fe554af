use thiserror::Error;

/// A convenience `Result` alias using [`StorebotError`].
pub type StorebotResult<T> = Result<T, StorebotError>;

/// Top-level error type for Storebot.
///
/// Only `Config` and unrecovered `Backend` errors terminate an interaction.
/// `Tool` errors are captured by the dispatcher and folded back into the
/// transcript; `UnknownTool` and `InvalidArguments` indicate a schema or
/// registration bug rather than a normal-path failure.
#[derive(Debug, Error)]
pub enum StorebotError {
    /// Missing or invalid configuration (credentials, environment). Fatal at
    /// startup, before any session exists.
    #[error("Config error: {0}")]
    Config(String),

    /// The generation backend call failed (network, auth, malformed reply).
    /// Propagates to the caller of the conversation loop; no automatic retry.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Session registry or lookup failure.
    #[error("Session error: {0}")]
    Session(String),

    /// The backend requested a tool that is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments failed schema validation.
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments {
        /// Name of the tool whose arguments were rejected.
        tool: String,
        /// Human-readable description of the mismatch.
        reason: String,
    },

    /// A tool's execution procedure failed. Never escapes the dispatcher:
    /// it is converted into an error-payload [`crate::ToolResult`].
    #[error("Tool execution failed: {0}")]
    Tool(String),

    /// The conversation loop hit its turn ceiling without a final response.
    #[error("Conversation exceeded maximum of {max_turns} turns")]
    TurnLimitExceeded {
        /// The configured ceiling that was reached.
        max_turns: u32,
    },

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
