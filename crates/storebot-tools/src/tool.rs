use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storebot_core::StorebotResult;

/// Metadata describing a tool's interface.
///
/// `parameters_schema` is a JSON-schema object: `properties` may carry a
/// `default` per optional field, and `required` lists mandatory fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name, unique within a registry.
    pub name: String,
    /// Human-readable description shown to the generation backend.
    pub description: String,
    /// JSON-schema object describing the accepted arguments.
    pub parameters_schema: serde_json::Value,
}

/// Trait that all tools implement.
///
/// `invoke` receives arguments that already passed schema validation with
/// defaults applied. Returning `Err` is how a tool reports an execution
/// failure; the registry converts it into an error-payload
/// [`storebot_core::ToolResult`] rather than letting it propagate.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's descriptor.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Executes the tool with validated arguments.
    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value>;
}
