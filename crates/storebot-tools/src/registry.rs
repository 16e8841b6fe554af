use crate::tool::{Tool, ToolDescriptor};
use crate::validate::validate_arguments;
use std::collections::HashMap;
use std::sync::Arc;
use storebot_core::{StorebotError, StorebotResult, ToolCall, ToolResult};
use tracing::{info, warn};

/// Central registry for all available tools, and the action dispatcher.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool under its descriptor name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.descriptor().name.clone();
        info!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
    }

    /// Looks a tool up by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Descriptors of all registered tools.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Executes the requested calls sequentially, in request order.
    ///
    /// The returned results match the request order one-to-one. An unknown
    /// tool name or a schema violation is an `Err` at this boundary (a bug
    /// signal, not a conversational failure); an error raised by a tool's
    /// own execution is captured into an error-payload result so the
    /// conversation can continue.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> StorebotResult<Vec<ToolResult>> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.dispatch_one(call).await?);
        }
        Ok(results)
    }

    /// Executes a single call. See [`ToolRegistry::dispatch`].
    pub async fn dispatch_one(&self, call: &ToolCall) -> StorebotResult<ToolResult> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| StorebotError::UnknownTool(call.name.clone()))?;

        let args = validate_arguments(&tool.descriptor().parameters_schema, &call.arguments)
            .map_err(|reason| StorebotError::InvalidArguments {
                tool: call.name.clone(),
                reason,
            })?;

        match tool.invoke(&args).await {
            Ok(value) => Ok(ToolResult::success(&call.id, &call.name, value)),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                // Keep the tool's own message as the payload; the variant
                // prefix adds nothing the model can act on.
                let message = match e {
                    StorebotError::Tool(message) => message,
                    other => other.to_string(),
                };
                Ok(ToolResult::error(&call.id, &call.name, message))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use storebot_core::ToolPayload;

    struct EchoTool {
        descriptor: ToolDescriptor,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                descriptor: ToolDescriptor {
                    name: "echo".to_string(),
                    description: "Echoes its arguments back.".to_string(),
                    parameters_schema: json!({
                        "type": "object",
                        "properties": {
                            "text": {"type": "string"},
                            "repeat": {"type": "integer", "default": 1}
                        },
                        "required": ["text"]
                    }),
                },
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
            Ok(arguments.clone())
        }
    }

    struct FailingTool {
        descriptor: ToolDescriptor,
    }

    impl FailingTool {
        fn new() -> Self {
            Self {
                descriptor: ToolDescriptor {
                    name: "broken".to_string(),
                    description: "Always fails.".to_string(),
                    parameters_schema: json!({"type": "object", "properties": {}}),
                },
            }
        }
    }

    #[async_trait]
    impl Tool for FailingTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, _arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
            Err(StorebotError::Tool("backing store unreachable".to_string()))
        }
    }

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            id: format!("call_{name}"),
            name: name.to_string(),
            arguments: args,
        }
    }

    #[tokio::test]
    async fn test_dispatch_success_with_defaults() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));

        let results = registry
            .dispatch(&[call("echo", json!({"text": "hi"}))])
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        match &results[0].payload {
            ToolPayload::Success { value } => {
                assert_eq!(value["text"], "hi");
                // Default applied before invocation.
                assert_eq!(value["repeat"], 1);
            }
            ToolPayload::Error { .. } => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_dispatcher_error() {
        let registry = ToolRegistry::new();
        let err = registry
            .dispatch(&[call("missing", json!({}))])
            .await
            .unwrap_err();
        assert!(matches!(err, StorebotError::UnknownTool(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_is_dispatcher_error() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));

        let err = registry
            .dispatch(&[call("echo", json!({}))])
            .await
            .unwrap_err();
        assert!(matches!(err, StorebotError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn test_execution_failure_is_captured_not_raised() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool::new()));

        let results = registry.dispatch(&[call("broken", json!({}))]).await.unwrap();
        assert!(results[0].is_error());
        assert_eq!(
            results[0].payload_json()["error"],
            "backing store unreachable"
        );
    }

    #[tokio::test]
    async fn test_results_preserve_request_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));
        registry.register(Arc::new(FailingTool::new()));

        let calls = vec![
            call("echo", json!({"text": "first"})),
            call("broken", json!({})),
            call("echo", json!({"text": "third"})),
        ];
        let results = registry.dispatch(&calls).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].call_id, "call_echo");
        assert_eq!(results[0].name, "echo");
        assert!(results[1].is_error());
        assert_eq!(results[2].name, "echo");
        match &results[2].payload {
            ToolPayload::Success { value } => assert_eq!(value["text"], "third"),
            ToolPayload::Error { .. } => panic!("expected success"),
        }
    }
}
