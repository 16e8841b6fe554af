use super::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use crate::llm::LlmReply;
use crate::stream::StreamEvent;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;
use storebot_core::{Message, MessageBody, Role, StorebotError, StorebotResult, ToolCall};
use storebot_tools::ToolDescriptor;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// OpenAI-compatible chat-completions backend.
///
/// Works with OpenAI, OpenRouter and any other provider implementing the
/// same API.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Builds the backend; fails only if the HTTP client cannot be created.
    pub fn new(config: ModelConfig) -> StorebotResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorebotError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    fn build_messages(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
    ) -> Vec<serde_json::Value> {
        let mut api_messages: Vec<serde_json::Value> = Vec::new();

        if let Some(sys) = system_prompt {
            api_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }

        for m in messages {
            match &m.body {
                MessageBody::Text { text } => {
                    if m.role == Role::System {
                        continue;
                    }
                    let role = match m.role {
                        Role::Assistant => "assistant",
                        _ => "user",
                    };
                    api_messages.push(serde_json::json!({
                        "role": role,
                        "content": text
                    }));
                }
                MessageBody::ToolRequest { content, calls } => {
                    let tool_calls: Vec<serde_json::Value> = calls
                        .iter()
                        .map(|c| {
                            serde_json::json!({
                                "id": c.id,
                                "type": "function",
                                "function": {
                                    "name": c.name,
                                    "arguments": c.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                    api_messages.push(serde_json::json!({
                        "role": "assistant",
                        "content": content,
                        "tool_calls": tool_calls,
                    }));
                }
                MessageBody::ToolOutput { result } => {
                    api_messages.push(serde_json::json!({
                        "role": "tool",
                        "tool_call_id": result.call_id,
                        "content": result.payload_json().to_string(),
                    }));
                }
            }
        }

        api_messages
    }

    fn build_tools(&self, tools: &[ToolDescriptor]) -> Vec<serde_json::Value> {
        tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_schema,
                    }
                })
            })
            .collect()
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");

        // OpenRouter wants attribution headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request
                .header("HTTP-Referer", "https://github.com/storebot-ai/storebot")
                .header("X-Title", "Storebot")
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> StorebotResult<LlmReply> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let api_messages = self.build_messages(system_prompt, messages);

        let mut body = serde_json::json!({
            "model": self.config.model_id,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": api_messages,
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(self.build_tools(tools));
        }

        let request = self.add_provider_headers(self.http.post(&url));

        let resp = request
            .json(&body)
            .send()
            .await
            .map_err(|e| StorebotError::Backend(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| StorebotError::Backend(e.to_string()))?;

        if !status.is_success() {
            return Err(StorebotError::Backend(format!(
                "API error {status}: {resp_body}"
            )));
        }

        parse_chat_response(&resp_body)
    }

    async fn chat_stream(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> StorebotResult<(
        mpsc::Receiver<StreamEvent>,
        JoinHandle<StorebotResult<LlmReply>>,
    )> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let api_messages = self.build_messages(system_prompt, messages);

        let mut body = serde_json::json!({
            "model": self.config.model_id,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": api_messages,
            "stream": true,
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(self.build_tools(tools));
        }

        let request = self.add_provider_headers(self.http.post(&url));

        let resp = request
            .json(&body)
            .send()
            .await
            .map_err(|e| StorebotError::Backend(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp.text().await.unwrap_or_default();
            return Err(StorebotError::Backend(format!(
                "API error {status}: {error_body}"
            )));
        }

        let (tx, rx) = mpsc::channel::<StreamEvent>(64);
        let mut byte_stream = resp.bytes_stream();

        let handle = tokio::spawn(async move {
            let mut buffer = String::new();
            let mut reply = StreamingReply::default();

            while let Some(chunk) = byte_stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let message = format!("Stream read failed: {e}");
                        let _ = tx
                            .send(StreamEvent::Error {
                                message: message.clone(),
                            })
                            .await;
                        return Err(StorebotError::Backend(message));
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // SSE frames: one "data: ..." payload per line.
                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer.drain(..=line_end);

                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    if data == "[DONE]" {
                        let _ = tx.send(StreamEvent::Done).await;
                        continue;
                    }
                    if let Ok(event) = serde_json::from_str::<serde_json::Value>(data) {
                        reply.absorb(&event["choices"][0]["delta"], &tx).await;
                    }
                }
            }

            Ok(reply.finish())
        });

        Ok((rx, handle))
    }
}

/// Accumulator for a streamed reply: text fragments and tool-call fragments
/// keyed by the wire's `index` field.
#[derive(Default)]
struct StreamingReply {
    text: String,
    calls: Vec<PartialCall>,
}

#[derive(Default)]
struct PartialCall {
    id: String,
    name: String,
    arguments_json: String,
}

impl StreamingReply {
    async fn absorb(&mut self, delta: &serde_json::Value, tx: &mpsc::Sender<StreamEvent>) {
        if let Some(text) = delta["content"].as_str() {
            if !text.is_empty() {
                self.text.push_str(text);
                let _ = tx
                    .send(StreamEvent::TextDelta {
                        text: text.to_string(),
                    })
                    .await;
            }
        }

        let Some(entries) = delta["tool_calls"].as_array() else {
            return;
        };
        for entry in entries {
            let idx = entry["index"].as_u64().unwrap_or(0) as usize;
            while self.calls.len() <= idx {
                self.calls.push(PartialCall::default());
            }

            if let Some(name) = entry["function"]["name"].as_str() {
                self.calls[idx].name = name.to_string();
            }
            if let Some(id) = entry["id"].as_str() {
                self.calls[idx].id = id.to_string();
                let _ = tx
                    .send(StreamEvent::ToolCallStart {
                        id: id.to_string(),
                        name: self.calls[idx].name.clone(),
                    })
                    .await;
            }
            if let Some(fragment) = entry["function"]["arguments"].as_str() {
                if !fragment.is_empty() {
                    self.calls[idx].arguments_json.push_str(fragment);
                    let _ = tx
                        .send(StreamEvent::ToolCallDelta {
                            id: self.calls[idx].id.clone(),
                            arguments_delta: fragment.to_string(),
                        })
                        .await;
                }
            }
        }
    }

    fn finish(self) -> LlmReply {
        if self.calls.is_empty() {
            return LlmReply::Final(self.text);
        }

        let calls = self
            .calls
            .into_iter()
            .map(|c| ToolCall {
                id: c.id,
                name: c.name,
                arguments: serde_json::from_str(&c.arguments_json).unwrap_or_default(),
            })
            .collect();

        LlmReply::ToolUse {
            content: if self.text.is_empty() {
                None
            } else {
                Some(self.text)
            },
            calls,
        }
    }
}

/// Parses an OpenAI chat-completions response into an [`LlmReply`].
pub fn parse_chat_response(body: &serde_json::Value) -> StorebotResult<LlmReply> {
    let choice = &body["choices"][0];
    let message = &choice["message"];
    let content = message["content"].as_str().unwrap_or_default().to_string();

    let tool_calls_json = message["tool_calls"].as_array();
    match tool_calls_json {
        Some(entries) if !entries.is_empty() => {
            let calls: Vec<ToolCall> = entries
                .iter()
                .filter_map(|tc| {
                    let id = tc["id"].as_str()?.to_string();
                    let name = tc["function"]["name"].as_str()?.to_string();
                    let arguments: serde_json::Value =
                        serde_json::from_str(tc["function"]["arguments"].as_str()?)
                            .unwrap_or_default();
                    Some(ToolCall {
                        id,
                        name,
                        arguments,
                    })
                })
                .collect();

            if calls.is_empty() {
                return Err(StorebotError::Backend(
                    "Malformed tool_calls in backend reply".to_string(),
                ));
            }

            Ok(LlmReply::ToolUse {
                content: if content.is_empty() {
                    None
                } else {
                    Some(content)
                },
                calls,
            })
        }
        _ => {
            if message.is_null() {
                return Err(StorebotError::Backend(format!(
                    "Reply carried no message: {body}"
                )));
            }
            Ok(LlmReply::Final(content))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use storebot_core::ToolResult;
    use uuid::Uuid;

    fn config() -> ModelConfig {
        ModelConfig {
            provider: LlmProvider::OpenRouter,
            model_id: "test-model".to_string(),
            api_key: "sk-test".to_string(),
            api_base_url: None,
            temperature: 0.0,
            max_tokens: 256,
            max_turns: 4,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_parse_final_text() {
        let body = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "All done."},
                "finish_reason": "stop"
            }]
        });
        match parse_chat_response(&body).unwrap() {
            LlmReply::Final(text) => assert_eq!(text, "All done."),
            LlmReply::ToolUse { .. } => panic!("expected final text"),
        }
    }

    #[test]
    fn test_parse_tool_calls() {
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "list_products", "arguments": "{\"limit\": 5}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        match parse_chat_response(&body).unwrap() {
            LlmReply::ToolUse { content, calls } => {
                assert!(content.is_none());
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "list_products");
                assert_eq!(calls[0].arguments["limit"], 5);
            }
            LlmReply::Final(_) => panic!("expected tool use"),
        }
    }

    #[test]
    fn test_parse_missing_message_is_backend_error() {
        let err = parse_chat_response(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, StorebotError::Backend(_)));
    }

    #[test]
    fn test_wire_mapping_of_transcript() {
        let backend = OpenAiBackend::new(config()).unwrap();
        let sid = Uuid::new_v4();

        let call = ToolCall {
            id: "call_1".to_string(),
            name: "list_products".to_string(),
            arguments: json!({"limit": 5}),
        };
        let transcript = vec![
            Message::user("list 5 products", sid),
            Message::tool_request(None, vec![call], sid),
            Message::tool_output(
                ToolResult::success("call_1", "list_products", json!([{"id": 1}])),
                sid,
            ),
            Message::assistant("Here you go.", sid),
        ];

        let wire = backend.build_messages(Some("You are a store assistant."), &transcript);
        assert_eq!(wire.len(), 5);
        assert_eq!(wire[0]["role"], "system");
        assert_eq!(wire[1]["role"], "user");
        assert_eq!(wire[2]["role"], "assistant");
        assert_eq!(wire[2]["tool_calls"][0]["function"]["name"], "list_products");
        // Arguments go over the wire as a JSON-encoded string.
        assert_eq!(
            wire[2]["tool_calls"][0]["function"]["arguments"],
            "{\"limit\":5}"
        );
        assert_eq!(wire[3]["role"], "tool");
        assert_eq!(wire[3]["tool_call_id"], "call_1");
        assert_eq!(wire[4]["role"], "assistant");
        assert_eq!(wire[4]["content"], "Here you go.");
    }

    #[tokio::test]
    async fn test_stream_aggregates_text_fragments() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut reply = StreamingReply::default();

        reply.absorb(&json!({"content": "Hel"}), &tx).await;
        reply.absorb(&json!({"content": "lo."}), &tx).await;
        drop(tx);

        match reply.finish() {
            LlmReply::Final(text) => assert_eq!(text, "Hello."),
            LlmReply::ToolUse { .. } => panic!("expected final text"),
        }

        let mut deltas = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::TextDelta { text } => deltas.push(text),
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(deltas, vec!["Hel", "lo."]);
    }

    #[tokio::test]
    async fn test_stream_aggregates_tool_call_fragments() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut reply = StreamingReply::default();

        reply
            .absorb(
                &json!({"tool_calls": [{
                    "index": 0,
                    "id": "call_1",
                    "function": {"name": "get_product", "arguments": ""}
                }]}),
                &tx,
            )
            .await;
        reply
            .absorb(
                &json!({"tool_calls": [{
                    "index": 0,
                    "function": {"arguments": "{\"product_id\""}
                }]}),
                &tx,
            )
            .await;
        reply
            .absorb(
                &json!({"tool_calls": [{
                    "index": 0,
                    "function": {"arguments": ": 42}"}
                }]}),
                &tx,
            )
            .await;
        drop(tx);

        match reply.finish() {
            LlmReply::ToolUse { content, calls } => {
                assert!(content.is_none());
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].id, "call_1");
                assert_eq!(calls[0].name, "get_product");
                assert_eq!(calls[0].arguments["product_id"], 42);
            }
            LlmReply::Final(_) => panic!("expected tool use"),
        }

        let first = rx.recv().await.unwrap();
        assert!(
            matches!(first, StreamEvent::ToolCallStart { ref id, ref name } if id == "call_1" && name == "get_product")
        );
        let second = rx.recv().await.unwrap();
        assert!(matches!(second, StreamEvent::ToolCallDelta { .. }));
    }

    #[test]
    fn test_error_payload_rendered_for_model() {
        let backend = OpenAiBackend::new(config()).unwrap();
        let sid = Uuid::new_v4();
        let transcript = vec![Message::tool_output(
            ToolResult::error("call_9", "update_inventory", "Variant not found"),
            sid,
        )];

        let wire = backend.build_messages(None, &transcript);
        assert_eq!(wire[0]["role"], "tool");
        assert_eq!(
            wire[0]["content"],
            "{\"error\":\"Variant not found\"}"
        );
    }
}
