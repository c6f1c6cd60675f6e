//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API with
//! function calling. Requests are not retried: a transport or API failure
//! propagates to the caller and ends the session.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ChatMessage, CompletionRequest, CompletionResponse, LlmError, Role, ToolCallRequest};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in the config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = std::env::var(&config.api_key_env).map_err(|_| LlmError::MissingApiKey {
            var: config.api_key_env.clone(),
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the chat completions endpoint
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, message_count = %request.messages.len(), "build_request_body: called");

        let messages: Vec<serde_json::Value> = request.messages.iter().map(wire_message).collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
        });

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(
                request.tools.iter().map(|t| t.to_openai_schema()).collect::<Vec<_>>()
            );
            body["tool_choice"] = serde_json::json!("auto");
        }

        body
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, api_response: OpenAIResponse) -> Result<CompletionResponse, LlmError> {
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCallRequest {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(CompletionResponse {
            content: choice.message.content,
            tool_calls,
            usage: api_response.usage,
        })
    }
}

#[async_trait]
impl super::LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        debug!(%url, "complete: sending request");
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "complete: API error");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("complete: success");
        let api_response: OpenAIResponse = response.json().await?;
        self.parse_response(api_response)
    }
}

/// Convert a stored message into the wire object the API expects
///
/// Assistant tool calls are re-nested under `function`; tool messages carry
/// their correlation id and tool name.
fn wire_message(msg: &ChatMessage) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    let mut wire = serde_json::json!({ "role": role });

    if let Some(content) = &msg.content {
        wire["content"] = serde_json::json!(content);
    }

    if !msg.tool_calls.is_empty() {
        wire["tool_calls"] = serde_json::json!(
            msg.tool_calls
                .iter()
                .map(|tc| {
                    serde_json::json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments,
                        }
                    })
                })
                .collect::<Vec<_>>()
        );
    }

    if let Some(id) = &msg.tool_call_id {
        wire["tool_call_id"] = serde_json::json!(id);
    }
    if let Some(name) = &msg.name {
        wire["name"] = serde_json::json!(name);
    }

    wire
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: super::TokenUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolDescriptor;

    fn test_client() -> OpenAIClient {
        OpenAIClient {
            model: "gpt-4-1106-preview".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens: 4096,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client();

        let request = CompletionRequest {
            messages: vec![ChatMessage::system("You are helpful"), ChatMessage::user("Hello")],
            tools: vec![],
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "gpt-4-1106-preview");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_build_request_body_with_tools_sets_auto_choice() {
        let client = test_client();

        let request = CompletionRequest {
            messages: vec![ChatMessage::system("sys")],
            tools: vec![ToolDescriptor::new(
                "shell_tool",
                "Run commands",
                serde_json::json!({"command": {"type": "string", "description": "Program"}}),
                &["command"],
            )],
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "shell_tool");
    }

    #[test]
    fn test_wire_message_assistant_with_tool_calls() {
        let msg = ChatMessage::assistant(
            None,
            vec![ToolCallRequest {
                id: "call_1".to_string(),
                name: "shell_tool".to_string(),
                arguments: r#"{"command": "pwd"}"#.to_string(),
            }],
        );

        let wire = wire_message(&msg);

        assert_eq!(wire["role"], "assistant");
        assert!(wire.get("content").is_none());
        assert_eq!(wire["tool_calls"][0]["id"], "call_1");
        assert_eq!(wire["tool_calls"][0]["type"], "function");
        assert_eq!(wire["tool_calls"][0]["function"]["name"], "shell_tool");
        assert_eq!(wire["tool_calls"][0]["function"]["arguments"], r#"{"command": "pwd"}"#);
    }

    #[test]
    fn test_wire_message_tool_reply() {
        let msg = ChatMessage::tool("call_1", "shell_tool", r#"{"result": {"returncode": 0}}"#);

        let wire = wire_message(&msg);

        assert_eq!(wire["role"], "tool");
        assert_eq!(wire["tool_call_id"], "call_1");
        assert_eq!(wire["name"], "shell_tool");
        assert_eq!(wire["content"], r#"{"result": {"returncode": 0}}"#);
    }

    #[test]
    fn test_parse_response_extracts_tool_calls_and_usage() {
        let client = test_client();

        let raw = serde_json::json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": { "name": "daemon_tool", "arguments": "{\"action\": \"start\"}" }
                    }]
                }
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        });

        let api_response: OpenAIResponse = serde_json::from_value(raw).unwrap();
        let response = client.parse_response(api_response).unwrap();

        assert_eq!(response.content, None);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "daemon_tool");
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[test]
    fn test_parse_response_no_choices_is_invalid() {
        let client = test_client();

        let raw = serde_json::json!({ "choices": [] });
        let api_response: OpenAIResponse = serde_json::from_value(raw).unwrap();

        assert!(matches!(
            client.parse_response(api_response),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
