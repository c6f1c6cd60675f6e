//! Chat request/response types
//!
//! These types model the OpenAI Chat Completions API with function calling.
//! Messages are kept in the wire shape so the conversation log can be sent
//! back to the service verbatim on every round.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A completion request - everything needed for one model call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full conversation snapshot, system message first
    pub messages: Vec<ChatMessage>,

    /// Tools the model may call this round
    pub tools: Vec<ToolDescriptor>,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in the conversation log
///
/// Append-only: a message is never mutated once it has been added to the
/// conversation. Assistant messages may carry tool calls; tool messages
/// carry the `tool_call_id` they answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Create the system message that seeds a session
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create an assistant message, with whatever tool calls it proposed
    pub fn assistant(content: Option<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        debug!(tool_call_count = %tool_calls.len(), "ChatMessage::assistant: called");
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a tool-role message answering one tool call
    pub fn tool(tool_call_id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }
}

/// A tool invocation proposed by the model
///
/// `arguments` is the JSON-encoded object exactly as the model emitted it;
/// parsing (and parse failures) belong to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Tool calls requested by the model, in the order proposed
    pub tool_calls: Vec<ToolCallRequest>,

    /// Token usage reported by the service
    pub usage: TokenUsage,
}

/// Token usage reported with each response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Static metadata describing one tool to the model
///
/// `parameters` maps each parameter name to its `{type, description}` spec;
/// `required` lists the parameter names the model must supply.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub required: Vec<String>,
}

impl ToolDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value, required: &[&str]) -> Self {
        let name = name.into();
        debug!(%name, "ToolDescriptor::new: called");
        Self {
            name,
            description: description.into(),
            parameters,
            required: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Convert to the chat-completions function schema
    pub fn to_openai_schema(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": self.parameters,
                },
                "required": self.required,
            }
        })
    }
}
