//! opsagent - operator-approved LLM agent
//!
//! A conversational agent that turns natural-language requests into tool
//! invocations - shell commands, background process control, packet
//! capture - proposed by a chat model and approved by the operator one call
//! at a time.
//!
//! # Core Concepts
//!
//! - **Closed registry**: the tool set is compiled in and statically
//!   verifiable; no runtime discovery
//! - **Approval gate**: nothing with a side effect runs without an explicit
//!   operator confirmation; anything but "y"/"yes" declines
//! - **Failures are values**: bad arguments, unknown tools, declines, and
//!   tool crashes all become tool results the model reads; only a model
//!   service failure ends the session
//! - **Append-only state**: the conversation log and the shell audit log
//!   only grow
//!
//! # Modules
//!
//! - [`llm`] - model service client trait and OpenAI implementation
//! - [`tools`] - registry, dispatcher, audit log, and builtin tools
//! - [`approval`] - the human confirmation port
//! - [`conversation`] - the append-only message log
//! - [`repl`] - the interactive session loop
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod approval;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod tools;

// Re-export commonly used types
pub use approval::{ApprovalPort, ConsoleApproval};
pub use config::{AuditConfig, Config, LlmConfig, SessionConfig};
pub use conversation::Conversation;
pub use llm::{
    ChatMessage, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, Role, TokenUsage,
    ToolCallRequest, ToolDescriptor,
};
pub use repl::{ChatSession, TokenAccountant};
pub use tools::{AuditLog, AuditRecord, DispatchError, DispatchResult, Dispatcher, Tool, ToolError, ToolRegistry};
