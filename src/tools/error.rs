//! Tool error types

use thiserror::Error;

/// Errors that can occur during tool registration and execution
///
/// These never escape the dispatch boundary: the dispatcher converts them
/// into structured tool results the model can react to.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("duplicate tool name: {name}")]
    DuplicateToolName { name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no process found with key: {key}")]
    UnknownProcessKey { key: String },

    #[error("a process is already running with key: {key}")]
    DuplicateProcessKey { key: String },

    #[error("a capture is already running")]
    CaptureInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
