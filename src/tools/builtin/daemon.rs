//! daemon_tool - start and stop background processes by key
//!
//! Started processes run concurrently with the session and are tracked in a
//! map owned exclusively by this instance. `stop` terminates the process,
//! waits for it to exit, and reports its final output.

use std::collections::HashMap;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::request_termination;
use crate::llm::ToolDescriptor;
use crate::tools::traits::{optional_str_vec, required_str};
use crate::tools::{Tool, ToolError};

/// Start and stop long-running background processes
pub struct DaemonTool {
    processes: Mutex<HashMap<String, Child>>,
}

impl DaemonTool {
    pub fn new() -> Self {
        Self {
            processes: Mutex::new(HashMap::new()),
        }
    }

    async fn start(&self, key: &str, command: &str, args: &[String]) -> Result<Value, ToolError> {
        let mut processes = self.processes.lock().await;
        if processes.contains_key(key) {
            return Err(ToolError::DuplicateProcessKey { key: key.to_string() });
        }

        let child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolError::Spawn {
                command: command.to_string(),
                source: e,
            })?;

        info!(%key, %command, pid = ?child.id(), "DaemonTool::start: process started");
        processes.insert(key.to_string(), child);

        Ok(json!({ "status": "started", "process_key": key }))
    }

    async fn stop(&self, key: &str) -> Result<Value, ToolError> {
        let child = {
            let mut processes = self.processes.lock().await;
            processes
                .remove(key)
                .ok_or_else(|| ToolError::UnknownProcessKey { key: key.to_string() })?
        };

        request_termination(&child);
        let output = child.wait_with_output().await?;
        info!(%key, status = ?output.status, "DaemonTool::stop: process stopped");

        Ok(json!({
            "status": "stopped",
            "process_key": key,
            "stdout": String::from_utf8_lossy(&output.stdout),
            "stderr": String::from_utf8_lossy(&output.stderr),
        }))
    }
}

impl Default for DaemonTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DaemonTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "daemon_tool",
            "Start and stop processes in the background, such as a dev server or a latency measurement tool",
            json!({
                "action": {
                    "type": "string",
                    "description": "Either \"start\" or \"stop\""
                },
                "process_key": {
                    "type": "string",
                    "description": "Key used to manage the process across calls"
                },
                "command": {
                    "type": "string",
                    "description": "Program to start (required for action \"start\"), such as `python`"
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Arguments for the program, such as [\"flask_app.py\"]"
                }
            }),
            &["action", "process_key"],
        )
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value, ToolError> {
        let action = required_str(&args, "action")?;
        let process_key = required_str(&args, "process_key")?;
        debug!(%action, %process_key, "DaemonTool::execute: called");

        match action {
            "start" => {
                let command = required_str(&args, "command")?;
                let argv = optional_str_vec(&args, "args")?;
                self.start(process_key, command, &argv).await
            }
            "stop" => self.stop(process_key).await,
            other => Err(ToolError::InvalidArgument(format!(
                "invalid action: {}. Use \"start\" or \"stop\"",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_start_then_stop() {
        let tool = DaemonTool::new();

        let started = tool
            .execute(args(json!({
                "action": "start",
                "process_key": "k1",
                "command": "sleep",
                "args": ["1"]
            })))
            .await
            .unwrap();

        assert_eq!(started["status"], "started");
        assert_eq!(started["process_key"], "k1");

        let stopped = tool
            .execute(args(json!({"action": "stop", "process_key": "k1"})))
            .await
            .unwrap();

        assert_eq!(stopped["status"], "stopped");
        assert_eq!(stopped["process_key"], "k1");
        assert_eq!(stopped["stdout"], "");
        assert_eq!(stopped["stderr"], "");
    }

    #[tokio::test]
    async fn test_stop_captures_final_output() {
        let tool = DaemonTool::new();

        tool.execute(args(json!({
            "action": "start",
            "process_key": "echoer",
            "command": "echo",
            "args": ["background output"]
        })))
        .await
        .unwrap();

        // echo exits on its own; stop still collects what it printed
        let stopped = tool
            .execute(args(json!({"action": "stop", "process_key": "echoer"})))
            .await
            .unwrap();

        assert_eq!(stopped["status"], "stopped");
        assert!(stopped["stdout"].as_str().unwrap().contains("background output"));
    }

    #[tokio::test]
    async fn test_stop_unknown_key_is_structured_error() {
        let tool = DaemonTool::new();

        let err = tool
            .execute(args(json!({"action": "stop", "process_key": "unknown"})))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::UnknownProcessKey { key } if key == "unknown"));
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let tool = DaemonTool::new();

        tool.execute(args(json!({
            "action": "start",
            "process_key": "k1",
            "command": "sleep",
            "args": ["5"]
        })))
        .await
        .unwrap();

        let err = tool
            .execute(args(json!({
                "action": "start",
                "process_key": "k1",
                "command": "sleep",
                "args": ["5"]
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::DuplicateProcessKey { .. }));

        // Cleanup
        tool.execute(args(json!({"action": "stop", "process_key": "k1"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_action() {
        let tool = DaemonTool::new();

        let err = tool
            .execute(args(json!({"action": "restart", "process_key": "k1"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("restart"));
    }

    #[tokio::test]
    async fn test_start_missing_command() {
        let tool = DaemonTool::new();

        let err = tool
            .execute(args(json!({"action": "start", "process_key": "k1"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("command is required"));
    }
}
