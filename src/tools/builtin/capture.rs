//! capture_tool - packet capture control via tshark
//!
//! One live capture at a time: `start_capture` spawns tshark writing to a
//! capture file, `stop_capture` terminates it and reports its output, and
//! `analyze_capture` reads a capture file back with an optional display
//! filter.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::request_termination;
use crate::llm::ToolDescriptor;
use crate::tools::traits::required_str;
use crate::tools::{Tool, ToolError};

/// Start, stop, and analyze packet captures
pub struct CaptureTool {
    capture: Mutex<Option<Child>>,
}

impl CaptureTool {
    pub fn new() -> Self {
        Self {
            capture: Mutex::new(None),
        }
    }

    async fn start_capture(&self, interface: &str, capture_file: &str) -> Result<Value, ToolError> {
        let mut capture = self.capture.lock().await;
        if capture.is_some() {
            return Err(ToolError::CaptureInProgress);
        }

        let child = Command::new("tshark")
            .args(["-i", interface, "-w", capture_file])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolError::Spawn {
                command: "tshark".to_string(),
                source: e,
            })?;

        info!(%interface, %capture_file, pid = ?child.id(), "CaptureTool::start_capture: capture started");
        *capture = Some(child);

        Ok(json!({
            "status": "capture started",
            "interface": interface,
            "capture_file": capture_file,
        }))
    }

    async fn stop_capture(&self) -> Result<Value, ToolError> {
        let child = self.capture.lock().await.take();

        // Stopping nothing is an answer, not a failure
        let Some(child) = child else {
            debug!("CaptureTool::stop_capture: no capture running");
            return Ok(json!({ "status": "no capture running" }));
        };

        request_termination(&child);
        let output = child.wait_with_output().await?;
        info!(status = ?output.status, "CaptureTool::stop_capture: capture stopped");

        Ok(json!({
            "status": "capture stopped",
            "stdout": String::from_utf8_lossy(&output.stdout),
            "stderr": String::from_utf8_lossy(&output.stderr),
        }))
    }

    async fn analyze_capture(&self, capture_file: &str, display_filter: &str) -> Result<Value, ToolError> {
        let output = Command::new("tshark")
            .args(["-r", capture_file, "-Y", display_filter])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                command: "tshark".to_string(),
                source: e,
            })?;

        Ok(json!({
            "status": "analysis complete",
            "packets": String::from_utf8_lossy(&output.stdout),
        }))
    }
}

impl Default for CaptureTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CaptureTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "capture_tool",
            "Start and stop capturing packets and analyze captured packets with tshark",
            json!({
                "action": {
                    "type": "string",
                    "description": "One of start_capture, stop_capture, analyze_capture"
                },
                "interface": {
                    "type": "string",
                    "description": "Interface to capture packets on (for start_capture)"
                },
                "capture_file": {
                    "type": "string",
                    "description": "File path for captured packets"
                },
                "display_filter": {
                    "type": "string",
                    "description": "Wireshark display filter applied by analyze_capture"
                }
            }),
            &["action"],
        )
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value, ToolError> {
        let action = required_str(&args, "action")?;
        debug!(%action, "CaptureTool::execute: called");

        match action {
            "start_capture" => {
                let interface = required_str(&args, "interface")?;
                let capture_file = required_str(&args, "capture_file")?;
                self.start_capture(interface, capture_file).await
            }
            "stop_capture" => self.stop_capture().await,
            "analyze_capture" => {
                let capture_file = required_str(&args, "capture_file")?;
                let display_filter = args.get("display_filter").and_then(Value::as_str).unwrap_or("");
                self.analyze_capture(capture_file, display_filter).await
            }
            other => Err(ToolError::InvalidArgument(format!(
                "invalid action: {}. Use start_capture, stop_capture, or analyze_capture",
                other
            ))),
        }
    }
}
