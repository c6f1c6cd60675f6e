//! shell_tool - execute commands and return their output
//!
//! Commands run as a direct argv (no shell interpolation). A literal `>`
//! element in `args` redirects stdout to the file named by the following
//! element. Every invocation attempt is appended to the audit log, including
//! attempts where the binary could not be found or started.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::llm::ToolDescriptor;
use crate::tools::audit::{AuditLog, AuditRecord};
use crate::tools::traits::{optional_str_vec, required_str};
use crate::tools::{Tool, ToolError};

/// Exit code reported when the command binary does not exist
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Execute arbitrary commands under operator approval
pub struct ShellTool {
    audit: AuditLog,
}

impl ShellTool {
    pub fn new(audit: AuditLog) -> Self {
        Self { audit }
    }

    /// Run the command, normalizing every failure into the output triple
    async fn run(&self, command: &str, args: &[String], redirect_out: Option<&str>) -> (String, String, i32) {
        debug!(%command, arg_count = %args.len(), ?redirect_out, "ShellTool::run: called");

        if let Some(path) = redirect_out {
            let file = match std::fs::File::create(path) {
                Ok(f) => f,
                Err(e) => return (String::new(), format!("Cannot open {} for writing: {}", path, e), 1),
            };

            let spawned = Command::new(command)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::from(file))
                .stderr(Stdio::piped())
                .spawn();

            return match spawned {
                Ok(child) => match child.wait_with_output().await {
                    Ok(output) => (
                        format!("Redirected to file: {}", path),
                        String::from_utf8_lossy(&output.stderr).to_string(),
                        output.status.code().unwrap_or(-1),
                    ),
                    Err(e) => (String::new(), e.to_string(), 1),
                },
                Err(e) => spawn_failure(command, e),
            };
        }

        match Command::new(command).args(args).stdin(Stdio::null()).output().await {
            Ok(output) => (
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
                output.status.code().unwrap_or(-1),
            ),
            Err(e) => spawn_failure(command, e),
        }
    }
}

/// Map a spawn error to the conventional (stdout, stderr, returncode) triple
fn spawn_failure(command: &str, e: std::io::Error) -> (String, String, i32) {
    if e.kind() == std::io::ErrorKind::NotFound {
        (
            String::new(),
            format!("Command not found: {}", command),
            EXIT_COMMAND_NOT_FOUND,
        )
    } else {
        (String::new(), e.to_string(), 1)
    }
}

/// Split a trailing `> file` redirection out of the argument list
fn split_redirect(args: Vec<String>) -> Result<(Vec<String>, Option<String>), ToolError> {
    match args.iter().position(|a| a == ">") {
        None => Ok((args, None)),
        Some(idx) => {
            let target = args
                .get(idx + 1)
                .cloned()
                .ok_or_else(|| ToolError::InvalidArgument("`>` must be followed by an output file".to_string()))?;
            Ok((args[..idx].to_vec(), Some(target)))
        }
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "shell_tool",
            "Execute arbitrary shell commands and return the output",
            json!({
                "command": {
                    "type": "string",
                    "description": "Program to execute, such as `ls`"
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Arguments, one element each. Redirection `>` must be its own element followed by the output file, e.g. [\"foo\", \">\", \"foo.txt\"]"
                }
            }),
            &["command"],
        )
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value, ToolError> {
        let command = required_str(&args, "command")?;
        let argv = optional_str_vec(&args, "args")?;
        let (argv, redirect_out) = split_redirect(argv)?;

        let (stdout, stderr, returncode) = self.run(command, &argv, redirect_out.as_deref()).await;

        // Audit the attempt whether or not the command ran
        let record = AuditRecord::new(command, argv, stdout.as_str(), stderr.as_str(), returncode);
        self.audit.append(&record)?;

        Ok(json!({
            "stdout": stdout,
            "stderr": stderr,
            "returncode": returncode,
        }))
    }
}
