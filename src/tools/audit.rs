//! Audit log - append-only JSONL record of shell invocations
//!
//! One record is written per invocation attempt, whether or not the command
//! could be found or started. Records are line-delimited JSON and are never
//! rewritten.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ToolError;

/// One audit record, matching the executed attempt exactly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub command: String,
    pub args: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub returncode: i32,
}

impl AuditRecord {
    /// Create a record stamped with the current local time
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        returncode: i32,
    ) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            command: command.into(),
            args,
            stdout: stdout.into(),
            stderr: stderr.into(),
            returncode,
        }
    }
}

/// Append-only JSONL audit log
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(?path, "AuditLog::new: called");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a JSON line
    pub fn append(&self, record: &AuditRecord) -> Result<(), ToolError> {
        debug!(command = %record.command, returncode = %record.returncode, "AuditLog::append: called");

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
        writer.flush()?;

        Ok(())
    }

    /// Read every record back (for inspection and tests)
    pub fn read_all(&self) -> Result<Vec<AuditRecord>, ToolError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut records = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }

        Ok(records)
    }
}
