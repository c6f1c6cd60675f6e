//! Tool registry - explicit, compile-time set of capabilities
//!
//! The registry owns exactly one stateful instance per tool name for the
//! session's lifetime. The builtin set is closed: there is no runtime
//! discovery, so the tool list is statically verifiable.

use std::collections::HashMap;

use tracing::debug;

use super::audit::AuditLog;
use super::builtin::{CaptureTool, DaemonTool, ShellTool};
use super::{Tool, ToolError};
use crate::config::Config;
use crate::llm::ToolDescriptor;

/// Owns every tool instance and the descriptor list shown to the model
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create the registry with the standard builtin tools
    pub fn standard(config: &Config) -> Result<Self, ToolError> {
        debug!("ToolRegistry::standard: called");
        let mut registry = Self::empty();

        registry.register(Box::new(ShellTool::new(AuditLog::new(&config.audit.log_path))))?;
        registry.register(Box::new(DaemonTool::new()))?;
        registry.register(Box::new(CaptureTool::new()))?;

        Ok(registry)
    }

    /// Create an empty registry (for tests)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Register a tool, rejecting duplicate names
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.descriptor().name;
        debug!(%name, "ToolRegistry::register: called");
        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateToolName { name });
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Descriptor list for the model, sorted by name for a stable wire body
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> = self.tools.values().map(|t| t.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Exact-match lookup of a live tool instance
    pub fn resolve(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Check whether a name is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}
