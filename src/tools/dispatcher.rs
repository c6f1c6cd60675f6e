//! Dispatcher - turns one tool call into one result, uniformly
//!
//! Every failure mode (malformed arguments, unknown name, operator decline,
//! execution failure) becomes a structured `DispatchResult`. The dispatcher
//! never raises: a tool failure ends as a tool message, not as the end of
//! the session.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::ToolRegistry;
use crate::approval::ApprovalPort;
use crate::llm::ToolCallRequest;

/// Outcome of one dispatched tool call
///
/// Serializes as the payload of the tool-role message: either the tool's
/// own JSON result, or a tagged error object.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DispatchResult {
    Success(Value),
    Error(DispatchError),
}

impl DispatchResult {
    pub fn is_error(&self) -> bool {
        matches!(self, DispatchResult::Error(_))
    }

    /// Render as the content of a tool-role message: `{"result": ...}`
    pub fn to_content(&self) -> String {
        let payload = serde_json::to_value(self).unwrap_or_else(|_| Value::String("unserializable result".to_string()));
        serde_json::json!({ "result": payload }).to_string()
    }
}

impl From<DispatchError> for DispatchResult {
    fn from(error: DispatchError) -> Self {
        DispatchResult::Error(error)
    }
}

/// The recoverable failure taxonomy of a dispatch
///
/// All variants are surfaced to the model as tool results so it can adapt
/// its next proposal.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum DispatchError {
    #[error("invalid arguments for {tool}: {detail}")]
    ArgumentParse { tool: String, detail: String },

    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("tool {tool} failed: {detail}")]
    ExecutionFailed { tool: String, detail: String },

    #[error("user declined to execute tool: {tool}({arguments})")]
    UserDeclined { tool: String, arguments: Value },
}

/// Resolves tool calls against the registry under the approval gate
pub struct Dispatcher {
    registry: ToolRegistry,
    approval: Box<dyn ApprovalPort>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, approval: Box<dyn ApprovalPort>) -> Self {
        Self { registry, approval }
    }

    /// Descriptor list for the model request
    pub fn descriptors(&self) -> Vec<crate::llm::ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Resolve one tool call end to end
    ///
    /// Order matters: arguments are parsed and the name resolved before the
    /// operator is prompted, so nobody is asked to approve a call that
    /// cannot run.
    pub async fn dispatch(&mut self, call: &ToolCallRequest) -> DispatchResult {
        debug!(tool = %call.name, id = %call.id, "dispatch: called");

        let args = match serde_json::from_str::<Value>(&call.arguments) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                debug!(tool = %call.name, "dispatch: arguments not an object");
                return DispatchError::ArgumentParse {
                    tool: call.name.clone(),
                    detail: format!("expected a JSON object, got: {}", other),
                }
                .into();
            }
            Err(e) => {
                debug!(tool = %call.name, error = %e, "dispatch: argument parse failed");
                return DispatchError::ArgumentParse {
                    tool: call.name.clone(),
                    detail: e.to_string(),
                }
                .into();
            }
        };

        if !self.registry.has_tool(&call.name) {
            debug!(tool = %call.name, "dispatch: tool not found");
            return DispatchError::ToolNotFound { name: call.name.clone() }.into();
        }

        if !self.approval.confirm(&call.name, &args) {
            info!(tool = %call.name, "dispatch: user declined");
            return DispatchError::UserDeclined {
                tool: call.name.clone(),
                arguments: Value::Object(args),
            }
            .into();
        }

        match self.registry.resolve(&call.name) {
            Some(tool) => match tool.execute(args).await {
                Ok(payload) => DispatchResult::Success(payload),
                Err(e) => {
                    info!(tool = %call.name, error = %e, "dispatch: tool execution failed");
                    DispatchError::ExecutionFailed {
                        tool: call.name.clone(),
                        detail: e.to_string(),
                    }
                    .into()
                }
            },
            None => DispatchError::ToolNotFound { name: call.name.clone() }.into(),
        }
    }
}
