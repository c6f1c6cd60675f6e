//! Tool trait definition

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ToolError;
use crate::llm::ToolDescriptor;

/// A capability the model can invoke by structured request
///
/// Implementations may be stateful (a map of running processes, a live
/// capture handle); state lives behind interior mutability because the
/// registry owns every instance behind a shared reference. Expected
/// failures are returned as `ToolError`, never panics - the dispatcher
/// converts them into results the model can read.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static metadata exposed to the model
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute with parsed arguments, returning a JSON payload
    async fn execute(&self, args: Map<String, Value>) -> Result<Value, ToolError>;
}

/// Fetch a required string argument
pub(crate) fn required_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidArgument(format!("{} is required", key)))
}

/// Fetch an optional array-of-strings argument (missing means empty)
pub(crate) fn optional_str_vec(args: &Map<String, Value>, key: &str) -> Result<Vec<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::InvalidArgument(format!("{} must be an array of strings", key)))
            })
            .collect(),
        Some(_) => Err(ToolError::InvalidArgument(format!(
            "{} must be an array of strings",
            key
        ))),
    }
}
