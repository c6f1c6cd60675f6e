//! Model service error types

use thiserror::Error;

/// Errors talking to the model service
///
/// None of these are recovered by the session: a failed completion request
/// ends the session with a diagnostic. Per-tool failures never surface here;
/// they are normalized into tool results by the dispatcher.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not found. Set the {var} environment variable.")]
    MissingApiKey { var: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_names_variable() {
        let err = LlmError::MissingApiKey {
            var: "OPENAI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_api_error_message() {
        let err = LlmError::ApiError {
            status: 401,
            message: "invalid key".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid key"));
    }
}
