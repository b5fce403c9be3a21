//! Error types for the Goalrunner domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Goalrunner operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Decision engine errors ---
    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Cancellation ---
    #[error("Run cancelled by caller")]
    Cancelled,

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Duplicate tool name: {0}")]
    Duplicate(String),

    #[error("Invalid parameters for {tool_name}: missing {missing:?}, unexpected {extra:?}")]
    InvalidParameters {
        tool_name: String,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

/// Failures of the external decision-making service.
///
/// These are the only errors that can terminate a run from inside the loop,
/// and only after the orchestrator has retried the call once.
#[derive(Debug, Clone, Error)]
pub enum DecisionError {
    #[error("Malformed decision: {0}")]
    Malformed(String),

    #[error("Decision engine failed: {0}")]
    Engine(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::InvalidParameters {
            tool_name: "divide".into(),
            missing: vec!["b".into()],
            extra: vec!["c".into()],
        });
        assert!(err.to_string().contains("divide"));
        assert!(err.to_string().contains("\"b\""));
        assert!(err.to_string().contains("\"c\""));
    }

    #[test]
    fn decision_error_displays_correctly() {
        let err = Error::Decision(DecisionError::Malformed("not a JSON object".into()));
        assert!(err.to_string().contains("Malformed"));
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn duplicate_tool_names_the_offender() {
        let err = ToolError::Duplicate("add".into());
        assert!(err.to_string().contains("add"));
    }
}
