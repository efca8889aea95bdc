use async_trait::async_trait;
use opendesk_core::OpenError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Open(#[from] OpenError),
    #[error("Tool execution timed out")]
    Timeout,
    #[error("Internal error")]
    Internal,
}

/// Outcome of a tool call as reported to the client. Exactly one message,
/// success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success { message: String },
    Failure { message: String },
}

impl ToolResult {
    pub fn success(message: impl Into<String>) -> Self {
        ToolResult::Success {
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ToolResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Failure { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ToolResult::Success { message } | ToolResult::Failure { message } => message,
        }
    }
}

impl From<Result<String, ToolError>> for ToolResult {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(message) => ToolResult::success(message),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the `arguments` object.
    fn schema(&self) -> serde_json::Value;

    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError>;
}
