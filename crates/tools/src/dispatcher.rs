use crate::registry::ToolRegistry;
use crate::traits::{Tool, ToolError, ToolResult};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

/// Upper bound on one tool call, launch included.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run `tool_name` with `args`. Every failure, including an unknown name,
    /// a panic or a timeout, comes back as [`ToolResult::Failure`].
    pub async fn dispatch(&self, tool_name: &str, args: serde_json::Value) -> ToolResult {
        info!("Dispatching tool: {}", tool_name);

        let result = match self.registry.get(tool_name) {
            Some(tool) => self.execute_with_protection(tool, args).await,
            None => Err(ToolError::UnknownTool(tool_name.to_string())),
        };

        if let Err(e) = &result {
            warn!("Tool {} failed: {}", tool_name, e);
        }
        result.into()
    }

    async fn execute_with_protection(
        &self,
        tool: Arc<dyn Tool>,
        args: serde_json::Value,
    ) -> Result<String, ToolError> {
        // Spawned so a panicking tool cannot take the server down.
        let handle = tokio::spawn(async move { tool.execute(args).await });

        match timeout(self.timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    error!("Tool execution panicked");
                } else {
                    error!("Tool execution cancelled");
                }
                Err(ToolError::Internal)
            }
            Err(_) => {
                warn!("Tool execution timed out after {:?}", self.timeout);
                Err(ToolError::Timeout)
            }
        }
    }
}
