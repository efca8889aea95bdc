use async_trait::async_trait;
use opendesk_core::{Browser, OpenerConfig, Platform};
use opendesk_executor::mock::MockRunner;
use opendesk_executor::CommandSpec;
use opendesk_opener::Opener;
use opendesk_tools::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

struct PanicTool;

#[async_trait]
impl Tool for PanicTool {
    fn name(&self) -> &str {
        "panic"
    }

    fn description(&self) -> &str {
        "always panics"
    }

    fn schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(&self, _args: Value) -> Result<String, ToolError> {
        panic!("tool blew up");
    }
}

struct SlowTool;

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        "slow"
    }

    fn description(&self) -> &str {
        "never finishes in time"
    }

    fn schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(&self, _args: Value) -> Result<String, ToolError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok("late".into())
    }
}

fn dispatcher_for(runner: Arc<MockRunner>, platform: Platform, config: OpenerConfig) -> ToolDispatcher {
    let opener = Arc::new(Opener::new(config, runner).with_platform(platform));
    let mut registry = ToolRegistry::new();
    for tool in open_tools(opener) {
        registry.register(tool);
    }
    ToolDispatcher::new(Arc::new(registry))
}

#[tokio::test]
async fn test_open_tools_listed_in_order() {
    let dispatcher = dispatcher_for(Arc::new(MockRunner::new()), Platform::Linux, OpenerConfig::default());
    assert_eq!(
        dispatcher.registry().list(),
        vec!["open_folder", "open_file", "open_browser"]
    );

    for schema in dispatcher.registry().schemas() {
        let input = &schema["inputSchema"];
        assert_eq!(input["type"], "object");
        let required = input["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        let key = required[0].as_str().unwrap();
        assert_eq!(input["properties"][key]["type"], "string");
    }
}

#[tokio::test]
async fn test_missing_argument_is_failure() {
    let dispatcher = dispatcher_for(Arc::new(MockRunner::new()), Platform::Linux, OpenerConfig::default());

    let result = dispatcher.dispatch("open_folder", json!({})).await;
    assert_eq!(result, ToolResult::failure("Missing required parameter: path"));

    let result = dispatcher.dispatch("open_browser", json!({"url": 42})).await;
    assert_eq!(result, ToolResult::failure("Missing required parameter: url"));
}

#[tokio::test]
async fn test_unknown_tool_is_failure() {
    let dispatcher = dispatcher_for(Arc::new(MockRunner::new()), Platform::Linux, OpenerConfig::default());
    let result = dispatcher.dispatch("open_app", json!({"path": "/"})).await;
    assert!(result.is_error());
    assert_eq!(result.message(), "Unknown tool: open_app");
}

#[tokio::test]
async fn test_engine_error_text_is_reported() {
    let dispatcher = dispatcher_for(Arc::new(MockRunner::new()), Platform::Linux, OpenerConfig::default());
    let result = dispatcher
        .dispatch("open_folder", json!({"path": "/nonexistent"}))
        .await;
    assert_eq!(result, ToolResult::failure("Path does not exist: /nonexistent"));
}

#[tokio::test]
async fn test_open_file_success() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "hello").unwrap();
    let path = file.to_str().unwrap().to_string();

    let runner = Arc::new(MockRunner::new());
    let dispatcher = dispatcher_for(runner.clone(), Platform::Linux, OpenerConfig::default());

    let result = dispatcher.dispatch("open_file", json!({"path": path})).await;
    assert_eq!(
        result,
        ToolResult::success(format!("Opened file with default application: {}", path))
    );
    assert_eq!(runner.launches()[0].spec, CommandSpec::new("xdg-open").arg(path));
}

#[tokio::test]
async fn test_open_browser_success() {
    let runner = Arc::new(MockRunner::new());
    let config = OpenerConfig {
        preferred_browser: Browser::Chrome,
        ..OpenerConfig::default()
    };
    let dispatcher = dispatcher_for(runner, Platform::Win32, config);

    let result = dispatcher
        .dispatch("open_browser", json!({"url": "https://example.com/"}))
        .await;
    assert_eq!(
        result,
        ToolResult::success("Opened https://example.com/ in Google Chrome")
    );
}

#[tokio::test]
async fn test_panic_is_isolated() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(PanicTool));
    let dispatcher = ToolDispatcher::new(Arc::new(registry));

    let result = dispatcher.dispatch("panic", json!({})).await;
    assert_eq!(result, ToolResult::failure("Internal error"));
}

#[tokio::test]
async fn test_timeout_is_failure() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SlowTool));
    let dispatcher =
        ToolDispatcher::new(Arc::new(registry)).with_timeout(Duration::from_millis(50));

    let result = dispatcher.dispatch("slow", json!({})).await;
    assert_eq!(result, ToolResult::failure("Tool execution timed out"));
}
