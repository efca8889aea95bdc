//! MCP server over newline-delimited JSON-RPC. Requests are handled one at a
//! time, in arrival order.

use crate::protocol::*;
use anyhow::Result;
use opendesk_opener::Opener;
use opendesk_tools::{open_tools, ToolDispatcher, ToolRegistry};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "opendesk";

pub struct McpServer {
    opener: Arc<Opener>,
    dispatcher: ToolDispatcher,
    initialized: bool,
}

impl McpServer {
    pub fn new(opener: Arc<Opener>) -> Self {
        let mut registry = ToolRegistry::new();
        for tool in open_tools(opener.clone()) {
            registry.register(tool);
        }
        Self::with_dispatcher(opener, ToolDispatcher::new(Arc::new(registry)))
    }

    pub fn with_dispatcher(opener: Arc<Opener>, dispatcher: ToolDispatcher) -> Self {
        Self {
            opener,
            dispatcher,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve until `reader` hits EOF, then wait for pending temp-copy
    /// cleanups so nothing is left behind.
    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.run_until(reader, writer, std::future::pending::<()>())
            .await
    }

    /// Like `run`, but stop as soon as `shutdown` resolves. Temp copies still
    /// waiting out their delay are then removed immediately.
    pub async fn run_until<R, W, S>(&mut self, reader: R, writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        info!("MCP server listening on stdio");
        let opener = self.opener.clone();

        tokio::select! {
            result = self.serve(reader, writer) => {
                info!("stdin closed, shutting down");
                opener.cleanup().drain().await;
                result
            }
            _ = shutdown => {
                info!("Interrupted, removing temp copies");
                opener.cleanup().remove_now().await;
                Ok(())
            }
        }
    }

    async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut frame = serde_json::to_string(&response)?;
                frame.push('\n');
                writer.write_all(frame.as_bytes()).await?;
                writer.flush().await?;
            }
        }
    }

    /// Parse and handle one raw line. `None` means nothing is written back.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let frame = match serde_json::from_str::<Value>(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Unparseable request: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = frame.get("id").filter(|id| !id.is_null()).cloned();
        if let Some(reason) = invalid_request_reason(&frame) {
            warn!("Invalid request: {}", reason);
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Invalid Request: {}", reason),
            ));
        }

        match serde_json::from_value::<JsonRpcRequest>(frame) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Invalid request: {}", e);
                Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                ))
            }
        }
    }

    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Received {}", request.method);

        if request.is_notification() {
            if request.method == "initialize" {
                self.initialized = true;
            }
            return None;
        }

        let id = request.id;
        if !self.initialized && request.method != "initialize" && request.method != "ping" {
            return Some(JsonRpcResponse::error(
                id,
                SERVER_NOT_INITIALIZED,
                "Server not initialized",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => {
                self.handle_tools_call(request.params.unwrap_or_else(|| json!({})), id)
                    .await
            }
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&mut self, id: Option<Value>) -> JsonRpcResponse {
        self.initialized = true;
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.dispatcher.registry().schemas() }))
    }

    async fn handle_tools_call(&self, params: Value, id: Option<Value>) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Invalid params: missing tool name");
        };
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let result = self.dispatcher.dispatch(name, arguments).await;
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": result.message()
                }],
                "isError": result.is_error()
            }),
        )
    }
}
