//! MCP protocol server: JSON-RPC 2.0 over stdio, one request per line.
//!
//! Each tool call runs as an independent invocation against the shared
//! read-only engine; a failing invocation is reported as a JSON-RPC error
//! for that call only and affects nothing else in flight.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::engine::LinearbEngine;
use crate::error::ToolError;
use crate::tool_handlers::ToolRegistry;
use crate::tool_metadata::TOOL_METADATA;

/// MCP protocol version
const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "linearb-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.to_string(),
                data: None,
            }),
        }
    }
}

pub struct McpServer {
    engine: Arc<LinearbEngine>,
    tool_registry: ToolRegistry,
}

impl McpServer {
    pub fn new(engine: Arc<LinearbEngine>) -> Self {
        Self {
            engine,
            tool_registry: ToolRegistry::new(),
        }
    }

    /// Serve line-delimited JSON-RPC on stdio until EOF.
    pub async fn run(&self) -> Result<()> {
        info!("MCP server starting on stdio");

        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = tokio::io::BufReader::new(stdin);
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!("Received: {}", trimmed);

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => {
                    // JSON-RPC 2.0: a request without an id is a
                    // notification and must not be answered.
                    if request.id.is_none() {
                        debug!("Handling notification: {}", request.method);
                        let _ = self.handle_request(request).await;
                        continue;
                    }
                    self.handle_request(request).await
                }
                Err(e) => {
                    // Parse error: answer only when the raw JSON carries a
                    // usable id; otherwise stay silent.
                    if let Ok(raw) = serde_json::from_str::<Value>(trimmed) {
                        match raw.get("id").cloned() {
                            Some(id) if !id.is_null() => JsonRpcResponse::error(
                                Some(id),
                                -32700,
                                &format!("Parse error: {}", e),
                            ),
                            _ => {
                                debug!("Parse error without usable id, not responding: {}", e);
                                continue;
                            }
                        }
                    } else {
                        debug!("Complete parse error, not responding: {}", e);
                        continue;
                    }
                }
            };

            let response_str = serde_json::to_string(&response)? + "\n";
            debug!("Sending: {}", response_str.trim());
            stdout.write_all(response_str.as_bytes()).await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            // MCP lifecycle
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => JsonRpcResponse::success(id, json!({})),

            // Tool listing and execution
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params).await,

            // No resources or prompts are served; answer the standard
            // probes with empty lists.
            "resources/list" => JsonRpcResponse::success(id, json!({"resources": []})),
            "prompts/list" => JsonRpcResponse::success(id, json!({"prompts": []})),

            _ => {
                JsonRpcResponse::error(id, -32601, &format!("Method not found: {}", request.method))
            }
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        if let Some(name) = params.pointer("/clientInfo/name").and_then(Value::as_str) {
            let version = params.pointer("/clientInfo/version").and_then(Value::as_str);
            info!("MCP client detected: {} {:?}", name, version);
        }

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": MCP_VERSION,
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                },
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let mut metadata: Vec<_> = TOOL_METADATA.values().collect();
        metadata.sort_by_key(|meta| meta.name);

        let tools: Vec<Value> = metadata
            .iter()
            .map(|meta| {
                json!({
                    "name": meta.name,
                    "description": meta.description,
                    "inputSchema": meta.input_schema,
                })
            })
            .collect();

        info!("Returning {} tools", tools.len());

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tool_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let start_time = std::time::Instant::now();
        let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result: Result<String> = self
            .tool_registry
            .dispatch(tool_name, &self.engine, arguments)
            .await;

        let elapsed = start_time.elapsed();
        tracing::info!(
            tool = tool_name,
            duration_ms = elapsed.as_millis(),
            success = result.is_ok(),
            "Tool execution completed"
        );

        match result {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": content
                    }]
                }),
            ),
            Err(e) => {
                let code = match e.downcast_ref::<ToolError>() {
                    Some(ToolError::InvalidArgument(_)) => -32602,
                    _ => -32000,
                };
                JsonRpcResponse::error(id, code, &e.to_string())
            }
        }
    }
}
