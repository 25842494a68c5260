//! MCP server implementation.
//!
//! Speaks JSON-RPC 2.0 over stdio or HTTP and routes `tools/call` to the
//! [`Dispatcher`]. Each request runs as its own task under a cancellation
//! token derived from the server's shutdown token.

use crate::context::CallContext;
use crate::dispatcher::Dispatcher;
use crate::error::{McpError, QueryError};
use crate::http_transport::HttpServer;
use crate::protocol::*;
use ariadne_core::config::mcp::{McpConfig, Transport};
use ariadne_core::Database;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The MCP server. Cheap to clone: every clone shares the dispatcher and
/// the shutdown token.
#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    config: McpConfig,
    port: u16,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let port = dispatcher.database().default_port();
        Self {
            dispatcher,
            config: McpConfig::default(),
            port,
            timeout: DEFAULT_TIMEOUT,
            shutdown: CancellationToken::new(),
        }
    }

    /// Transport and bind address. An explicit port in `config` replaces the
    /// database default.
    pub fn with_config(mut self, config: McpConfig) -> Self {
        if let Some(port) = config.port {
            self.port = port;
        }
        self.config = config;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Deadline for a whole tool call, both lookups included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stop serving and cancel in-flight calls when `token` is cancelled.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn database(&self) -> Database {
        self.dispatcher.database()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Start the MCP server.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Newline-delimited JSON-RPC on stdin/stdout. Requests are handled
    /// concurrently; a single writer task keeps responses whole.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(database = %self.database(), "Starting MCP server with stdio transport");

        let (response_tx, mut response_rx) = mpsc::channel::<JsonRpcResponse>(100);
        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(response) = response_rx.recv().await {
                let mut line = match serde_json::to_vec(&response) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to serialize response");
                        continue;
                    }
                };
                line.push(b'\n');
                if stdout.write_all(&line).await.is_err() || stdout.flush().await.is_err() {
                    break;
                }
            }
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(line) {
                Ok(request) => request,
                Err(e) => {
                    let response = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                    if response_tx.send(response).await.is_err() {
                        break;
                    }
                    continue;
                }
            };

            let server = self.clone();
            let response_tx = response_tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_request(request).await {
                    let _ = response_tx.send(response).await;
                }
            });
        }

        drop(response_tx);
        writer
            .await
            .map_err(|e| McpError::TransportError(format!("stdout writer failed: {e}")))?;
        tracing::info!("stdio transport closed");
        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        tracing::info!(
            database = %self.database(),
            host = %self.config.host,
            port = self.port,
            "Starting MCP server with HTTP transport"
        );
        HttpServer::new(self.clone(), self.config.host.clone(), self.port)
            .run(self.shutdown.clone())
            .await
    }

    /// Handle a JSON-RPC message. Notifications get no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        }
        let id = request.id.clone();

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params.as_ref()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<&Value>) -> JsonRpcResponse {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = requested
            .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
            .copied()
            .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);

        let database = self.database();
        tracing::info!(
            requested = requested.unwrap_or_default(),
            negotiated = version,
            "client initialized"
        );
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": version,
                "serverInfo": {
                    "name": database.server_name(),
                    "title": database.server_title(),
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {
                        "listChanged": false
                    }
                }
            }),
        )
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = self.dispatcher.tools().definitions();
        match serde_json::to_value(tools) {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"));
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let ctx = CallContext::child_of(&self.shutdown, self.timeout);
        let outcome = self
            .dispatcher
            .dispatch(&params.name, &params.arguments, &ctx)
            .await;

        let response = match outcome {
            Ok(envelope) => CallToolResponse::structured(envelope.to_value()),
            Err(e) if e.is_caller_error() => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string());
            }
            Err(e) => {
                log_failure(&params.name, &e);
                CallToolResponse::failure(e.to_string())
            }
        };

        match serde_json::to_value(response) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }
}

fn log_failure(tool: &str, err: &QueryError) {
    match err {
        QueryError::Cancelled => tracing::debug!(tool, "tool call cancelled"),
        _ => tracing::warn!(tool, error = %err, "tool call failed"),
    }
}
