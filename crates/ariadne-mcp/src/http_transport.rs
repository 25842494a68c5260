//! HTTP transport for MCP server.
//!
//! JSON-RPC messages are POSTed to `/` or `/mcp`. A dropped client
//! connection drops the handler future, which cancels the store round trip
//! and releases its connection.

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use crate::server::McpServer;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Header carrying the session id handed out on `initialize`.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Create the HTTP router for MCP.
pub fn create_router(server: McpServer) -> Router {
    Router::new()
        .route("/", post(handle_mcp_post))
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Handle POST requests (JSON-RPC over HTTP).
async fn handle_mcp_post(State(server): State<McpServer>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"))),
            )
                .into_response();
        }
    };

    let initialize = request.method == "initialize";
    let Some(response) = server.handle_request(request).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let mut response = Json(response).into_response();
    if initialize {
        let session = uuid::Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&session) {
            response.headers_mut().insert(SESSION_HEADER, value);
        }
    }
    response
}

/// Handle health check requests.
async fn handle_health(State(server): State<McpServer>) -> impl IntoResponse {
    let database = server.database();
    Json(serde_json::json!({
        "status": "ok",
        "service": database.server_name(),
        "database": database.slug(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    server: McpServer,
    host: String,
    port: u16,
}

impl HttpServer {
    pub fn new(server: McpServer, host: impl Into<String>, port: u16) -> Self {
        Self {
            server,
            host: host.into(),
            port,
        }
    }

    /// Serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), McpError> {
        let app = create_router(self.server);

        let listener = tokio::net::TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}:{}: {}", self.host, self.port, e))
            })?;

        tracing::info!(host = %self.host, port = self.port, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("MCP HTTP server stopped");
        Ok(())
    }
}
