//! `ariadne serve` - run the MCP server for one database.
//!
//! HTTP is the default transport; `--transport stdio` speaks newline-delimited
//! JSON-RPC on stdin/stdout. SIGINT or SIGTERM stops accepting work, cancels
//! in-flight calls and returns once the transport has drained.

use super::{build_dispatcher, cancel_on_signal};
use anyhow::{Context, Result};
use ariadne_core::{AriadneConfig, Transport};
use ariadne_mcp::McpServer;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub fn apply_listener_overrides(
    config: &mut AriadneConfig,
    transport: Option<Transport>,
    host: Option<String>,
    port: Option<u16>,
) {
    if let Some(transport) = transport {
        config.mcp.transport = transport;
    }
    if let Some(host) = host {
        config.mcp.host = host;
    }
    if port.is_some() {
        config.mcp.port = port;
    }
}

pub async fn run(config: AriadneConfig) -> Result<()> {
    let dispatcher = build_dispatcher(&config).await?;
    info!(
        database = %config.database,
        endpoint = config.endpoint(),
        schema = ?config.store.schema,
        tools = dispatcher.tools().len(),
        "Starting Ariadne"
    );

    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone());

    let server = McpServer::new(dispatcher)
        .with_config(config.mcp.clone())
        .with_timeout(config.timeout())
        .with_shutdown(shutdown);

    server.run().await.context("MCP server failed")?;
    info!("Ariadne stopped");
    Ok(())
}
