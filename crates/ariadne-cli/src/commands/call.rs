//! `ariadne call` - run one tool against the store and print the envelope.

use super::{build_dispatcher, cancel_on_signal};
use anyhow::{Context, Result};
use ariadne_core::AriadneConfig;
use ariadne_mcp::CallContext;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub async fn run(config: AriadneConfig, tool: &str, args: &str) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(args).with_context(|| format!("--args is not valid JSON: {args}"))?;
    let dispatcher = build_dispatcher(&config).await?;

    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone());
    let ctx = CallContext::child_of(&shutdown, config.timeout());

    let envelope = dispatcher
        .dispatch(tool, &arguments, &ctx)
        .await
        .with_context(|| format!("{tool} failed"))?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
