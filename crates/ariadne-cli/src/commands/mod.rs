//! CLI command implementations for the Ariadne MCP servers.

pub mod call;
pub mod schema;
pub mod serve;
pub mod tools;

use anyhow::{Context, Result, bail};
use ariadne_core::{AriadneConfig, Database, SchemaRegistry, SchemaSource};
use ariadne_mcp::{Dispatcher, QueryExecutor};
use ariadne_ovsdb::{Endpoint, OvsdbConnector, StoreConnector};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Flags shared by every command that talks to a store.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// YAML configuration file. Flags override its values.
    #[arg(short, long, env = "ARIADNE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database: vswitch, ovn-nb, ovn-sb, ovn-ic-nb or ovn-ic-sb.
    #[arg(long, env = "ARIADNE_DATABASE")]
    pub database: Option<Database>,

    /// OVSDB endpoint, unix:<path> or tcp:<host>:<port>.
    #[arg(long, env = "ARIADNE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Upper bound on one tool call, in seconds.
    #[arg(long, env = "ARIADNE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Read table descriptors from an .ovsschema file.
    #[arg(long, env = "ARIADNE_SCHEMA_FILE", conflicts_with = "schema_from_server")]
    pub schema_file: Option<PathBuf>,

    /// Fetch table descriptors from the server at startup.
    #[arg(long, default_value_t = false)]
    pub schema_from_server: bool,
}

impl StoreArgs {
    /// Load the config file (if any) and apply flag overrides.
    pub fn load(&self) -> Result<AriadneConfig> {
        let mut config = match &self.config {
            Some(path) => AriadneConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => AriadneConfig::default(),
        };
        self.apply(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn apply(&self, config: &mut AriadneConfig) {
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(endpoint) = &self.endpoint {
            config.store.endpoint = Some(endpoint.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.store.timeout_seconds = secs;
        }
        if let Some(path) = &self.schema_file {
            config.store.schema = SchemaSource::File;
            config.store.schema_file = Some(path.clone());
        }
        if self.schema_from_server {
            config.store.schema = SchemaSource::Server;
        }
    }
}

pub fn endpoint(config: &AriadneConfig) -> Result<Endpoint> {
    config
        .endpoint()
        .parse()
        .with_context(|| format!("Invalid OVSDB endpoint '{}'", config.endpoint()))
}

/// Build the Schema Registry from the configured source.
pub async fn load_registry(config: &AriadneConfig, connector: &dyn StoreConnector) -> Result<SchemaRegistry> {
    let database = config.database;
    match config.store.schema {
        SchemaSource::Builtin => Ok(SchemaRegistry::builtin(database)),
        SchemaSource::File => {
            let Some(path) = &config.store.schema_file else {
                bail!("store.schema_file is required when store.schema is 'file'");
            };
            SchemaRegistry::from_ovsschema_file(database, path)
                .with_context(|| format!("Failed to load schema from {}", path.display()))
        }
        SchemaSource::Server => {
            let endpoint = endpoint(config)?;
            let document = tokio::time::timeout(config.timeout(), async {
                let mut session = connector.connect(&endpoint).await?;
                let document = session.get_schema(database.db_name()).await;
                if let Err(e) = session.close().await {
                    tracing::debug!(error = %e, "failed to close schema session");
                }
                document
            })
            .await
            .with_context(|| format!("Timed out fetching schema from {endpoint}"))?
            .with_context(|| format!("Failed to fetch schema from {endpoint}"))?;

            SchemaRegistry::from_ovsschema(database, &document)
                .context("Server returned an unusable schema")
        }
    }
}

pub async fn open_registry(config: &AriadneConfig) -> Result<SchemaRegistry> {
    load_registry(config, &OvsdbConnector::new()).await
}

/// Wire the registry, executor and tool catalog for the configured database.
pub async fn build_dispatcher(config: &AriadneConfig) -> Result<Arc<Dispatcher>> {
    let connector = Arc::new(OvsdbConnector::new());
    let registry = Arc::new(load_registry(config, connector.as_ref()).await?);
    let executor = QueryExecutor::new(connector, endpoint(config)?, config.database);
    let dispatcher = Dispatcher::new(registry, executor)
        .with_context(|| format!("Tool catalog does not match the {} schema", config.database))?;
    Ok(Arc::new(dispatcher))
}

/// Cancel `token` on SIGINT or SIGTERM.
pub fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received");
        token.cancel();
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
