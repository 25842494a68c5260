//! Configuration types for Ariadne.
//!
//! A server is configured from a single YAML file. Every field has a default,
//! so an empty file (or no file at all) yields a working configuration for
//! the Open vSwitch database on its stock socket.
//!
//! ```yaml
//! database: ovn-sb
//! store:
//!   endpoint: unix:/var/run/ovn/ovnsb_db.sock
//!   timeout_seconds: 30
//!   schema: builtin          # builtin | server | file
//!   schema_file: null        # required when schema is "file"
//! mcp:
//!   transport: http          # http | stdio
//!   host: localhost
//!   port: 8082
//! log:
//!   level: info
//! ```

pub mod mcp;

use crate::database::Database;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use mcp::{McpConfig, Transport};

/// Longest accepted `store.timeout_seconds` (one day).
pub const MAX_TIMEOUT_SECONDS: u64 = 24 * 60 * 60;

/// Complete Ariadne configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AriadneConfig {
    /// Which database this server fronts.
    #[serde(default = "default_database")]
    pub database: Database,

    /// OVSDB connection settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AriadneConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            store: StoreConfig::default(),
            mcp: McpConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// OVSDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `unix:<path>` or `tcp:<host>:<port>`. Falls back to the database's
    /// default socket.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Upper bound on a single tool call's store round trips.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Where table descriptors come from.
    #[serde(default)]
    pub schema: SchemaSource,

    /// Path to an `.ovsschema` file when `schema` is `file`.
    #[serde(default)]
    pub schema_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: default_timeout_seconds(),
            schema: SchemaSource::default(),
            schema_file: None,
        }
    }
}

/// Source of the Schema Registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSource {
    /// Compiled-in descriptors.
    #[default]
    Builtin,
    /// Fetched once at startup with `get_schema`.
    Server,
    /// Parsed from `store.schema_file`.
    File,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AriadneConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "store.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.store.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::Config(format!(
                "store.timeout_seconds must be at most {MAX_TIMEOUT_SECONDS}"
            )));
        }
        if self.store.schema == SchemaSource::File && self.store.schema_file.is_none() {
            return Err(ConfigError::Config(
                "store.schema_file is required when store.schema is 'file'".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective OVSDB endpoint.
    pub fn endpoint(&self) -> &str {
        self.store
            .endpoint
            .as_deref()
            .unwrap_or_else(|| self.database.default_endpoint())
    }

    /// Effective HTTP port.
    pub fn port(&self) -> u16 {
        self.mcp.port.unwrap_or_else(|| self.database.default_port())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_seconds)
    }
}

fn default_database() -> Database {
    Database::Vswitch
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
