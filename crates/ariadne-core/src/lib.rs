//! # ariadne-core
//!
//! Shared building blocks for the Ariadne OVSDB query servers:
//!
//! - [`Database`]: the five OVSDB databases a server can front
//!   (Open vSwitch, OVN Northbound/Southbound, OVN IC Northbound/Southbound)
//! - [`config`]: YAML configuration with per-database defaults
//! - [`schema`]: the immutable, per-database Schema Registry
//!
//! Nothing in this crate performs I/O against a store. Everything here is
//! built once at startup and shared read-only afterwards.

pub mod config;
pub mod database;
pub mod schema;

pub use config::{AriadneConfig, ConfigError, LogConfig, McpConfig, SchemaSource, StoreConfig, Transport};
pub use database::{Database, UnknownDatabase};
pub use schema::{
    AtomicType, ColumnDescriptor, ColumnType, SchemaError, SchemaRegistry, TableDescriptor,
    EXTERNAL_NAME_KEY, UUID_COLUMN,
};
