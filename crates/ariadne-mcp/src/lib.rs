//! # ariadne-mcp
//!
//! Filtered OVSDB queries exposed as read-only MCP list tools.
//!
//! Every tool in every database goes through the same path:
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (tools/list, tools/call)
//!       ▼
//! ┌──────────────────────────┐
//! │  McpServer (stdio/HTTP)  │
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │  Dispatcher              │  ← catalog: tool → table, filter relation
//! │  1. validate arguments   │  ← jsonschema
//! │  2. resolve filter       │  ← parent lookup (first round trip)
//! │  3. build conditions     │
//! │  4. select rows          │  ← second round trip
//! │  5. wrap in envelope     │
//! └────────────┬─────────────┘
//!              ▼
//!        OVSDB server
//! ```
//!
//! ## Filters
//!
//! | Relation | Example | Resolution |
//! |----------|---------|------------|
//! | self | `list_bridges(name_filter)` | `Bridge.name == filter` |
//! | parent by name | `list_interfaces(port_filter)` | `Port.name == filter`, then each `Port.interfaces` uuid |
//! | parent by external id | `list_port_bindings(datapath_filter)` | `Datapath_Binding.external_ids:name == filter`, then `Port_Binding.datapath == parent` |
//!
//! A parent filter that matches nothing yields an empty result whose context
//! reads "no <entity> found with the specified filter". Several matching
//! parents are combined with OR.
//!
//! ## Example Usage
//!
//! ```ignore
//! use ariadne_core::{Database, SchemaRegistry};
//! use ariadne_mcp::{Dispatcher, McpServer, QueryExecutor};
//! use ariadne_ovsdb::OvsdbConnector;
//!
//! let database = Database::OvnSouthbound;
//! let registry = Arc::new(SchemaRegistry::builtin(database));
//! let executor = QueryExecutor::new(
//!     Arc::new(OvsdbConnector::new()),
//!     database.default_endpoint().parse()?,
//!     database,
//! );
//! let dispatcher = Dispatcher::new(registry, executor)?;
//!
//! McpServer::new(Arc::new(dispatcher)).run().await?;
//! ```

pub mod catalog;
pub mod condition;
pub mod context;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod http_transport;
pub mod protocol;
pub mod resolver;
pub mod server;
pub mod tools;

pub use catalog::{FilterRelation, FilterSpec, Link, ToolSpec};
pub use context::CallContext;
pub use dispatcher::Dispatcher;
pub use envelope::ResultEnvelope;
pub use error::{CatalogError, McpError, QueryError};
pub use executor::{QueryExecutor, Selection};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolAnnotations,
    ToolContent, ToolDefinition,
};
pub use resolver::{FilterResolver, Resolution};
pub use server::McpServer;
pub use tools::ToolRegistry;
