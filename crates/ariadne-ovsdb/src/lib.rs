//! # ariadne-ovsdb
//!
//! The outbound half of Ariadne: everything needed to ask an OVSDB server
//! (RFC 7047) for rows.
//!
//! ```text
//!  query engine
//!       │  Operation::select(table, conditions)
//!       ▼
//! ┌──────────────────┐      ┌──────────────────────────┐
//! │  StoreConnector  │─────▶│  StoreSession            │
//! │  (per call)      │      │  transact / get_schema   │
//! └──────────────────┘      └────────────┬─────────────┘
//!                                        │ JSON-RPC 1.0
//!                     ┌──────────────────┴─────────────┐
//!                     ▼                                ▼
//!             OvsdbSession (unix/tcp)          MemoryStore (tests)
//! ```
//!
//! Values cross this boundary in wire notation ([`notation`]); rows come
//! back out as plain JSON via [`notation::decode_row`].

pub mod client;
pub mod endpoint;
pub mod memory;
pub mod notation;
pub mod operation;
pub mod store;

pub use client::{OvsdbConnector, OvsdbSession};
pub use endpoint::{Endpoint, EndpointError};
pub use memory::MemoryStore;
pub use notation::{Row, decode_row};
pub use operation::{Condition, Function, Operation, OperationResult};
pub use store::{StoreConnector, StoreError, StoreSession};
