//! The outbound store seam.
//!
//! A [`StoreConnector`] opens one [`StoreSession`] per call. Sessions own
//! their connection: dropping a session releases it, so a call that is
//! cancelled mid-flight cannot leak a socket.

use crate::endpoint::Endpoint;
use crate::operation::{Operation, OperationResult};
use async_trait::async_trait;
use serde_json::Value;

/// Errors raised by store sessions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The store is unreachable, or the connection broke mid-call.
    #[error("{0}")]
    Connection(String),

    /// The store rejected the request.
    #[error("{0}")]
    Transaction(String),

    /// The reply did not have the expected shape.
    #[error("{0}")]
    Decode(String),
}

/// Opens sessions against an endpoint.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn StoreSession>, StoreError>;
}

/// One open connection to a store.
#[async_trait]
pub trait StoreSession: Send {
    /// Run `operations` as a single transaction against `database`.
    async fn transact(
        &mut self,
        database: &str,
        operations: &[Operation],
    ) -> Result<Vec<OperationResult>, StoreError>;

    /// Fetch the database's schema document.
    async fn get_schema(&mut self, database: &str) -> Result<Value, StoreError>;

    /// Close the connection. Dropping the session has the same effect
    /// without waiting for the peer.
    async fn close(self: Box<Self>) -> Result<(), StoreError>;
}
