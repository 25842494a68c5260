//! Error types for the MCP crate.

use ariadne_ovsdb::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Why a single tool call failed. Every variant is local to the call: the
/// server keeps serving afterwards and nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Table missing from the Schema Registry. Startup validation of the
    /// tool catalog keeps this from reaching callers.
    #[error("unknown table: {table}")]
    UnknownTable { table: String },

    /// Tool not found.
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    /// Arguments do not match the tool's input schema.
    #[error("invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Column not part of the table.
    #[error("column '{column}' is not part of table {table}")]
    UnsupportedField { table: String, column: String },

    /// Only equality conditions are built.
    #[error("operator '{operator}' is not supported (only == is)")]
    UnsupportedOperator { operator: String },

    /// A filter value does not fit the column's type.
    #[error("invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    /// Store unreachable or socket absent.
    #[error("failed to connect to OVSDB: {0}")]
    Connection(String),

    /// Store rejected the transaction.
    #[error("OVSDB transaction failed: {0}")]
    Transaction(String),

    /// Row shape mismatch.
    #[error("failed to decode OVSDB rows: {0}")]
    Decode(String),

    /// The caller (or the server shutting down) abandoned the call.
    #[error("call cancelled")]
    Cancelled,

    #[error("call timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => QueryError::Connection(msg),
            StoreError::Transaction(msg) => QueryError::Transaction(msg),
            StoreError::Decode(msg) => QueryError::Decode(msg),
        }
    }
}

impl QueryError {
    /// Errors the caller can fix by changing the request. These surface as
    /// JSON-RPC `invalid params` rather than as failed tool results.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            QueryError::UnknownTool { .. } | QueryError::InvalidArguments { .. }
        )
    }
}

/// Tool catalog inconsistent with the Schema Registry. Raised at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("tool {tool}: {reason}")]
    Invalid { tool: String, reason: String },

    #[error("tool {0} is defined more than once")]
    Duplicate(String),
}

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Transport error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_not_caller_errors() {
        let err = QueryError::from(StoreError::Connection("connection refused".to_string()));
        assert_eq!(err, QueryError::Connection("connection refused".to_string()));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_stdio_read_failure_is_io_error() {
        fn read_line() -> Result<(), McpError> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed"))?
        }
        let err = read_line().unwrap_err();
        assert!(matches!(err, McpError::IoError(_)));
        assert_eq!(err.to_string(), "IO error: stdin closed");
    }
}
