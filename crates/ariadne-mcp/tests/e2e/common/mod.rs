//! Shared fixtures for the end-to-end tests.

use ariadne_core::{Database, SchemaRegistry};
use ariadne_mcp::{CallContext, Dispatcher, JsonRpcRequest, McpServer, QueryExecutor};
use ariadne_ovsdb::MemoryStore;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub struct TestContext {
    pub store: MemoryStore,
    pub server: McpServer,
    pub dispatcher: Arc<Dispatcher>,
}

impl TestContext {
    pub fn new(database: Database) -> Self {
        Self::with_timeout(database, Duration::from_secs(5))
    }

    pub fn with_timeout(database: Database, timeout: Duration) -> Self {
        let registry = Arc::new(SchemaRegistry::builtin(database));
        let store = MemoryStore::for_registry(&registry);
        let executor = QueryExecutor::new(
            Arc::new(store.clone()),
            database.default_endpoint().parse().unwrap(),
            database,
        );
        let dispatcher = Arc::new(Dispatcher::new(registry, executor).unwrap());
        let server = McpServer::new(dispatcher.clone()).with_timeout(timeout);
        Self {
            store,
            server,
            dispatcher,
        }
    }

    pub fn ctx(&self) -> CallContext {
        CallContext::new(Duration::from_secs(5))
    }

    /// `tools/call` through the JSON-RPC server; returns the tool result.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        let request = JsonRpcRequest::new(
            1,
            "tools/call",
            Some(json!({"name": name, "arguments": arguments})),
        );
        let response = self.server.handle_request(request).await.unwrap();
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    /// The structured envelope of a successful call.
    pub async fn list(&self, name: &str, arguments: Value) -> Value {
        let result = self.call_tool(name, arguments).await;
        assert_eq!(result["isError"], false, "{result}");
        result["structuredContent"].clone()
    }
}

/// Names found in `envelope.data.<collection>`, in returned order.
pub fn names(envelope: &Value, collection: &str, column: &str) -> Vec<String> {
    envelope["data"][collection]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row[column].as_str().unwrap().to_string())
        .collect()
}
