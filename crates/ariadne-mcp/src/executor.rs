//! Query executor.
//!
//! Owns the per-call store lifecycle: connect, run one transaction, close.
//! The session lives inside a single future, so every exit path (error,
//! timeout, cancellation) drops it and releases the connection.

use crate::context::CallContext;
use crate::error::QueryError;
use ariadne_core::{Database, TableDescriptor, UUID_COLUMN};
use ariadne_ovsdb::{
    Condition, Endpoint, Operation, OperationResult, Row, StoreConnector, StoreError, decode_row,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Which rows of a table to select.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Every row.
    All,
    /// Rows matching all of the conditions.
    Where(Vec<Condition>),
    /// Rows matching any one of the condition sets. Empty selects nothing.
    AnyOf(Vec<Vec<Condition>>),
}

impl Selection {
    /// One `select` per alternative.
    pub fn operations(&self, table: &str) -> Vec<Operation> {
        match self {
            Selection::All => vec![Operation::select(table, Vec::new())],
            Selection::Where(conditions) => vec![Operation::select(table, conditions.clone())],
            Selection::AnyOf(alternatives) => alternatives
                .iter()
                .map(|conditions| Operation::select(table, conditions.clone()))
                .collect(),
        }
    }
}

/// Runs selections against one database endpoint.
#[derive(Clone)]
pub struct QueryExecutor {
    connector: Arc<dyn StoreConnector>,
    endpoint: Endpoint,
    database: Database,
}

impl QueryExecutor {
    pub fn new(connector: Arc<dyn StoreConnector>, endpoint: Endpoint, database: Database) -> Self {
        Self {
            connector,
            endpoint,
            database,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn database(&self) -> Database {
        self.database
    }

    /// Select rows from `table`, decoded to plain JSON and de-duplicated by
    /// `_uuid` in first-seen order.
    pub async fn execute(
        &self,
        table: &TableDescriptor,
        selection: &Selection,
        ctx: &CallContext,
    ) -> Result<Vec<Row>, QueryError> {
        let operations = selection.operations(&table.name);
        if operations.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let results = tokio::select! {
            biased;
            _ = ctx.cancel_token().cancelled() => {
                tracing::debug!(table = %table.name, "query cancelled");
                return Err(QueryError::Cancelled);
            }
            outcome = tokio::time::timeout_at(ctx.deadline(), self.transact(&operations)) => match outcome {
                Ok(results) => results?,
                Err(_) => {
                    tracing::debug!(table = %table.name, timeout = ?ctx.timeout(), "query timed out");
                    return Err(QueryError::TimedOut(ctx.timeout()));
                }
            },
        };

        let rows = collect_rows(table, results)?;
        tracing::debug!(
            database = %self.database,
            table = %table.name,
            selects = operations.len(),
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query executed"
        );
        Ok(rows)
    }

    async fn transact(&self, operations: &[Operation]) -> Result<Vec<OperationResult>, StoreError> {
        let mut session = self.connector.connect(&self.endpoint).await?;
        let result = session.transact(self.database.db_name(), operations).await;
        if let Err(e) = session.close().await {
            tracing::debug!(endpoint = %self.endpoint, error = %e, "failed to close OVSDB session");
        }
        result
    }
}

fn collect_rows(table: &TableDescriptor, results: Vec<OperationResult>) -> Result<Vec<Row>, QueryError> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for raw in results.into_iter().flat_map(|r| r.rows.unwrap_or_default()) {
        let row = decode_row(table, &raw)?;
        let id = row
            .get(UUID_COLUMN)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_default();
        if seen.insert(id) {
            rows.push(row);
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::SchemaRegistry;
    use ariadne_ovsdb::{Function, MemoryStore};
    use serde_json::json;
    use std::time::Duration;

    fn setup() -> (MemoryStore, QueryExecutor, SchemaRegistry) {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let store = MemoryStore::for_registry(&registry);
        let executor = QueryExecutor::new(
            Arc::new(store.clone()),
            "unix:/tmp/db.sock".parse().unwrap(),
            Database::Vswitch,
        );
        (store, executor, registry)
    }

    fn name_is(name: &str) -> Vec<Condition> {
        vec![Condition::new("name", Function::Equal, json!(name))]
    }

    #[tokio::test]
    async fn test_select_all_and_release() {
        let (store, executor, registry) = setup();
        store.insert("Bridge", json!({"name": "br0"}));
        store.insert("Bridge", json!({"name": "br1"}));

        let table = registry.describe("Bridge").unwrap();
        let ctx = CallContext::new(Duration::from_secs(5));
        let rows = executor.execute(table, &Selection::All, &ctx).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(store.connects(), 1);
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_any_of_dedupes_in_first_seen_order() {
        let (store, executor, registry) = setup();
        store.insert("Bridge", json!({"name": "br0"}));
        store.insert("Bridge", json!({"name": "br1"}));

        let table = registry.describe("Bridge").unwrap();
        let selection = Selection::AnyOf(vec![name_is("br1"), name_is("br0"), name_is("br1")]);
        let ctx = CallContext::new(Duration::from_secs(5));
        let rows = executor.execute(table, &selection, &ctx).await.unwrap();

        let names: Vec<_> = rows.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("br1"), json!("br0")]);
        assert_eq!(store.transactions(), 1);
    }

    #[tokio::test]
    async fn test_empty_any_of_skips_store() {
        let (store, executor, registry) = setup();
        let table = registry.describe("Bridge").unwrap();
        let ctx = CallContext::new(Duration::from_secs(5));
        let rows = executor
            .execute(table, &Selection::AnyOf(Vec::new()), &ctx)
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(store.connects(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let (store, executor, registry) = setup();
        store.set_unreachable(true);
        let table = registry.describe("Bridge").unwrap();
        let ctx = CallContext::new(Duration::from_secs(5));
        let err = executor.execute(table, &Selection::All, &ctx).await.unwrap_err();
        assert!(matches!(err, QueryError::Connection(_)));
    }

    #[tokio::test]
    async fn test_timeout_releases_session() {
        let (store, executor, registry) = setup();
        store.set_latency(Some(Duration::from_secs(5)));
        let table = registry.describe("Bridge").unwrap();
        let ctx = CallContext::new(Duration::from_millis(20));
        let err = executor.execute(table, &Selection::All, &ctx).await.unwrap_err();
        assert_eq!(err, QueryError::TimedOut(Duration::from_millis(20)));
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_cancel_releases_session() {
        let (store, executor, registry) = setup();
        store.set_latency(Some(Duration::from_secs(5)));
        let table = registry.describe("Bridge").unwrap();
        let ctx = CallContext::new(Duration::from_secs(30));

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = executor.execute(table, &Selection::All, &ctx).await.unwrap_err();
        assert_eq!(err, QueryError::Cancelled);
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_decode_failure() {
        let (store, executor, registry) = setup();
        store.insert("Bridge", json!({"name": 42}));
        let table = registry.describe("Bridge").unwrap();
        let ctx = CallContext::new(Duration::from_secs(5));
        let err = executor.execute(table, &Selection::All, &ctx).await.unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)));
    }
}
