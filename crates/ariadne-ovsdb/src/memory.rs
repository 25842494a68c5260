//! In-memory store.
//!
//! Holds rows in OVSDB wire notation and evaluates `select` conditions the
//! way an OVSDB server would, so the query engine can be exercised without a
//! running `ovsdb-server`.

use crate::endpoint::Endpoint;
use crate::notation::{map_pairs, set_elements, uuid, wire_uuid};
use crate::operation::{Condition, Function, Operation, OperationResult};
use crate::store::{StoreConnector, StoreError, StoreSession};
use ariadne_core::{SchemaRegistry, UUID_COLUMN};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A shared, thread-safe in-memory database.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    database: String,
    tables: Mutex<BTreeMap<String, Vec<Map<String, Value>>>>,
    schema: Option<Value>,
    unreachable: AtomicBool,
    latency: Mutex<Option<Duration>>,
    open_sessions: AtomicUsize,
    connects: AtomicUsize,
    transactions: AtomicUsize,
}

impl MemoryStore {
    /// An empty database called `database` with no tables.
    pub fn new(database: impl Into<String>) -> Self {
        Self::build(database.into(), BTreeMap::new(), None)
    }

    /// An empty database with every table of `registry`.
    pub fn for_registry(registry: &SchemaRegistry) -> Self {
        let tables = registry
            .tables()
            .map(|t| (t.name.clone(), Vec::new()))
            .collect();
        Self::build(registry.database().db_name().to_string(), tables, None)
    }

    /// Serve `schema` in reply to `get_schema`.
    pub fn with_schema(self, schema: Value) -> Self {
        let tables = self.lock_tables().clone();
        Self::build(self.inner.database.clone(), tables, Some(schema))
    }

    fn build(
        database: String,
        tables: BTreeMap<String, Vec<Map<String, Value>>>,
        schema: Option<Value>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                database,
                tables: Mutex::new(tables),
                schema,
                unreachable: AtomicBool::new(false),
                latency: Mutex::new(None),
                open_sessions: AtomicUsize::new(0),
                connects: AtomicUsize::new(0),
                transactions: AtomicUsize::new(0),
            }),
        }
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Map<String, Value>>>> {
        self.inner
            .tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a row given in wire notation and return its uuid. A `_uuid`
    /// already present in the row is kept.
    pub fn insert(&self, table: &str, row: Value) -> String {
        let mut row = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let id = match row.get(UUID_COLUMN).and_then(wire_uuid) {
            Some(id) => id.to_string(),
            None => {
                let id = ::uuid::Uuid::new_v4().to_string();
                row.insert(UUID_COLUMN.to_string(), uuid(&id));
                id
            }
        };
        self.lock_tables()
            .entry(table.to_string())
            .or_default()
            .push(row);
        id
    }

    /// Make every subsequent `connect` fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.unreachable.store(unreachable, AtomicOrdering::SeqCst);
    }

    /// Delay every transaction by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self
            .inner
            .latency
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = latency;
    }

    /// Sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(AtomicOrdering::SeqCst)
    }

    /// Sessions opened so far.
    pub fn connects(&self) -> usize {
        self.inner.connects.load(AtomicOrdering::SeqCst)
    }

    /// Transactions completed so far.
    pub fn transactions(&self) -> usize {
        self.inner.transactions.load(AtomicOrdering::SeqCst)
    }

    fn select(&self, table: &str, conditions: &[Condition], columns: Option<&[String]>) -> Result<Vec<Value>, StoreError> {
        let tables = self.lock_tables();
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::Transaction(format!("unknown table: {table}")))?;

        Ok(rows
            .iter()
            .filter(|row| conditions.iter().all(|c| row_matches(row, c)))
            .map(|row| match columns {
                None => Value::Object(row.clone()),
                Some(columns) => Value::Object(
                    row.iter()
                        .filter(|(k, _)| columns.iter().any(|c| c == *k))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                ),
            })
            .collect())
    }
}

#[async_trait]
impl StoreConnector for MemoryStore {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn StoreSession>, StoreError> {
        if self.inner.unreachable.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Connection(format!(
                "failed to connect to {endpoint}: connection refused"
            )));
        }
        self.inner.connects.fetch_add(1, AtomicOrdering::SeqCst);
        self.inner.open_sessions.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Box::new(MemorySession {
            store: self.clone(),
        }))
    }
}

struct MemorySession {
    store: MemoryStore,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.store
            .inner
            .open_sessions
            .fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn transact(
        &mut self,
        database: &str,
        operations: &[Operation],
    ) -> Result<Vec<OperationResult>, StoreError> {
        let latency = *self
            .store
            .inner
            .latency
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if database != self.store.inner.database {
            return Err(StoreError::Transaction(format!("unknown database: {database}")));
        }

        let results = operations
            .iter()
            .map(|operation| match operation {
                Operation::Select {
                    table,
                    conditions,
                    columns,
                } => self
                    .store
                    .select(table, conditions, columns.as_deref())
                    .map(OperationResult::rows),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.store
            .inner
            .transactions
            .fetch_add(1, AtomicOrdering::SeqCst);
        Ok(results)
    }

    async fn get_schema(&mut self, database: &str) -> Result<Value, StoreError> {
        if database != self.store.inner.database {
            return Err(StoreError::Transaction(format!("unknown database: {database}")));
        }
        self.store
            .inner
            .schema
            .clone()
            .ok_or_else(|| StoreError::Transaction("no schema loaded".to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

fn row_matches(row: &Map<String, Value>, condition: &Condition) -> bool {
    // Unset columns hold their type's default: treat as the empty set.
    let actual = row.get(&condition.column);
    let have = actual.map(elements).unwrap_or_default();
    let want = elements(&condition.value);

    match condition.function {
        Function::Equal => same(&have, &want),
        Function::NotEqual => !same(&have, &want),
        Function::Includes => want.iter().all(|w| have.contains(w)),
        Function::Excludes => want.iter().all(|w| !have.contains(w)),
        Function::LessThan => compare(actual, &condition.value) == Some(Ordering::Less),
        Function::LessThanOrEqual => matches!(
            compare(actual, &condition.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Function::GreaterThan => compare(actual, &condition.value) == Some(Ordering::Greater),
        Function::GreaterThanOrEqual => matches!(
            compare(actual, &condition.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Flatten a wire value to comparable elements: set members, map pairs, or
/// the atom itself.
fn elements(value: &Value) -> Vec<Value> {
    if value.is_null() {
        return Vec::new();
    }
    if let Some(pairs) = map_pairs(value) {
        return pairs
            .into_iter()
            .map(|(k, v)| Value::Array(vec![k.clone(), v.clone()]))
            .collect();
    }
    set_elements(value).into_iter().cloned().collect()
}

fn same(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

fn compare(a: Option<&Value>, b: &Value) -> Option<Ordering> {
    a?.as_f64()?.partial_cmp(&b.as_f64()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::map;
    use ariadne_core::Database;
    use serde_json::json;

    fn endpoint() -> Endpoint {
        Endpoint::Unix("/tmp/memory.sock".into())
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::for_registry(&SchemaRegistry::builtin(Database::OvnSouthbound));
        store.insert(
            "Datapath_Binding",
            json!({"tunnel_key": 1, "external_ids": map([(json!("name"), json!("sw0"))])}),
        );
        store.insert(
            "Datapath_Binding",
            json!({"tunnel_key": 2, "external_ids": ["map", [["name", "sw1"], ["owner", "k8s"]]]}),
        );
        store
    }

    async fn select(store: &MemoryStore, conditions: Vec<Condition>) -> Vec<Value> {
        let mut session = store.connect(&endpoint()).await.unwrap();
        let mut results = session
            .transact(
                "OVN_Southbound",
                &[Operation::select("Datapath_Binding", conditions)],
            )
            .await
            .unwrap();
        results.remove(0).rows.unwrap()
    }

    #[tokio::test]
    async fn test_unconditioned_select() {
        let store = store();
        assert_eq!(select(&store, vec![]).await.len(), 2);
    }

    #[tokio::test]
    async fn test_map_includes() {
        let store = store();
        let rows = select(
            &store,
            vec![Condition::new(
                "external_ids",
                Function::Includes,
                map([(json!("name"), json!("sw1"))]),
            )],
        )
        .await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["tunnel_key"], 2);
    }

    #[tokio::test]
    async fn test_equality_on_uuid_and_integer() {
        let store = store();
        let all = select(&store, vec![]).await;
        let id = wire_uuid(&all[0]["_uuid"]).unwrap().to_string();

        let by_uuid = select(
            &store,
            vec![Condition::new(UUID_COLUMN, Function::Equal, uuid(&id))],
        )
        .await;
        assert_eq!(by_uuid.len(), 1);

        let by_key = select(
            &store,
            vec![Condition::new("tunnel_key", Function::GreaterThan, json!(1))],
        )
        .await;
        assert_eq!(by_key.len(), 1);
        assert_eq!(by_key[0]["tunnel_key"], 2);
    }

    #[tokio::test]
    async fn test_sessions_are_counted_and_released() {
        let store = store();
        let session = store.connect(&endpoint()).await.unwrap();
        assert_eq!(store.open_sessions(), 1);
        drop(session);
        assert_eq!(store.open_sessions(), 0);
        assert_eq!(store.connects(), 1);
    }

    #[tokio::test]
    async fn test_unreachable() {
        let store = store();
        store.set_unreachable(true);
        let err = store.connect(&endpoint()).await.err().unwrap();
        assert!(matches!(err, StoreError::Connection(_)));
        assert_eq!(store.connects(), 0);
    }

    #[tokio::test]
    async fn test_unknown_table_and_database() {
        let store = store();
        let mut session = store.connect(&endpoint()).await.unwrap();
        let err = session
            .transact("OVN_Southbound", &[Operation::select("Nope", vec![])])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Transaction(_)));

        let err = session
            .transact("Open_vSwitch", &[Operation::select("Bridge", vec![])])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Transaction(_)));
    }
}
