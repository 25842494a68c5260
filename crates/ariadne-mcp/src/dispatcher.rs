//! Tool dispatcher.
//!
//! One generic path serves every list tool: look the tool up, validate its
//! arguments, resolve the filter, run the select and wrap the rows.

use crate::catalog::{self, ToolSpec};
use crate::context::CallContext;
use crate::envelope::ResultEnvelope;
use crate::error::{CatalogError, QueryError};
use crate::executor::{QueryExecutor, Selection};
use crate::resolver::{FilterResolver, Resolution};
use crate::tools::ToolRegistry;
use ariadne_core::{Database, SchemaRegistry, TableDescriptor};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

pub struct Dispatcher {
    registry: Arc<SchemaRegistry>,
    executor: QueryExecutor,
    tools: ToolRegistry,
}

impl Dispatcher {
    /// Build the dispatcher for the registry's database. Fails if the tool
    /// catalog refers to tables or columns the registry does not have.
    pub fn new(registry: Arc<SchemaRegistry>, executor: QueryExecutor) -> Result<Self, CatalogError> {
        let specs = catalog::catalog(registry.database());
        Self::with_tools(registry, executor, specs)
    }

    pub fn with_tools(
        registry: Arc<SchemaRegistry>,
        executor: QueryExecutor,
        specs: &[ToolSpec],
    ) -> Result<Self, CatalogError> {
        catalog::validate(specs, &registry)?;
        let tools = ToolRegistry::from_specs(specs)?;
        tracing::debug!(
            database = %registry.database(),
            tables = registry.len(),
            tools = tools.len(),
            "tool catalog validated"
        );
        Ok(Self {
            registry,
            executor,
            tools,
        })
    }

    pub fn database(&self) -> Database {
        self.registry.database()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one tool call.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &Value,
        ctx: &CallContext,
    ) -> Result<ResultEnvelope, QueryError> {
        let tool = self.tools.get(name).ok_or_else(|| QueryError::UnknownTool {
            name: name.to_string(),
        })?;
        let spec = &tool.spec;

        let empty = Value::Object(Map::new());
        let arguments = if arguments.is_null() { &empty } else { arguments };
        tool.validate(arguments)
            .map_err(|reason| invalid_arguments(name, reason))?;

        let filter = spec
            .filter
            .as_ref()
            .and_then(|f| arguments.get(f.argument))
            .and_then(Value::as_str);

        let target = self
            .registry
            .describe(spec.table)
            .map_err(|_| QueryError::UnknownTable {
                table: spec.table.to_string(),
            })?;

        let started = Instant::now();
        let resolution = FilterResolver::new(&self.registry, &self.executor)
            .resolve(target, spec.filter.as_ref(), filter, ctx)
            .await
            .map_err(|e| caller_facing(name, e))?;

        let envelope = match resolution {
            Resolution::NoMatch { entity } => ResultEnvelope::no_match(spec.collection, entity),
            Resolution::Unfiltered => self.list(spec, target, &Selection::All, ctx).await?,
            Resolution::Selection(selection) => self.list(spec, target, &selection, ctx).await?,
        };

        tracing::info!(
            tool = name,
            table = spec.table,
            filter = filter.unwrap_or_default(),
            count = envelope.count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tool call completed"
        );
        Ok(envelope)
    }

    async fn list(
        &self,
        spec: &ToolSpec,
        target: &TableDescriptor,
        selection: &Selection,
        ctx: &CallContext,
    ) -> Result<ResultEnvelope, QueryError> {
        let rows = self.executor.execute(target, selection, ctx).await?;
        Ok(ResultEnvelope::build(spec.collection, rows, spec.context))
    }
}

fn invalid_arguments(tool: &str, reason: impl Into<String>) -> QueryError {
    QueryError::InvalidArguments {
        tool: tool.to_string(),
        reason: reason.into(),
    }
}

/// By this point `InvalidValue` can only come from the caller's filter
/// string; values taken from parent rows are reported as decode errors.
fn caller_facing(tool: &str, err: QueryError) -> QueryError {
    match err {
        QueryError::InvalidValue { column, reason } => {
            invalid_arguments(tool, format!("{column}: {reason}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FilterRelation, FilterSpec, Link};
    use ariadne_ovsdb::MemoryStore;
    use ariadne_ovsdb::notation::{map, set, uuid};
    use serde_json::json;
    use std::time::Duration;

    fn dispatcher(database: Database) -> (MemoryStore, Dispatcher) {
        let registry = Arc::new(SchemaRegistry::builtin(database));
        let store = MemoryStore::for_registry(&registry);
        let executor = QueryExecutor::new(
            Arc::new(store.clone()),
            database.default_endpoint().parse().unwrap(),
            database,
        );
        (store, Dispatcher::new(registry, executor).unwrap())
    }

    fn ctx() -> CallContext {
        CallContext::new(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_unfiltered_listing() {
        let (store, dispatcher) = dispatcher(Database::Vswitch);
        store.insert("Port", json!({"name": "p0"}));
        store.insert("Port", json!({"name": "p1"}));

        let envelope = dispatcher
            .dispatch("list_ports", &json!({}), &ctx())
            .await
            .unwrap();
        assert_eq!(envelope.count, 2);
        assert!(envelope.context.starts_with("Ports are logical entities"));
        assert!(envelope.data.contains_key("ports"));
    }

    #[tokio::test]
    async fn test_null_arguments_are_empty() {
        let (_store, dispatcher) = dispatcher(Database::Vswitch);
        let envelope = dispatcher
            .dispatch("list_bridges", &Value::Null, &ctx())
            .await
            .unwrap();
        assert_eq!(envelope.count, 0);
    }

    #[tokio::test]
    async fn test_members_filter() {
        let (store, dispatcher) = dispatcher(Database::OvnNorthbound);
        let p1 = store.insert("Logical_Switch_Port", json!({"name": "sw0-p1"}));
        store.insert("Logical_Switch_Port", json!({"name": "sw1-p1"}));
        store.insert(
            "Logical_Switch",
            json!({"name": "sw0", "ports": set(vec![uuid(&p1)])}),
        );

        let envelope = dispatcher
            .dispatch("list_logical_switch_ports", &json!({"switch_filter": "sw0"}), &ctx())
            .await
            .unwrap();
        assert_eq!(envelope.count, 1);
        assert_eq!(envelope.rows()[0]["name"], "sw0-p1");
    }

    #[tokio::test]
    async fn test_flow_tables_follow_bridge_map() {
        let (store, dispatcher) = dispatcher(Database::Vswitch);
        let t0 = store.insert("Flow_Table", json!({"name": "classifier"}));
        store.insert("Flow_Table", json!({"name": "other"}));
        store.insert(
            "Bridge",
            json!({"name": "br0", "flow_tables": map([(json!(0), uuid(&t0))])}),
        );

        let envelope = dispatcher
            .dispatch("list_flow_tables", &json!({"bridge_filter": "br0"}), &ctx())
            .await
            .unwrap();
        assert_eq!(envelope.count, 1);
        assert_eq!(envelope.rows()[0]["name"], "classifier");
    }

    #[tokio::test]
    async fn test_ic_port_bindings_follow_transit_switch() {
        let (store, dispatcher) = dispatcher(Database::OvnIcSouthbound);
        store.insert("Datapath_Binding", json!({"transit_switch": "ts0", "tunnel_key": 1}));
        store.insert("Port_Binding", json!({"logical_port": "a", "transit_switch": "ts0"}));
        store.insert("Port_Binding", json!({"logical_port": "b", "transit_switch": "ts1"}));

        let envelope = dispatcher
            .dispatch("list_port_bindings", &json!({"datapath_filter": "ts0"}), &ctx())
            .await
            .unwrap();
        assert_eq!(envelope.count, 1);
        assert_eq!(envelope.rows()[0]["logical_port"], "a");
    }

    #[tokio::test]
    async fn test_no_match_envelope() {
        let (store, dispatcher) = dispatcher(Database::OvnNorthbound);
        store.insert("ACL", json!({"priority": 1, "direction": "from-lport"}));

        let envelope = dispatcher
            .dispatch("list_acls", &json!({"switch_filter": "nope"}), &ctx())
            .await
            .unwrap();
        assert_eq!(envelope.count, 0);
        assert_eq!(envelope.context, "no logical switch found with the specified filter");
        assert_eq!(store.transactions(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (_store, dispatcher) = dispatcher(Database::Vswitch);
        let err = dispatcher
            .dispatch("list_everything", &json!({}), &ctx())
            .await
            .unwrap_err();
        assert!(err.is_caller_error());
        assert_eq!(
            err,
            QueryError::UnknownTool {
                name: "list_everything".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let (store, dispatcher) = dispatcher(Database::Vswitch);
        for args in [json!({"name_filter": 1}), json!({"colour": "red"}), json!([1])] {
            let err = dispatcher
                .dispatch("list_bridges", &args, &ctx())
                .await
                .unwrap_err();
            assert!(matches!(err, QueryError::InvalidArguments { .. }), "{args}");
        }
        assert_eq!(store.connects(), 0);
    }

    #[test]
    fn test_catalog_mismatch_fails_startup() {
        let database = Database::Vswitch;
        let registry = Arc::new(SchemaRegistry::builtin(database));
        let store = MemoryStore::for_registry(&registry);
        let executor = QueryExecutor::new(
            Arc::new(store),
            database.default_endpoint().parse().unwrap(),
            database,
        );
        let bogus = ToolSpec {
            name: "list_mirrors",
            description: "List mirrors.",
            table: "Mirror",
            collection: "mirrors",
            context: "Mirrors.",
            filter: Some(FilterSpec {
                argument: "bridge_filter",
                entity: "bridge",
                relation: FilterRelation::ParentByName {
                    parent: "Bridge",
                    link: Link::members("mirrors"),
                },
            }),
        };
        assert!(Dispatcher::with_tools(registry, executor, &[bogus]).is_err());
    }
}
