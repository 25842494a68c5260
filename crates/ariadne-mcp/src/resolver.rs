//! Filter resolver.
//!
//! Turns a caller's filter string into a [`Selection`] on the listed table.
//! Self filters compare the table's own name column. Parent filters first
//! look the name up in the parent table, then derive one condition set per
//! matching parent. No parent match is a result, not an error.

use crate::catalog::{FilterRelation, FilterSpec, Link};
use crate::condition;
use crate::context::CallContext;
use crate::error::QueryError;
use crate::executor::{QueryExecutor, Selection};
use ariadne_core::{EXTERNAL_NAME_KEY, SchemaRegistry, TableDescriptor};
use ariadne_ovsdb::{Condition, Function, Row};
use serde_json::{Map, Value, json};

/// Outcome of filter resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No filter was given.
    Unfiltered,
    /// Select these rows of the listed table.
    Selection(Selection),
    /// The named parent does not exist.
    NoMatch { entity: &'static str },
}

pub struct FilterResolver<'a> {
    registry: &'a SchemaRegistry,
    executor: &'a QueryExecutor,
}

impl<'a> FilterResolver<'a> {
    pub fn new(registry: &'a SchemaRegistry, executor: &'a QueryExecutor) -> Self {
        Self { registry, executor }
    }

    pub async fn resolve(
        &self,
        target: &TableDescriptor,
        spec: Option<&FilterSpec>,
        filter: Option<&str>,
        ctx: &CallContext,
    ) -> Result<Resolution, QueryError> {
        let (Some(spec), Some(filter)) = (spec, filter.filter(|f| !f.is_empty())) else {
            return Ok(Resolution::Unfiltered);
        };

        let (parent, link, by_name) = match spec.relation {
            FilterRelation::SelfTable => {
                let conditions = vec![name_condition(target, filter)?];
                return Ok(Resolution::Selection(Selection::Where(conditions)));
            }
            FilterRelation::ParentByName { parent, link } => (parent, link, true),
            FilterRelation::ParentByExternalId { parent, link } => (parent, link, false),
        };

        let parent = self
            .registry
            .describe(parent)
            .map_err(|_| QueryError::UnknownTable {
                table: parent.to_string(),
            })?;
        let lookup = if by_name {
            own_name_condition(parent, filter)?
        } else {
            external_name_condition(parent, filter)?
        };
        let parents = self
            .executor
            .execute(parent, &Selection::Where(vec![lookup]), ctx)
            .await?;

        tracing::debug!(
            relation = spec.relation.kind(),
            parent = %parent.name,
            filter,
            matches = parents.len(),
            "resolved filter"
        );

        if parents.is_empty() {
            return Ok(Resolution::NoMatch {
                entity: spec.entity,
            });
        }

        let mut alternatives: Vec<Vec<Condition>> = Vec::new();
        for row in &parents {
            for conditions in derive(target, parent, link, row)? {
                if !alternatives.contains(&conditions) {
                    alternatives.push(conditions);
                }
            }
        }

        let selection = if alternatives.len() == 1 {
            Selection::Where(alternatives.remove(0))
        } else {
            Selection::AnyOf(alternatives)
        };
        Ok(Resolution::Selection(selection))
    }
}

/// Condition sets on the listed table implied by one parent row.
fn derive(
    target: &TableDescriptor,
    parent_table: &TableDescriptor,
    link: Link,
    parent: &Row,
) -> Result<Vec<Vec<Condition>>, QueryError> {
    match link {
        Link::Members { column } => {
            let ids: Vec<&str> = match parent.get(column) {
                Some(Value::Array(ids)) => ids.iter().filter_map(Value::as_str).collect(),
                Some(Value::Object(map)) => map.values().filter_map(Value::as_str).collect(),
                Some(Value::String(id)) => vec![id.as_str()],
                _ => Vec::new(),
            };
            Ok(ids
                .into_iter()
                .map(|id| vec![condition::uuid_equals(id)])
                .collect())
        }
        Link::Reference { column, parent_key } => match parent.get(parent_key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            // The value comes from the store, not the caller.
            Some(value) => condition::build(target, column, Function::Equal, value)
                .map(|condition| vec![vec![condition]])
                .map_err(|e| match e {
                    QueryError::InvalidValue { reason, .. } => QueryError::Decode(format!(
                        "{}.{parent_key} does not fit {}.{column}: {reason}",
                        parent_table.name, target.name
                    )),
                    other => other,
                }),
        },
    }
}

/// Name column when the table has one, else `external_ids:name`.
fn name_condition(table: &TableDescriptor, filter: &str) -> Result<Condition, QueryError> {
    if table.name_column.is_some() {
        own_name_condition(table, filter)
    } else {
        external_name_condition(table, filter)
    }
}

fn own_name_condition(table: &TableDescriptor, filter: &str) -> Result<Condition, QueryError> {
    let column = table
        .name_column
        .as_deref()
        .ok_or_else(|| QueryError::UnsupportedField {
            table: table.name.clone(),
            column: "name".to_string(),
        })?;
    condition::build(table, column, Function::Equal, &json!(filter))
}

fn external_name_condition(table: &TableDescriptor, filter: &str) -> Result<Condition, QueryError> {
    let column = table
        .external_ids_column
        .as_deref()
        .ok_or_else(|| QueryError::UnsupportedField {
            table: table.name.clone(),
            column: "external_ids".to_string(),
        })?;
    condition::build(
        table,
        column,
        Function::Equal,
        &Value::Object(Map::from_iter([(
            EXTERNAL_NAME_KEY.to_string(),
            Value::from(filter),
        )])),
    )
}
