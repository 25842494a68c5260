//! Result envelope.

use ariadne_ovsdb::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{"data": {"<collection>": rows}, "count": n, "context": text}`
///
/// `count` always equals the number of rows, including zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub data: Map<String, Value>,
    pub count: usize,
    pub context: String,
}

impl ResultEnvelope {
    pub fn build(collection: &str, rows: Vec<Row>, context: impl Into<String>) -> Self {
        let count = rows.len();
        let rows = rows.into_iter().map(Value::Object).collect();
        let mut data = Map::new();
        data.insert(collection.to_string(), Value::Array(rows));
        Self {
            data,
            count,
            context: context.into(),
        }
    }

    /// The named parent of a filter did not exist.
    pub fn no_match(collection: &str, entity: &str) -> Self {
        Self::build(
            collection,
            Vec::new(),
            format!("no {entity} found with the specified filter"),
        )
    }

    /// Rows of the single collection.
    pub fn rows(&self) -> &[Value] {
        self.data
            .values()
            .next()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("data".to_string(), Value::Object(self.data.clone()));
        object.insert("count".to_string(), Value::from(self.count));
        object.insert("context".to_string(), Value::String(self.context.clone()));
        Value::Object(object)
    }
}
