//! Transaction operations and their results (RFC 7047 section 5.2).
//!
//! Only `select` is modelled: nothing in Ariadne writes to a database.

use crate::store::StoreError;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Condition functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "includes")]
    Includes,
    #[serde(rename = "excludes")]
    Excludes,
}

impl Function {
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::Equal => "==",
            Function::NotEqual => "!=",
            Function::LessThan => "<",
            Function::LessThanOrEqual => "<=",
            Function::GreaterThan => ">",
            Function::GreaterThanOrEqual => ">=",
            Function::Includes => "includes",
            Function::Excludes => "excludes",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Function {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Function::Equal),
            "!=" => Ok(Function::NotEqual),
            "<" => Ok(Function::LessThan),
            "<=" => Ok(Function::LessThanOrEqual),
            ">" => Ok(Function::GreaterThan),
            ">=" => Ok(Function::GreaterThanOrEqual),
            "includes" => Ok(Function::Includes),
            "excludes" => Ok(Function::Excludes),
            other => Err(format!("unknown condition function '{other}'")),
        }
    }
}

/// A `[column, function, value]` triple with `value` already in wire notation.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub function: Function,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, function: Function, value: Value) -> Self {
        Self {
            column: column.into(),
            function,
            value,
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.column)?;
        tuple.serialize_element(&self.function)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

/// A database operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Rows of `table` matching every condition. All columns when `columns`
    /// is `None`.
    Select {
        table: String,
        #[serde(rename = "where")]
        conditions: Vec<Condition>,
        #[serde(skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
    },
}

impl Operation {
    pub fn select(table: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Operation::Select {
            table: table.into(),
            conditions,
            columns: None,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Operation::Select { table, .. } => table,
        }
    }
}

/// Result of one operation. `rows` is set for selects.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OperationResult {
    #[serde(default)]
    pub rows: Option<Vec<Value>>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl OperationResult {
    pub fn rows(rows: Vec<Value>) -> Self {
        Self {
            rows: Some(rows),
            count: None,
        }
    }
}

/// Interpret the `result` of a `transact` reply.
///
/// The reply holds one entry per operation. An operation that failed is an
/// `{"error": ..., "details": ...}` object, and later operations are left
/// `null`. A commit failure appends one extra error entry.
pub fn parse_transact_reply(operations: usize, reply: Value) -> Result<Vec<OperationResult>, StoreError> {
    let entries = match reply {
        Value::Array(entries) => entries,
        other => {
            return Err(StoreError::Decode(format!(
                "transact result is not an array: {other}"
            )));
        }
    };

    if let Some(error) = entries.iter().find_map(entry_error) {
        return Err(StoreError::Transaction(error));
    }
    if entries.len() < operations {
        return Err(StoreError::Decode(format!(
            "expected {operations} results, got {}",
            entries.len()
        )));
    }

    entries
        .into_iter()
        .take(operations)
        .map(|entry| {
            serde_json::from_value(entry)
                .map_err(|e| StoreError::Decode(format!("malformed operation result: {e}")))
        })
        .collect()
}

fn entry_error(entry: &Value) -> Option<String> {
    let error = entry.get("error")?.as_str()?;
    Some(match entry.get("details").and_then(Value::as_str) {
        Some(details) => format!("{error}: {details}"),
        None => error.to_string(),
    })
}
