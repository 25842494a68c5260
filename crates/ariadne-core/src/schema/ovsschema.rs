//! Parsing of OVSDB schema documents (RFC 7047 section 3.2).

use super::{AtomicType, ColumnDescriptor, ColumnType, SchemaError, TableDescriptor};
use crate::database::Database;
use serde_json::Value;

pub(super) fn parse(database: Database, document: &Value) -> Result<Vec<TableDescriptor>, SchemaError> {
    let name = document["name"]
        .as_str()
        .ok_or_else(|| SchemaError::Parse("missing schema name".to_string()))?;
    if name != database.db_name() {
        return Err(SchemaError::DatabaseMismatch {
            expected: database.db_name().to_string(),
            found: name.to_string(),
        });
    }

    let tables = document["tables"]
        .as_object()
        .ok_or_else(|| SchemaError::Parse("missing tables object".to_string()))?;

    tables
        .iter()
        .map(|(table_name, table)| parse_table(database, table_name, table))
        .collect()
}

fn parse_table(database: Database, name: &str, table: &Value) -> Result<TableDescriptor, SchemaError> {
    let columns = table["columns"]
        .as_object()
        .ok_or_else(|| SchemaError::Parse(format!("table {name}: missing columns")))?;

    let columns = columns
        .iter()
        .map(|(column, spec)| {
            parse_type(&spec["type"])
                .map(|ty| ColumnDescriptor::new(column.as_str(), ty))
                .map_err(|reason| SchemaError::Parse(format!("{name}.{column}: {reason}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableDescriptor::new(database, name, columns))
}

fn parse_type(ty: &Value) -> Result<ColumnType, String> {
    match ty {
        Value::String(_) => Ok(ColumnType::scalar(parse_base(ty)?)),
        Value::Object(obj) => {
            let key = parse_base(obj.get("key").ok_or("missing key type")?)?;
            let value = obj.get("value").map(parse_base).transpose()?;
            let min = match obj.get("min") {
                None => 1,
                Some(v) => bound(v).ok_or("min must be an integer between 0 and 4294967295")?,
            };
            let max = match obj.get("max") {
                None => Some(1),
                Some(Value::String(s)) if s == "unlimited" => None,
                Some(v) => Some(bound(v).ok_or("max must be \"unlimited\" or an integer between 0 and 4294967295")?),
            };
            Ok(ColumnType { key, value, min, max })
        }
        _ => Err("type must be a string or an object".to_string()),
    }
}

fn bound(v: &Value) -> Option<u32> {
    v.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// A base type is either an atomic-type name or `{"type": ..., constraints...}`.
fn parse_base(base: &Value) -> Result<AtomicType, String> {
    let name = match base {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or("base type object without type")?,
        _ => return Err("base type must be a string or an object".to_string()),
    };
    AtomicType::parse(name).ok_or_else(|| format!("unknown atomic type '{name}'"))
}
