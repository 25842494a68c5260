//! Condition builder.
//!
//! Turns a column name and a plain JSON value into a typed OVSDB condition.
//! Only equality is offered to callers. On set and map columns equality
//! means membership, so those become `includes` on the wire.

use crate::error::QueryError;
use ariadne_core::{AtomicType, ColumnType, TableDescriptor, UUID_COLUMN};
use ariadne_ovsdb::notation::{self, encode_atom};
use ariadne_ovsdb::{Condition, Function};
use serde_json::Value;

/// Build a condition on `table.column`.
///
/// * scalar and optional columns: `column == atom`
/// * set columns: `column includes ["set", [atoms]]`
/// * map columns: the value must be a non-empty object, and the condition
///   is `column includes ["map", pairs]`
pub fn build(
    table: &TableDescriptor,
    column: &str,
    function: Function,
    value: &Value,
) -> Result<Condition, QueryError> {
    let ty = table
        .column_type(column)
        .ok_or_else(|| QueryError::UnsupportedField {
            table: table.name.clone(),
            column: column.to_string(),
        })?;
    if function != Function::Equal {
        return Err(QueryError::UnsupportedOperator {
            operator: function.to_string(),
        });
    }

    let invalid = |reason: String| QueryError::InvalidValue {
        column: column.to_string(),
        reason,
    };

    if ty.is_map() {
        return encode_map(ty, value)
            .map(|wire| Condition::new(column, Function::Includes, wire))
            .map_err(invalid);
    }

    if ty.is_set() {
        let atoms = match value {
            Value::Array(items) if !items.is_empty() => items.iter().collect(),
            Value::Array(_) => return Err(invalid("expected at least one element".to_string())),
            other => vec![other],
        };
        let encoded = atoms
            .into_iter()
            .map(|atom| encode_atom(ty.key, atom))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        return Ok(Condition::new(column, Function::Includes, notation::set(encoded)));
    }

    encode_atom(ty.key, value)
        .map(|wire| Condition::new(column, Function::Equal, wire))
        .map_err(invalid)
}

/// `_uuid == ["uuid", id]`
pub fn uuid_equals(id: &str) -> Condition {
    Condition::new(UUID_COLUMN, Function::Equal, notation::uuid(id))
}

fn encode_map(ty: ColumnType, value: &Value) -> Result<Value, String> {
    let object = match value {
        Value::Object(object) if !object.is_empty() => object,
        Value::Object(_) => return Err("expected at least one key".to_string()),
        other => return Err(format!("expected an object, got {other}")),
    };
    let value_ty = ty.value.unwrap_or(AtomicType::String);

    let mut pairs = Vec::with_capacity(object.len());
    for (key, v) in object {
        pairs.push((encode_key(ty.key, key)?, encode_atom(value_ty, v)?));
    }
    Ok(notation::map(pairs))
}

/// Object keys are always strings in JSON; integer-keyed maps parse them.
fn encode_key(ty: AtomicType, key: &str) -> Result<Value, String> {
    match ty {
        AtomicType::Integer => key
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| format!("expected integer key, got '{key}'")),
        _ => encode_atom(ty, &Value::String(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::{Database, SchemaRegistry};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builtin(Database::OvnSouthbound)
    }

    #[test]
    fn test_scalar_string_equality() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let bridge = registry.describe("Bridge").unwrap();
        let condition = build(bridge, "name", Function::Equal, &json!("br-int")).unwrap();
        assert_eq!(condition.function, Function::Equal);
        assert_eq!(condition.value, json!("br-int"));
    }

    #[test]
    fn test_uuid_column_is_wrapped() {
        let registry = registry();
        let table = registry.describe("Port_Binding").unwrap();
        let condition = build(table, "datapath", Function::Equal, &json!("abc")).unwrap();
        assert_eq!(condition.value, json!(["uuid", "abc"]));
    }

    #[test]
    fn test_map_column_uses_includes() {
        let registry = registry();
        let table = registry.describe("Datapath_Binding").unwrap();
        let condition =
            build(table, "external_ids", Function::Equal, &json!({"name": "sw0"})).unwrap();
        assert_eq!(condition.function, Function::Includes);
        assert_eq!(condition.value, json!(["map", [["name", "sw0"]]]));
    }

    #[test]
    fn test_set_column_uses_includes() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let table = registry.describe("Bridge").unwrap();
        let condition = build(table, "protocols", Function::Equal, &json!("OpenFlow13")).unwrap();
        assert_eq!(condition.function, Function::Includes);
        assert_eq!(condition.value, json!(["set", ["OpenFlow13"]]));
    }

    #[test]
    fn test_integer_keyed_map() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let table = registry.describe("Bridge").unwrap();
        let condition =
            build(table, "flow_tables", Function::Equal, &json!({"0": "abc"})).unwrap();
        assert_eq!(condition.value, json!(["map", [[0, ["uuid", "abc"]]]]));
    }

    #[test]
    fn test_unknown_column() {
        let registry = registry();
        let table = registry.describe("Chassis").unwrap();
        let err = build(table, "colour", Function::Equal, &json!("x")).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnsupportedField {
                table: "Chassis".to_string(),
                column: "colour".to_string(),
            }
        );
    }

    #[test]
    fn test_only_equality() {
        let registry = registry();
        let table = registry.describe("Chassis").unwrap();
        let err = build(table, "name", Function::NotEqual, &json!("x")).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperator { ref operator } if operator == "!="));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();
        let table = registry.describe("FDB").unwrap();
        let err = build(table, "dp_key", Function::Equal, &json!("seven")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { .. }));

        let table = registry.describe("Datapath_Binding").unwrap();
        let err = build(table, "external_ids", Function::Equal, &json!({})).unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { .. }));
    }

    #[test]
    fn test_uuid_equals() {
        let condition = uuid_equals("abc");
        assert_eq!(condition.column, "_uuid");
        assert_eq!(condition.value, json!(["uuid", "abc"]));
    }
}
