//! OVSDB JSON value notation (RFC 7047 section 5.1).
//!
//! On the wire a uuid is `["uuid", id]`, a set is `["set", [...]]` and a map is
//! `["map", [[k, v], ...]]`. A set of exactly one element may also be sent as
//! the bare atom. Rows returned to callers use plain JSON instead: uuids are
//! strings, sets are arrays, maps are objects and an empty optional is `null`.

use crate::store::StoreError;
use ariadne_core::{AtomicType, ColumnType, TableDescriptor, UUID_COLUMN};
use serde_json::{Map, Value, json};

/// A decoded row: column name to plain JSON value.
pub type Row = Map<String, Value>;

/// `["uuid", id]`
pub fn uuid(id: &str) -> Value {
    json!(["uuid", id])
}

/// `["set", [...]]`
pub fn set(elements: Vec<Value>) -> Value {
    json!(["set", elements])
}

/// `["map", [[k, v], ...]]`
pub fn map(pairs: impl IntoIterator<Item = (Value, Value)>) -> Value {
    let pairs: Vec<Value> = pairs.into_iter().map(|(k, v)| json!([k, v])).collect();
    json!(["map", pairs])
}

/// Encode a plain JSON value as an atom of type `ty`.
pub fn encode_atom(ty: AtomicType, value: &Value) -> Result<Value, String> {
    match (ty, value) {
        (AtomicType::Uuid, Value::String(s)) => Ok(uuid(s)),
        (AtomicType::String, Value::String(_)) | (AtomicType::Boolean, Value::Bool(_)) => {
            Ok(value.clone())
        }
        (AtomicType::Integer, Value::Number(n)) if n.is_i64() => Ok(value.clone()),
        (AtomicType::Real, Value::Number(_)) => Ok(value.clone()),
        _ => Err(format!("expected {}, got {}", type_name(ty), value)),
    }
}

/// Decode a wire atom of type `ty` into plain JSON.
pub fn decode_atom(ty: AtomicType, value: &Value) -> Result<Value, String> {
    match ty {
        AtomicType::Uuid => wire_uuid(value)
            .map(|id| Value::String(id.to_string()))
            .ok_or_else(|| format!("expected uuid, got {value}")),
        AtomicType::String if value.is_string() => Ok(value.clone()),
        AtomicType::Boolean if value.is_boolean() => Ok(value.clone()),
        AtomicType::Integer if value.is_i64() => Ok(value.clone()),
        AtomicType::Real if value.is_number() => Ok(value.clone()),
        _ => Err(format!("expected {}, got {}", type_name(ty), value)),
    }
}

/// The id inside `["uuid", id]` or `["named-uuid", id]`.
pub fn wire_uuid(value: &Value) -> Option<&str> {
    match value.as_array().map(Vec::as_slice) {
        Some([tag, Value::String(id)]) if tag == "uuid" || tag == "named-uuid" => Some(id.as_str()),
        _ => None,
    }
}

/// Elements of a wire set. A bare atom is a one-element set.
pub fn set_elements(value: &Value) -> Vec<&Value> {
    match value.as_array().map(Vec::as_slice) {
        Some([tag, Value::Array(elements)]) if tag == "set" => elements.iter().collect(),
        _ => vec![value],
    }
}

/// Pairs of a wire map.
pub fn map_pairs(value: &Value) -> Option<Vec<(&Value, &Value)>> {
    let Some([tag, Value::Array(pairs)]) = value.as_array().map(Vec::as_slice) else {
        return None;
    };
    if tag != "map" {
        return None;
    }
    pairs
        .iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([k, v]) => Some((k, v)),
            _ => None,
        })
        .collect()
}

/// Decode one column value according to its declared type.
pub fn decode_value(ty: ColumnType, value: &Value) -> Result<Value, String> {
    if ty.is_map() {
        let value_ty = ty.value.unwrap_or(AtomicType::String);
        let pairs = map_pairs(value).ok_or_else(|| format!("expected map, got {value}"))?;
        let mut out = Map::new();
        for (k, v) in pairs {
            let key = match decode_atom(ty.key, k)? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            out.insert(key, decode_atom(value_ty, v)?);
        }
        return Ok(Value::Object(out));
    }

    let elements = set_elements(value);
    if ty.is_set() {
        return elements
            .into_iter()
            .map(|e| decode_atom(ty.key, e))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    match elements.as_slice() {
        [] if ty.min == 0 => Ok(Value::Null),
        [atom] => decode_atom(ty.key, atom),
        _ => Err(format!("expected a single {}, got {}", type_name(ty.key), value)),
    }
}

/// Best-effort decoding for columns the descriptor does not know about.
pub fn decode_untyped(value: &Value) -> Value {
    if let Some(id) = wire_uuid(value) {
        return Value::String(id.to_string());
    }
    if let Some(pairs) = map_pairs(value) {
        let out = pairs
            .into_iter()
            .map(|(k, v)| {
                let key = match decode_untyped(k) {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, decode_untyped(v))
            })
            .collect();
        return Value::Object(out);
    }
    match value.as_array().map(Vec::as_slice) {
        Some([tag, Value::Array(elements)]) if tag == "set" => {
            Value::Array(elements.iter().map(decode_untyped).collect())
        }
        _ => value.clone(),
    }
}

/// Decode a row returned by `select` into plain JSON.
pub fn decode_row(table: &TableDescriptor, raw: &Value) -> Result<Row, StoreError> {
    let object = raw.as_object().ok_or_else(|| {
        StoreError::Decode(format!("{}: row is not an object", table.name))
    })?;
    if !object.contains_key(UUID_COLUMN) {
        return Err(StoreError::Decode(format!(
            "{}: row has no {UUID_COLUMN} column",
            table.name
        )));
    }

    let mut row = Row::new();
    for (column, value) in object {
        let decoded = match table.column_type(column) {
            Some(ty) => decode_value(ty, value).map_err(|reason| {
                StoreError::Decode(format!("{}.{column}: {reason}", table.name))
            })?,
            None => decode_untyped(value),
        };
        row.insert(column.clone(), decoded);
    }
    Ok(row)
}

fn type_name(ty: AtomicType) -> &'static str {
    match ty {
        AtomicType::Integer => "integer",
        AtomicType::Real => "real",
        AtomicType::Boolean => "boolean",
        AtomicType::String => "string",
        AtomicType::Uuid => "uuid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::{Database, SchemaRegistry};

    #[test]
    fn test_encode_atoms() {
        assert_eq!(encode_atom(AtomicType::Uuid, &json!("abc")).unwrap(), json!(["uuid", "abc"]));
        assert_eq!(encode_atom(AtomicType::Integer, &json!(7)).unwrap(), json!(7));
        assert!(encode_atom(AtomicType::Integer, &json!(1.5)).is_err());
        assert!(encode_atom(AtomicType::String, &json!(7)).is_err());
    }

    #[test]
    fn test_map_helper() {
        let wire = map([(json!("name"), json!("sw0"))]);
        assert_eq!(wire, json!(["map", [["name", "sw0"]]]));
    }

    #[test]
    fn test_decode_port_binding_row() {
        let registry = SchemaRegistry::builtin(Database::OvnSouthbound);
        let table = registry.describe("Port_Binding").unwrap();
        let raw = json!({
            "_uuid": ["uuid", "0b6c9f5e-8f0e-4b2b-8d55-1c1c2c3c4c5c"],
            "logical_port": "lsp1",
            "datapath": ["uuid", "dp-1"],
            "chassis": ["set", []],
            "tag": 100,
            "mac": ["set", ["00:00:00:00:00:01 10.0.0.1", "00:00:00:00:00:02"]],
            "external_ids": ["map", [["name", "lsp1"], ["owner", "k8s"]]],
            "some_future_column": ["uuid", "x"]
        });

        let row = decode_row(table, &raw).unwrap();
        assert_eq!(row["_uuid"], json!("0b6c9f5e-8f0e-4b2b-8d55-1c1c2c3c4c5c"));
        assert_eq!(row["datapath"], json!("dp-1"));
        assert_eq!(row["chassis"], Value::Null);
        assert_eq!(row["tag"], json!(100));
        assert_eq!(row["mac"].as_array().unwrap().len(), 2);
        assert_eq!(row["external_ids"], json!({"name": "lsp1", "owner": "k8s"}));
        assert_eq!(row["some_future_column"], json!("x"));
    }

    #[test]
    fn test_decode_single_element_set_as_atom() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let port = registry.describe("Port").unwrap();
        let raw = json!({"_uuid": ["uuid", "p"], "interfaces": ["uuid", "i1"]});
        let row = decode_row(port, &raw).unwrap();
        assert_eq!(row["interfaces"], json!(["i1"]));
    }

    #[test]
    fn test_decode_integer_keyed_map() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let bridge = registry.describe("Bridge").unwrap();
        let raw = json!({"_uuid": ["uuid", "b"], "flow_tables": ["map", [[0, ["uuid", "ft0"]]]]});
        let row = decode_row(bridge, &raw).unwrap();
        assert_eq!(row["flow_tables"], json!({"0": "ft0"}));
    }

    #[test]
    fn test_decode_rejects_bad_rows() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let bridge = registry.describe("Bridge").unwrap();

        assert!(matches!(decode_row(bridge, &json!([1, 2])), Err(StoreError::Decode(_))));
        assert!(matches!(
            decode_row(bridge, &json!({"name": "br0"})),
            Err(StoreError::Decode(_))
        ));
        let err = decode_row(bridge, &json!({"_uuid": ["uuid", "b"], "name": 42})).unwrap_err();
        assert!(err.to_string().contains("Bridge.name"));
    }
}
