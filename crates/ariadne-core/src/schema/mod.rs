//! Schema Registry.
//!
//! A [`SchemaRegistry`] describes every table of one OVSDB database: its
//! columns and their OVSDB types, plus which column carries the human-facing
//! name and which map holds external identifiers. It is built once at
//! startup, either from the compiled-in descriptors ([`SchemaRegistry::builtin`])
//! or from an `.ovsschema` document, and never mutated afterwards.

mod builtin;
mod ovsschema;

use crate::database::Database;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Every OVSDB row carries this implicit column.
pub const UUID_COLUMN: &str = "_uuid";

/// Key of the external-ids entry that holds a human-facing name.
pub const EXTERNAL_NAME_KEY: &str = "name";

/// OVSDB atomic types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomicType {
    Integer,
    Real,
    Boolean,
    String,
    Uuid,
}

impl AtomicType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "integer" => Some(AtomicType::Integer),
            "real" => Some(AtomicType::Real),
            "boolean" => Some(AtomicType::Boolean),
            "string" => Some(AtomicType::String),
            "uuid" => Some(AtomicType::Uuid),
            _ => None,
        }
    }
}

/// OVSDB column type: a key type, an optional value type (maps), and
/// cardinality bounds. `max == None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub key: AtomicType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AtomicType>,
    pub min: u32,
    pub max: Option<u32>,
}

impl ColumnType {
    /// Exactly one value.
    pub const fn scalar(key: AtomicType) -> Self {
        Self { key, value: None, min: 1, max: Some(1) }
    }

    /// Zero or one value.
    pub const fn optional(key: AtomicType) -> Self {
        Self { key, value: None, min: 0, max: Some(1) }
    }

    /// Unbounded set.
    pub const fn set(key: AtomicType) -> Self {
        Self { key, value: None, min: 0, max: None }
    }

    /// Unbounded map.
    pub const fn map(key: AtomicType, value: AtomicType) -> Self {
        Self { key, value: Some(value), min: 0, max: None }
    }

    pub fn is_map(&self) -> bool {
        self.value.is_some()
    }

    /// A set column that may hold more than one element.
    pub fn is_set(&self) -> bool {
        !self.is_map() && self.max != Some(1)
    }

    /// A single value that may be absent.
    pub fn is_optional(&self) -> bool {
        !self.is_map() && self.max == Some(1) && self.min == 0
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_map() && self.max == Some(1) && self.min == 1
    }

    /// A string column holding at most one value: usable as a name.
    fn is_single_string(&self) -> bool {
        self.key == AtomicType::String && !self.is_map() && self.max == Some(1)
    }

    fn is_string_map(&self) -> bool {
        self.key == AtomicType::String && self.value == Some(AtomicType::String)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Immutable description of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    /// Declared columns in schema order. `_uuid` is implicit and not listed.
    pub columns: Vec<ColumnDescriptor>,
    /// Column that carries the human-facing name, if any.
    pub name_column: Option<String>,
    /// String-to-string map of external identifiers, if any.
    pub external_ids_column: Option<String>,
}

impl TableDescriptor {
    /// Build a descriptor and infer the designated columns: `name` (or the
    /// database's override) when it is a single string, and `external_ids`
    /// when it is a string map.
    pub fn new(database: Database, name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        let name = name.into();
        let wanted_name = database.name_column_override(&name).unwrap_or("name");

        let name_column = columns
            .iter()
            .find(|c| c.name == wanted_name && c.ty.is_single_string())
            .map(|c| c.name.clone());
        let external_ids_column = columns
            .iter()
            .find(|c| c.name == "external_ids" && c.ty.is_string_map())
            .map(|c| c.name.clone());

        Self {
            name,
            columns,
            name_column,
            external_ids_column,
        }
    }

    /// Type of a column, including the implicit `_uuid`.
    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        if column == UUID_COLUMN {
            return Some(ColumnType::scalar(AtomicType::Uuid));
        }
        self.columns.iter().find(|c| c.name == column).map(|c| c.ty)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_type(column).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Errors raised by the Schema Registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The table is not part of this database's schema.
    #[error("unknown table '{table}' in database {database}")]
    UnknownTable { database: String, table: String },

    /// The schema document describes a different database.
    #[error("schema describes database '{found}', expected '{expected}'")]
    DatabaseMismatch { expected: String, found: String },

    /// The schema document is malformed.
    #[error("invalid schema: {0}")]
    Parse(String),

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-database table descriptors, keyed by table name.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    database: Database,
    tables: BTreeMap<String, TableDescriptor>,
}

impl SchemaRegistry {
    /// Registry built from an explicit table list.
    pub fn from_tables(database: Database, tables: impl IntoIterator<Item = TableDescriptor>) -> Self {
        Self {
            database,
            tables: tables.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    /// Registry built from the compiled-in descriptors.
    pub fn builtin(database: Database) -> Self {
        Self::from_tables(database, builtin::tables(database))
    }

    /// Registry built from an OVSDB schema document (the contents of an
    /// `.ovsschema` file or the reply to `get_schema`).
    pub fn from_ovsschema(database: Database, document: &serde_json::Value) -> Result<Self, SchemaError> {
        let tables = ovsschema::parse(database, document)?;
        Ok(Self::from_tables(database, tables))
    }

    /// Registry built from an `.ovsschema` file on disk.
    pub fn from_ovsschema_file(database: Database, path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&content)?;
        Self::from_ovsschema(database, &document)
    }

    pub fn database(&self) -> Database {
        self.database
    }

    /// Look up a table, failing with [`SchemaError::UnknownTable`].
    pub fn describe(&self, table: &str) -> Result<&TableDescriptor, SchemaError> {
        self.tables.get(table).ok_or_else(|| SchemaError::UnknownTable {
            database: self.database.db_name().to_string(),
            table: table.to_string(),
        })
    }

    /// Tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_and_unknown() {
        let registry = SchemaRegistry::builtin(Database::Vswitch);
        let bridge = registry.describe("Bridge").unwrap();
        assert_eq!(bridge.name_column.as_deref(), Some("name"));
        assert_eq!(bridge.external_ids_column.as_deref(), Some("external_ids"));

        let err = registry.describe("Logical_Switch").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTable { ref table, .. } if table == "Logical_Switch"));
    }

    #[test]
    fn test_uuid_is_implicit() {
        let registry = SchemaRegistry::builtin(Database::OvnNorthbound);
        let ls = registry.describe("Logical_Switch").unwrap();
        assert!(ls.column_names().all(|c| c != UUID_COLUMN));
        assert_eq!(ls.column_type(UUID_COLUMN), Some(ColumnType::scalar(AtomicType::Uuid)));
    }

    #[test]
    fn test_column_classification() {
        assert!(ColumnType::scalar(AtomicType::String).is_scalar());
        assert!(ColumnType::optional(AtomicType::Uuid).is_optional());
        assert!(ColumnType::set(AtomicType::Uuid).is_set());
        assert!(ColumnType::map(AtomicType::String, AtomicType::String).is_map());
        assert!(!ColumnType::map(AtomicType::String, AtomicType::String).is_set());
    }

    #[test]
    fn test_southbound_datapath_has_no_name_column() {
        let registry = SchemaRegistry::builtin(Database::OvnSouthbound);
        let dp = registry.describe("Datapath_Binding").unwrap();
        assert_eq!(dp.name_column, None);
        assert_eq!(dp.external_ids_column.as_deref(), Some("external_ids"));
    }

    #[test]
    fn test_ic_southbound_datapath_named_by_transit_switch() {
        let registry = SchemaRegistry::builtin(Database::OvnIcSouthbound);
        let dp = registry.describe("Datapath_Binding").unwrap();
        assert_eq!(dp.name_column.as_deref(), Some("transit_switch"));
    }

    #[test]
    fn test_every_builtin_registry_is_populated() {
        for db in Database::ALL {
            let registry = SchemaRegistry::builtin(db);
            assert!(!registry.is_empty(), "{db} has no tables");
            assert_eq!(registry.database(), db);
        }
    }
}
