//! Tool registry.
//!
//! Compiles the catalog into MCP tool definitions and argument validators
//! once at startup. Listing order follows the catalog.

use crate::catalog::ToolSpec;
use crate::error::CatalogError;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// A catalog entry with its compiled argument validator.
pub struct RegisteredTool {
    pub spec: ToolSpec,
    pub definition: ToolDefinition,
    validator: jsonschema::Validator,
}

impl RegisteredTool {
    fn new(spec: ToolSpec) -> Result<Self, CatalogError> {
        let input_schema = input_schema(&spec);
        let validator = jsonschema::validator_for(&input_schema).map_err(|e| CatalogError::Invalid {
            tool: spec.name.to_string(),
            reason: format!("invalid input schema: {e}"),
        })?;
        Ok(Self {
            definition: ToolDefinition {
                name: spec.name.to_string(),
                description: Some(spec.description.to_string()),
                input_schema,
                annotations: Some(ToolAnnotations::read_only()),
            },
            spec,
            validator,
        })
    }

    /// Validate arguments, collecting every violation into one message.
    pub fn validate(&self, arguments: &Value) -> Result<(), String> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(arguments)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }
}

/// `{"type": "object", "properties": {...}, "additionalProperties": false}`
/// with at most one optional string property: the filter.
pub fn input_schema(spec: &ToolSpec) -> Value {
    let mut properties = Map::new();
    if let Some(filter) = &spec.filter {
        properties.insert(
            filter.argument.to_string(),
            json!({"type": "string", "description": filter.description()}),
        );
    }
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false
    })
}

/// Registry of available MCP tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn from_specs(specs: &[ToolSpec]) -> Result<Self, CatalogError> {
        let mut registry = Self::default();
        for spec in specs {
            registry.register(*spec)?;
        }
        Ok(registry)
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, spec: ToolSpec) -> Result<(), CatalogError> {
        if self.index.contains_key(spec.name) {
            return Err(CatalogError::Duplicate(spec.name.to_string()));
        }
        let tool = RegisteredTool::new(spec)?;
        self.index.insert(spec.name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool definitions in catalog order.
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.spec.name).collect()
    }
}
