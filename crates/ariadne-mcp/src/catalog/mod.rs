//! Declarative tool catalog.
//!
//! Every list tool is a [`ToolSpec`]: which table it reads, what the result
//! collection is called, and how its optional filter argument narrows the
//! rows. Adding a listable table is a new entry here, not new control flow.
//!
//! Filters come in three shapes:
//!
//! | Relation | Lookup | Condition on the listed table |
//! |----------|--------|-------------------------------|
//! | `SelfTable` | none | name column (or `external_ids:name`) equals the filter |
//! | `ParentByName` | parent rows whose name column equals the filter | derived from each parent via its [`Link`] |
//! | `ParentByExternalId` | parent rows whose `external_ids:name` equals the filter | derived from each parent via its [`Link`] |

mod ovn_ic_nb;
mod ovn_ic_sb;
mod ovn_nb;
mod ovn_sb;
mod vswitch;

use crate::error::CatalogError;
use ariadne_core::{AtomicType, Database, SchemaRegistry, UUID_COLUMN};
use std::collections::HashSet;

/// How a parent row points at the rows being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The parent's set (or map) column holds the listed rows' uuids.
    Members { column: &'static str },
    /// The listed table's `column` equals the parent's `parent_key` column.
    Reference {
        column: &'static str,
        parent_key: &'static str,
    },
}

impl Link {
    pub const fn members(column: &'static str) -> Self {
        Link::Members { column }
    }

    /// Reference to the parent's `_uuid`.
    pub const fn reference(column: &'static str) -> Self {
        Link::Reference {
            column,
            parent_key: UUID_COLUMN,
        }
    }

    pub const fn reference_by(column: &'static str, parent_key: &'static str) -> Self {
        Link::Reference { column, parent_key }
    }
}

/// How a filter string selects rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRelation {
    /// Filter the listed table by its own name.
    SelfTable,
    /// Find parents by their name column, then follow `link`.
    ParentByName { parent: &'static str, link: Link },
    /// Find parents by `external_ids:name`, then follow `link`.
    ParentByExternalId { parent: &'static str, link: Link },
}

impl FilterRelation {
    pub fn kind(&self) -> &'static str {
        match self {
            FilterRelation::SelfTable => "self",
            FilterRelation::ParentByName { .. } => "parent-by-name",
            FilterRelation::ParentByExternalId { .. } => "parent-by-external-id",
        }
    }
}

/// The optional string argument of a list tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Argument name, e.g. `datapath_filter`.
    pub argument: &'static str,
    /// Entity the filter names, used in the empty-result context
    /// ("no datapath found with the specified filter").
    pub entity: &'static str,
    pub relation: FilterRelation,
}

impl FilterSpec {
    pub fn description(&self) -> String {
        format!("the name of the {} to filter by", self.entity)
    }
}

/// One list tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Table being listed.
    pub table: &'static str,
    /// Key of the row collection in the result.
    pub collection: &'static str,
    /// Static description of the entity type returned with every result.
    pub context: &'static str,
    pub filter: Option<FilterSpec>,
}

pub(crate) const fn by_self(argument: &'static str, entity: &'static str) -> Option<FilterSpec> {
    Some(FilterSpec {
        argument,
        entity,
        relation: FilterRelation::SelfTable,
    })
}

pub(crate) const fn by_parent_name(
    argument: &'static str,
    entity: &'static str,
    parent: &'static str,
    link: Link,
) -> Option<FilterSpec> {
    Some(FilterSpec {
        argument,
        entity,
        relation: FilterRelation::ParentByName { parent, link },
    })
}

pub(crate) const fn by_parent_external_id(
    argument: &'static str,
    entity: &'static str,
    parent: &'static str,
    link: Link,
) -> Option<FilterSpec> {
    Some(FilterSpec {
        argument,
        entity,
        relation: FilterRelation::ParentByExternalId { parent, link },
    })
}

/// Tools served for `database`.
pub fn catalog(database: Database) -> &'static [ToolSpec] {
    match database {
        Database::Vswitch => vswitch::TOOLS,
        Database::OvnNorthbound => ovn_nb::TOOLS,
        Database::OvnSouthbound => ovn_sb::TOOLS,
        Database::OvnIcNorthbound => ovn_ic_nb::TOOLS,
        Database::OvnIcSouthbound => ovn_ic_sb::TOOLS,
    }
}

/// Check every tool against the registry: listed and parent tables exist,
/// name and external-id lookups have a column to match, and link columns
/// exist with the right shape.
pub fn validate(tools: &[ToolSpec], registry: &SchemaRegistry) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for tool in tools {
        if !seen.insert(tool.name) {
            return Err(CatalogError::Duplicate(tool.name.to_string()));
        }
        validate_tool(tool, registry).map_err(|reason| CatalogError::Invalid {
            tool: tool.name.to_string(),
            reason,
        })?;
    }
    Ok(())
}

fn validate_tool(tool: &ToolSpec, registry: &SchemaRegistry) -> Result<(), String> {
    let target = registry.describe(tool.table).map_err(|e| e.to_string())?;
    let Some(filter) = tool.filter else {
        return Ok(());
    };

    let (parent, link, by_name) = match filter.relation {
        FilterRelation::SelfTable => {
            if target.name_column.is_none() && target.external_ids_column.is_none() {
                return Err(format!("{} has neither a name column nor external_ids", target.name));
            }
            return Ok(());
        }
        FilterRelation::ParentByName { parent, link } => (parent, link, true),
        FilterRelation::ParentByExternalId { parent, link } => (parent, link, false),
    };

    let parent = registry.describe(parent).map_err(|e| e.to_string())?;
    if by_name && parent.name_column.is_none() {
        return Err(format!("{} has no name column", parent.name));
    }
    if !by_name && parent.external_ids_column.is_none() {
        return Err(format!("{} has no external_ids column", parent.name));
    }

    match link {
        Link::Members { column } => {
            let ty = parent
                .column_type(column)
                .ok_or_else(|| format!("{} has no column {column}", parent.name))?;
            let holds_uuids = ty.value == Some(AtomicType::Uuid)
                || (ty.value.is_none() && ty.key == AtomicType::Uuid);
            if !holds_uuids {
                return Err(format!("{}.{column} does not hold row references", parent.name));
            }
        }
        Link::Reference { column, parent_key } => {
            let column_ty = target
                .column_type(column)
                .ok_or_else(|| format!("{} has no column {column}", target.name))?;
            let key_ty = parent
                .column_type(parent_key)
                .ok_or_else(|| format!("{} has no column {parent_key}", parent.name))?;
            if column_ty.is_map() || key_ty.is_map() || column_ty.key != key_ty.key {
                return Err(format!(
                    "{}.{column} cannot be compared with {}.{parent_key}",
                    target.name, parent.name
                ));
            }
        }
    }
    Ok(())
}
