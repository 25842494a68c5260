//! `ariadne schema` - print the table descriptors a server would use.

use super::{endpoint, open_registry};
use anyhow::{Result, bail};
use ariadne_core::{AriadneConfig, TableDescriptor};

pub async fn print(config: AriadneConfig, table: Option<&str>) -> Result<()> {
    let registry = open_registry(&config).await?;

    if let Some(name) = table {
        let Ok(descriptor) = registry.describe(name) else {
            bail!("{} has no table named {name}", config.database.db_name());
        };
        println!("{}", serde_json::to_string_pretty(descriptor)?);
        return Ok(());
    }

    println!(
        "\n{} via {:?} schema ({} tables, endpoint {})\n",
        config.database.db_name(),
        config.store.schema,
        registry.len(),
        endpoint(&config)?,
    );
    let mut tables: Vec<&TableDescriptor> = registry.tables().collect();
    tables.sort_by(|a, b| a.name.cmp(&b.name));
    for descriptor in tables {
        println!("  {:<24} {}", descriptor.name, summary(descriptor));
    }
    println!();
    Ok(())
}

fn summary(descriptor: &TableDescriptor) -> String {
    let mut parts = vec![format!("{} columns", descriptor.columns.len())];
    if let Some(name) = &descriptor.name_column {
        parts.push(format!("name={name}"));
    }
    if descriptor.external_ids_column.is_some() {
        parts.push("external_ids".to_string());
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::{Database, SchemaRegistry};

    #[test]
    fn test_summary_names_designated_columns() {
        let registry = SchemaRegistry::builtin(Database::OvnIcSouthbound);
        let datapath = registry.describe("Datapath_Binding").unwrap();
        assert_eq!(summary(datapath), "3 columns, name=transit_switch, external_ids");

        let zone = registry.describe("Availability_Zone").unwrap();
        assert_eq!(summary(zone), "1 columns, name=name");
    }
}
