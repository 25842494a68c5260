//! `ariadne tools` - print the list tools a database exposes.

use anyhow::{Context, Result};
use ariadne_core::Database;
use ariadne_mcp::ToolRegistry;
use ariadne_mcp::catalog::catalog;

pub fn list(database: Database, schemas: bool) -> Result<()> {
    let tools = ToolRegistry::from_specs(catalog(database))
        .with_context(|| format!("Invalid tool catalog for {database}"))?;

    println!("\n{} ({} tools)\n", database.server_title(), tools.len());
    for tool in tools.iter() {
        let spec = &tool.spec;
        let filter = spec
            .filter
            .as_ref()
            .map(|f| format!("{} ({})", f.argument, f.relation.kind()))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<28} {:<20} {}", spec.name, spec.table, filter);

        if schemas {
            let schema = serde_json::to_string_pretty(&tool.definition.input_schema)?;
            for line in schema.lines() {
                println!("      {line}");
            }
        }
    }
    println!();
    Ok(())
}
