//! `tide tables`: list the lake's current tables and columns.

use tide_config::TideConfig;

use crate::bootstrap;
use crate::cli::TablesArgs;

pub fn handle(args: &TablesArgs, config: &TideConfig) -> anyhow::Result<()> {
    let store = bootstrap::open_store(config)?;
    let catalog = store.catalog();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("(the lake exposes no tables)");
        return Ok(());
    }

    for (table, columns) in catalog.iter() {
        println!("{table}");
        for column in columns {
            println!("  {column}");
        }
    }
    Ok(())
}
