//! Export the layout table as a starting point for an override file.

use std::path::Path;

use anyhow::Result;
use quakesplit_core::{LayoutEntry, LayoutTable, save_layouts};

pub fn run(table: &LayoutTable, output: Option<&Path>) -> Result<()> {
    let entries: Vec<LayoutEntry> = table.entries().cloned().collect();

    match output {
        Some(path) => {
            save_layouts(path, &entries)?;
            println!("Wrote {} layout(s) to {}", entries.len(), path.display());
        }
        None => {
            for entry in &entries {
                println!(
                    "{:<20} {:<12} module size {:#x}",
                    entry.layout.version, entry.process_name, entry.module_size
                );
                for variant in entry.total_time_variants.iter() {
                    println!("    {:<16} total time {}", variant.game_name, variant.total_time);
                }
            }
        }
    }

    Ok(())
}
