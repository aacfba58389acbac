use anyhow::Result;
use serde::Serialize;

use snapsheet_core::{SheetConfig, SnapPointTable};

use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct TableRow {
    index: usize,
    spec: String,
    offset: f64,
    normalized_position: f64,
}

pub fn run(config: &SheetConfig, format: OutputFormat) -> Result<()> {
    config.validate()?;
    let table = SnapPointTable::resolve(&config.snap_points, config.container_height, config.top_inset)?;

    let rows: Vec<TableRow> = config
        .snap_points
        .iter()
        .zip(table.points())
        .enumerate()
        .map(|(index, (spec, &offset))| TableRow {
            index,
            spec: spec.to_string(),
            offset,
            normalized_position: table.normalize(offset),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            println!(
                "Snap points ({}) in a {} pt container, top inset {}:\n",
                rows.len(),
                config.container_height,
                config.top_inset
            );
            for row in &rows {
                let marker = if row.index == config.initial_snap_index {
                    " (initial)"
                } else {
                    ""
                };
                println!(
                    "  [{}] {:>8} -> {:>8.1}  position {:.3}{}",
                    row.index, row.spec, row.offset, row.normalized_position, marker
                );
            }
        }
    }

    Ok(())
}
