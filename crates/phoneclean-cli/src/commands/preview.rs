use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{format_cell, load_table};
use anyhow::Result;
use clap::Args;
use phoneclean_core::{preview_table, TablePreview};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    pub file: PathBuf,
    /// Number of rows to show; defaults to the configured preview_rows
    #[arg(long)]
    pub rows: Option<usize>,
}

pub fn preview(ctx: &Context<'_>, args: PreviewArgs) -> Result<()> {
    let max_rows = args.rows.unwrap_or(ctx.config.preview_rows);
    if max_rows == 0 {
        return Err(invalid_input("--rows must be positive"));
    }

    let table = load_table(&args.file)?;
    let preview = preview_table(&table, max_rows);

    if ctx.json {
        return print_json(&preview);
    }

    print_preview(&preview);
    Ok(())
}

pub fn print_preview(preview: &TablePreview) {
    println!("{}", preview.columns.join(" | "));
    for row in &preview.rows {
        let cells: Vec<&str> = row.iter().map(|(_, value)| format_cell(value)).collect();
        println!("{}", cells.join(" | "));
    }
    println!(
        "Showing {} of {} rows",
        preview.rows.len(),
        preview.total_rows
    );
}
