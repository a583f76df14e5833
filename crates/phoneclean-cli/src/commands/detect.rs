use crate::commands::{print_json, Context};
use crate::util::{file_name, load_table};
use anyhow::Result;
use clap::Args;
use phoneclean_core::dto::DetectionDto;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DetectArgs {
    pub file: PathBuf,
}

pub fn detect(ctx: &Context<'_>, args: DetectArgs) -> Result<()> {
    let table = load_table(&args.file)?;
    let detected = ctx.config.detection.classifier().detect(&table);

    let dto = DetectionDto {
        filename: file_name(&args.file),
        total_rows: table.height(),
        detected_phone_columns: detected,
        all_columns: table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    if ctx.json {
        return print_json(&dto);
    }

    if dto.detected_phone_columns.is_empty() {
        println!("No phone columns detected in {}", dto.filename);
    } else {
        println!("Phone columns in {}:", dto.filename);
        for column in &dto.detected_phone_columns {
            println!("- {}", column);
        }
    }
    println!(
        "{} rows, columns: {}",
        dto.total_rows,
        dto.all_columns.join(", ")
    );
    Ok(())
}
