use crate::commands::{print_json, Context};
use crate::util::{file_name, load_table, now_utc};
use anyhow::{Context as _, Result};
use clap::Args;
use phoneclean_config::AppConfig;
use phoneclean_core::dto::CleanSummaryDto;
use phoneclean_core::{clean, preview_table, CleaningRequest};
use phoneclean_io::{write_report_path, write_table_csv_path};
use phoneclean_store::SessionStore;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Contact sheet to clean (.csv, .tsv, .txt or .xlsx)
    pub file: PathBuf,
    /// Column to clean; repeat for several. Defaults to the detected phone columns.
    #[arg(long = "column", value_name = "COLUMN")]
    pub columns: Vec<String>,
    /// Merge the cleaned columns into a single merged_phone column
    #[arg(long, conflicts_with = "no_merge")]
    pub merge: bool,
    /// Keep one cleaned column per selected column
    #[arg(long)]
    pub no_merge: bool,
    /// Blank repeated numbers within each cleaned column
    #[arg(long, conflicts_with = "keep_duplicates")]
    pub remove_duplicates: bool,
    /// Leave repeated numbers in place
    #[arg(long)]
    pub keep_duplicates: bool,
    /// Drop rows with no valid number in any cleaned column
    #[arg(long, conflicts_with = "keep_empty")]
    pub drop_empty: bool,
    /// Keep rows even when no number survived cleaning
    #[arg(long)]
    pub keep_empty: bool,
    /// Write numbers as +91XXXXXXXXXX
    #[arg(long, conflicts_with = "no_whatsapp")]
    pub whatsapp: bool,
    #[arg(long)]
    pub no_whatsapp: bool,
    /// Prefix numbers with 91
    #[arg(long, conflicts_with = "no_country_code")]
    pub country_code: bool,
    #[arg(long)]
    pub no_country_code: bool,
    /// Accept 10-digit numbers that do not start with 6, 7, 8 or 9
    #[arg(long, conflicts_with = "national_only")]
    pub allow_international: bool,
    /// Only accept mobile numbers starting with 6, 7, 8 or 9
    #[arg(long)]
    pub national_only: bool,
    /// Output CSV path; defaults to <stem>_cleaned.csv next to the input
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
    /// Also write a text summary report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

pub fn clean_file(ctx: &Context<'_>, args: CleanArgs) -> Result<()> {
    let table = load_table(&args.file)?;
    let selected = if args.columns.is_empty() {
        let detected = ctx.config.detection.classifier().detect(&table);
        debug!(columns = ?detected, "using detected phone columns");
        detected
    } else {
        args.columns.clone()
    };
    let request = build_request(ctx.config, &args, selected);

    let mut store = SessionStore::new();
    let id = store.create(file_name(&args.file), table, now_utc());
    let original = &store.get(id)?.original;
    let before_preview = preview_table(original, ctx.config.preview_rows);
    let outcome = clean(original, &request)
        .with_context(|| format!("clean {}", args.file.display()))?;

    let session = store.record_cleaning(id, outcome)?;
    let cleaned = session.cleaned_table()?;
    let metrics = session.cleaned_metrics()?;

    let out = args
        .out
        .unwrap_or_else(|| args.file.with_file_name(session.export_filename()));
    write_table_csv_path(cleaned, &out)
        .with_context(|| format!("write cleaned file {}", out.display()))?;
    if let Some(report) = &args.report {
        write_report_path(&session.filename, &metrics, report)
            .with_context(|| format!("write report {}", report.display()))?;
    }
    debug!(session = %id, output = %out.display(), "cleaned file written");

    if ctx.json {
        let summary = CleanSummaryDto {
            session_id: id.to_string(),
            filename: session.filename.clone(),
            metrics,
            cleaned_columns: session.cleaned_columns.clone(),
            before_preview,
            after_preview: preview_table(cleaned, ctx.config.preview_rows),
            output: Some(out.display().to_string()),
            report: args.report.as_ref().map(|path| path.display().to_string()),
        };
        return print_json(&summary);
    }

    println!(
        "Cleaned {}: {} records, {} valid, {} invalid, {} duplicates removed, {} rows written",
        session.filename,
        metrics.total_records,
        metrics.valid_numbers,
        metrics.invalid_removed,
        metrics.duplicates_removed,
        metrics.rows_after_cleaning
    );
    println!("Columns: {}", session.cleaned_columns.join(", "));
    println!("Output written to {}", out.display());
    if let Some(report) = &args.report {
        println!("Report written to {}", report.display());
    }
    Ok(())
}

fn build_request(config: &AppConfig, args: &CleanArgs, selected: Vec<String>) -> CleaningRequest {
    let mut request = CleaningRequest::new(selected);
    request.format = config.format;
    request.format.keep_national_only = switch(
        args.national_only,
        args.allow_international,
        config.format.keep_national_only,
    );
    request.format.include_country_code = switch(
        args.country_code,
        args.no_country_code,
        config.format.include_country_code,
    );
    request.format.whatsapp_format =
        switch(args.whatsapp, args.no_whatsapp, config.format.whatsapp_format);
    request.merge_columns = switch(args.merge, args.no_merge, config.cleaning.merge_columns);
    request.remove_duplicates = switch(
        args.remove_duplicates,
        args.keep_duplicates,
        config.cleaning.remove_duplicates,
    );
    request.drop_empty_rows =
        switch(args.drop_empty, args.keep_empty, config.cleaning.drop_empty_rows);
    request
}

fn switch(on: bool, off: bool, configured: bool) -> bool {
    if off {
        false
    } else if on {
        true
    } else {
        configured
    }
}
