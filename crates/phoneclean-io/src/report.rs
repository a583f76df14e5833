use crate::error::{IoError, Result};
use crate::export::ensure_parent_dir;
use phoneclean_core::CleaningMetrics;
use std::fs;
use std::path::Path;

const RULE_WIDTH: usize = 40;

pub fn render_report(filename: &str, metrics: &CleaningMetrics) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    [
        "PhoneClean - Cleaning Summary Report".to_string(),
        rule.clone(),
        format!("Original File     : {filename}"),
        format!("Total Records     : {}", metrics.total_records),
        format!("Valid Numbers     : {}", metrics.valid_numbers),
        format!("Invalid Removed   : {}", metrics.invalid_removed),
        format!("Duplicates Removed: {}", metrics.duplicates_removed),
        format!("Rows After Clean  : {}", metrics.rows_after_cleaning),
        rule,
        "Generated by PhoneClean".to_string(),
    ]
    .join("\n")
}

pub fn write_report_path(filename: &str, metrics: &CleaningMetrics, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, render_report(filename, metrics)).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}
