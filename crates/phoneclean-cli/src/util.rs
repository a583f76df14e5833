use anyhow::{Context as _, Result};
use chrono::Utc;
use phoneclean_core::Table;
use phoneclean_io::read_table_path;
use std::path::Path;
use tracing::debug;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_table(path: &Path) -> Result<Table> {
    let report = read_table_path(path).with_context(|| format!("read {}", path.display()))?;
    debug!(
        path = %path.display(),
        encoding = report.encoding,
        rows = report.table.height(),
        columns = report.table.width(),
        skipped = report.skipped_lines,
        "table loaded"
    );
    Ok(report.table)
}

pub fn format_cell(value: Option<&str>) -> &str {
    value.unwrap_or("")
}
