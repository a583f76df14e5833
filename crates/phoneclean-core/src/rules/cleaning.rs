use crate::domain::phone::{normalize_column, FormatConfig};
use crate::error::{CoreError, Result};
use crate::table::{Column, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub const DERIVED_SUFFIX: &str = "_cleaned";
pub const MERGED_COLUMN: &str = "merged_phone";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningRequest {
    pub selected_columns: Vec<String>,
    pub format: FormatConfig,
    pub merge_columns: bool,
    pub remove_duplicates: bool,
    pub drop_empty_rows: bool,
}

impl CleaningRequest {
    pub fn new<I, S>(selected_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_columns: selected_columns.into_iter().map(Into::into).collect(),
            format: FormatConfig::default(),
            merge_columns: false,
            remove_duplicates: true,
            drop_empty_rows: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleaningMetrics {
    pub total_records: usize,
    pub valid_numbers: usize,
    pub invalid_removed: usize,
    pub duplicates_removed: usize,
    pub rows_after_cleaning: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningOutcome {
    pub table: Table,
    pub metrics: CleaningMetrics,
    /// Derived or merged columns present in `table`, in selection order.
    pub cleaned_columns: Vec<String>,
}

pub fn derived_column_name(source: &str) -> String {
    format!("{source}{DERIVED_SUFFIX}")
}

pub fn clean(table: &Table, request: &CleaningRequest) -> Result<CleaningOutcome> {
    let sources = resolve_selection(table, &request.selected_columns)?;
    let total_records = table.height();

    let derived: Vec<Column> = sources
        .iter()
        .map(|source| {
            Column::new(
                derived_column_name(source.name()),
                normalize_column(source.values(), &request.format),
            )
        })
        .collect();

    let invalid_removed = (0..total_records)
        .filter(|&row| derived.iter().all(|column| column.get(row).is_none()))
        .count();

    let derived_names: Vec<String> = derived.iter().map(|c| c.name().to_string()).collect();
    let mut output = table.clone();
    let mut cleaned = derived;
    if request.merge_columns && cleaned.len() > 1 {
        output = output.without_columns(&derived_names);
        cleaned = vec![merge_first_valid(&cleaned, total_records)];
    }

    let mut duplicates_removed = 0;
    if request.remove_duplicates {
        cleaned = cleaned
            .into_iter()
            .map(|column| {
                let (column, removed) = null_duplicates(column);
                duplicates_removed += removed;
                column
            })
            .collect();
    }

    let cleaned_columns: Vec<String> = cleaned.iter().map(|c| c.name().to_string()).collect();
    for column in cleaned {
        output = output.with_column(column)?;
    }

    if request.drop_empty_rows {
        let keep = rows_with_any_value(&output, &cleaned_columns);
        output = output.retain_rows(&keep);
    }

    let valid_numbers = rows_with_any_value(&output, &cleaned_columns)
        .into_iter()
        .filter(|present| *present)
        .count();

    let metrics = CleaningMetrics {
        total_records,
        valid_numbers,
        invalid_removed,
        duplicates_removed,
        rows_after_cleaning: output.height(),
    };
    debug!(
        total = metrics.total_records,
        valid = metrics.valid_numbers,
        invalid = metrics.invalid_removed,
        duplicates = metrics.duplicates_removed,
        rows = metrics.rows_after_cleaning,
        "cleaning finished"
    );

    Ok(CleaningOutcome {
        table: output,
        metrics,
        cleaned_columns,
    })
}

fn resolve_selection<'a>(table: &'a Table, selected: &[String]) -> Result<Vec<&'a Column>> {
    if selected.is_empty() {
        return Err(CoreError::NoColumnsSelected);
    }
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(selected.len());
    for name in selected {
        let column = table
            .column(name)
            .ok_or_else(|| CoreError::ColumnNotFound(name.clone()))?;
        if seen.insert(name.as_str()) {
            columns.push(column);
        }
    }
    Ok(columns)
}

fn is_usable(value: &str) -> bool {
    let trimmed = value.trim();
    !(trimmed.is_empty() || trimmed == "nan" || trimmed == "None")
}

fn merge_first_valid(columns: &[Column], height: usize) -> Column {
    let values = (0..height)
        .map(|row| {
            columns
                .iter()
                .filter_map(|column| column.get(row))
                .find(|value| is_usable(value))
                .map(str::to_string)
        })
        .collect();
    Column::new(MERGED_COLUMN, values)
}

fn null_duplicates(column: Column) -> (Column, usize) {
    let name = column.name().to_string();
    let mut seen: HashSet<String> = HashSet::new();
    let mut removed = 0;
    let values = column
        .into_values()
        .into_iter()
        .map(|value| match value {
            Some(value) if !seen.insert(value.clone()) => {
                removed += 1;
                None
            }
            other => other,
        })
        .collect();
    (Column::new(name, values), removed)
}

fn rows_with_any_value(table: &Table, names: &[String]) -> Vec<bool> {
    let columns: Vec<&Column> = names.iter().filter_map(|name| table.column(name)).collect();
    (0..table.height())
        .map(|row| columns.iter().any(|column| column.get(row).is_some()))
        .collect()
}
