use crate::error::{IoError, Result};
use crate::format::SourceFormat;
use crate::xlsx;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use phoneclean_core::Table;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone)]
pub struct ReadReport {
    pub table: Table,
    /// Delimited lines dropped because they had more fields than the header.
    pub skipped_lines: usize,
    pub encoding: &'static str,
}

pub fn read_table_path(path: &Path) -> Result<ReadReport> {
    let format = SourceFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound(path.to_path_buf())
        } else {
            IoError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    read_table(&bytes, format)
}

/// Parses delimited text or the first worksheet of a workbook into a table of
/// string cells; no type inference.
pub fn read_table(bytes: &[u8], format: SourceFormat) -> Result<ReadReport> {
    if bytes.is_empty() {
        return Err(IoError::EmptyFile);
    }
    match format.delimiter() {
        Some(delimiter) => read_delimited(bytes, delimiter),
        None => read_workbook(bytes),
    }
}

fn read_delimited(bytes: &[u8], delimiter: u8) -> Result<ReadReport> {
    let (text, encoding) = decode(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(IoError::EmptyFile),
    };
    let width = header.len();

    let mut rows = Vec::new();
    let mut skipped_lines = 0;
    for record in records {
        let record = record?;
        if record.len() > width {
            skipped_lines += 1;
            warn!(
                line = record.position().map(|pos| pos.line()),
                fields = record.len(),
                expected = width,
                "skipping malformed line"
            );
            continue;
        }
        rows.push(record.iter().map(cell_value).collect());
    }

    Ok(ReadReport {
        table: assemble(header.iter(), rows)?,
        skipped_lines,
        encoding: encoding.name(),
    })
}

fn read_workbook(bytes: &[u8]) -> Result<ReadReport> {
    let mut records = xlsx::read_first_sheet(bytes)?.into_iter();
    let header = records.next().ok_or(IoError::EmptyFile)?;
    let rows = records
        .map(|record| record.iter().map(|cell| cell_value(cell)).collect())
        .collect();

    Ok(ReadReport {
        table: assemble(header.iter().map(String::as_str), rows)?,
        skipped_lines: 0,
        encoding: UTF_8.name(),
    })
}

// Pads short rows and drops rows with no value at all.
fn assemble<'a>(
    header: impl Iterator<Item = &'a str>,
    records: Vec<Vec<Option<String>>>,
) -> Result<Table> {
    let headers = unique_headers(header);
    let width = headers.len();
    let rows: Vec<Vec<Option<String>>> = records
        .into_iter()
        .map(|mut row| {
            row.resize(width, None);
            row
        })
        .filter(|row| row.iter().any(Option::is_some))
        .collect();

    if rows.is_empty() {
        return Err(IoError::NoDataRows);
    }
    Ok(Table::from_rows(headers, rows)?)
}

fn decode(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), UTF_8),
        Err(_) => {
            warn!("input is not valid UTF-8, decoding as windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, WINDOWS_1252)
        }
    }
}

fn cell_value(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

// Blank names become "Unnamed: <index>"; repeats get ".1", ".2", ...
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for (index, name) in raw.enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {index}")
        } else {
            trimmed.to_string()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}
