use crate::error::{IoError, Result};
use phoneclean_core::Table;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes the header row and every data row; absent cells become empty fields.
pub fn write_table_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.column_names())?;
    for row in 0..table.height() {
        out.write_record((0..table.width()).map(|column| table.cell(row, column).unwrap_or("")))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_table_csv_path(table: &Table, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_table_csv(table, file)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| IoError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
