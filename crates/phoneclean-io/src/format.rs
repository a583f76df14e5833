use crate::error::{IoError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    Xlsx,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "tsv" | "txt" => Ok(SourceFormat::Tsv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            _ => Err(IoError::UnsupportedFileType(ext)),
        }
    }

    /// Field separator for delimited text; `None` for workbooks.
    pub const fn delimiter(self) -> Option<u8> {
        match self {
            SourceFormat::Csv => Some(b','),
            SourceFormat::Tsv => Some(b'\t'),
            SourceFormat::Xlsx => None,
        }
    }
}
