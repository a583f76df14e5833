use phoneclean_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("spreadsheet archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("spreadsheet xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("spreadsheet xml encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),
    #[error("spreadsheet xml attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("invalid workbook: {0}")]
    InvalidWorkbook(String),
    #[error("unsupported file type '.{0}', expected .csv, .tsv, .txt or .xlsx")]
    UnsupportedFileType(String),
    #[error("the file is empty")]
    EmptyFile,
    #[error("the file has no data rows")]
    NoDataRows,
}

pub type Result<T> = std::result::Result<T, IoError>;
