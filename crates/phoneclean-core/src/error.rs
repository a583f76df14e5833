use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no columns selected for cleaning")]
    NoColumnsSelected,
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
