pub mod error;
pub mod export;
pub mod format;
pub mod ingest;
pub mod report;
mod xlsx;

pub use error::{IoError, Result};
pub use export::{write_table_csv, write_table_csv_path};
pub use format::SourceFormat;
pub use ingest::{read_table, read_table_path, ReadReport};
pub use report::{render_report, write_report_path};
