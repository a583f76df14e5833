pub mod domain;
pub mod dto;
pub mod error;
pub mod preview;
pub mod rules;
pub mod table;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use preview::{preview_table, PreviewRow, TablePreview, DEFAULT_PREVIEW_ROWS};
pub use rules::*;
pub use table::{Column, Table};
