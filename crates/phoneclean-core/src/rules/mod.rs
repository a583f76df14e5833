pub mod cleaning;
pub mod detection;

pub use cleaning::{
    clean, derived_column_name, CleaningMetrics, CleaningOutcome, CleaningRequest, DERIVED_SUFFIX,
    MERGED_COLUMN,
};
pub use detection::{
    detect_phone_columns, is_phone_column, ColumnClassifier, DEFAULT_DIGIT_RANGE,
    DEFAULT_SAMPLE_SIZE, DEFAULT_THRESHOLD, PHONE_COLUMN_KEYWORDS,
};
