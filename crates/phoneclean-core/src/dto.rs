use crate::preview::TablePreview;
use crate::rules::CleaningMetrics;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionDto {
    pub filename: String,
    pub total_rows: usize,
    pub detected_phone_columns: Vec<String>,
    pub all_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanSummaryDto {
    pub session_id: String,
    pub filename: String,
    pub metrics: CleaningMetrics,
    pub cleaned_columns: Vec<String>,
    pub before_preview: TablePreview,
    pub after_preview: TablePreview,
    pub output: Option<String>,
    pub report: Option<String>,
}
