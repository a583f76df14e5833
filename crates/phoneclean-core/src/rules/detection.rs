use crate::domain::phone::decimal_digit;
use crate::table::Table;
use std::ops::RangeInclusive;

pub const PHONE_COLUMN_KEYWORDS: &[&str] = &[
    "phone",
    "mobile",
    "cell",
    "contact",
    "number",
    "mob",
    "ph",
    "tel",
    "whatsapp",
    "num",
    "fone",
    "mobi",
    "mobile no",
    "alternate mobile",
    "alt mobile",
    "mobile number",
    "phone number",
    "contact no",
    "contact number",
    "alternate no",
    "alt no",
    "primary",
    "secondary",
    "emergenc",
];

pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_DIGIT_RANGE: RangeInclusive<usize> = 7..=15;
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Decides whether a column holds phone numbers, by name first and content second.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnClassifier {
    keywords: Vec<String>,
    sample_size: usize,
    digit_range: RangeInclusive<usize>,
    threshold: f64,
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self {
            keywords: PHONE_COLUMN_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            digit_range: DEFAULT_DIGIT_RANGE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ColumnClassifier {
    pub fn with_keywords<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in extra {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_digit_range(mut self, digit_range: RangeInclusive<usize>) -> Self {
        self.digit_range = digit_range;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn name_matches(&self, column_name: &str) -> bool {
        let name = column_name.trim().to_lowercase();
        self.keywords.iter().any(|kw| name.contains(kw.as_str()))
    }

    /// Fraction of the sampled present values whose digit count is in range.
    pub fn content_score(&self, values: &[Option<String>]) -> Option<f64> {
        let lengths: Vec<usize> = values
            .iter()
            .flatten()
            .take(self.sample_size)
            .map(|value| value.chars().filter(|c| decimal_digit(*c).is_some()).count())
            .collect();
        if lengths.is_empty() {
            return None;
        }
        let hits = lengths
            .iter()
            .filter(|len| self.digit_range.contains(*len))
            .count();
        Some(hits as f64 / lengths.len() as f64)
    }

    pub fn is_phone_column(&self, column_name: &str, values: &[Option<String>]) -> bool {
        if self.name_matches(column_name) {
            return true;
        }
        self.content_score(values)
            .is_some_and(|score| score > self.threshold)
    }

    pub fn detect(&self, table: &Table) -> Vec<String> {
        table
            .columns()
            .iter()
            .filter(|column| self.is_phone_column(column.name(), column.values()))
            .map(|column| column.name().to_string())
            .collect()
    }
}

pub fn is_phone_column(column_name: &str, values: &[Option<String>]) -> bool {
    ColumnClassifier::default().is_phone_column(column_name, values)
}

pub fn detect_phone_columns(table: &Table) -> Vec<String> {
    ColumnClassifier::default().detect(table)
}

#[cfg(test)]
mod tests {
    use super::{is_phone_column, ColumnClassifier};

    fn values(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn keyword_name_wins_regardless_of_content() {
        assert!(is_phone_column("Mobile No.", &values(&["n/a", "none"])));
        assert!(is_phone_column("  EMERGENCY contact ", &[]));
    }

    #[test]
    fn short_numbers_are_not_phone_columns() {
        assert!(!is_phone_column("Age", &values(&["34", "29", "41"])));
    }

    #[test]
    fn empty_sample_is_not_a_phone_column() {
        assert!(!is_phone_column("Notes", &[None, None]));
    }

    #[test]
    fn content_above_threshold_is_detected() {
        let mut notes = vec![Some("call back later".to_string()); 30];
        notes.extend(values(&["9876543210"; 20]));
        assert!(is_phone_column("Notes", &notes));
    }

    #[test]
    fn content_at_threshold_is_not_detected() {
        let mut notes = values(&["hello"; 7]);
        notes.extend(values(&["98765 43210"; 3]));
        assert!(!is_phone_column("Notes", &notes));
    }

    #[test]
    fn sample_only_covers_first_present_values() {
        let classifier = ColumnClassifier::default().with_sample_size(2);
        let mut column = vec![None, Some("x".to_string()), Some("y".to_string())];
        column.extend(values(&["9876543210"; 10]));
        assert_eq!(classifier.content_score(&column), Some(0.0));
    }

    #[test]
    fn content_score_counts_devanagari_digits() {
        let classifier = ColumnClassifier::default();
        let column = values(&["९८७६५४३२१०", "९८७६५ ४३२१०"]);
        assert_eq!(classifier.content_score(&column), Some(1.0));
    }

    #[test]
    fn extra_keywords_extend_the_list() {
        let classifier = ColumnClassifier::default().with_keywords(["Handy"]);
        assert!(classifier.name_matches("handy nummer"));
        assert!(!ColumnClassifier::default().name_matches("Handy"));
    }
}
