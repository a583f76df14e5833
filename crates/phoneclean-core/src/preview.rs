use crate::table::Table;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// One previewed row; serializes as an object in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewRow {
    cells: Vec<(String, Option<String>)>,
}

impl PreviewRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

impl Serialize for PreviewRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<PreviewRow>,
    pub total_rows: usize,
}

pub fn preview_table(table: &Table, max_rows: usize) -> TablePreview {
    let columns: Vec<String> = table
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let rows = (0..table.height().min(max_rows))
        .map(|row| PreviewRow {
            cells: table
                .columns()
                .iter()
                .map(|column| (column.name().to_string(), display_value(column.get(row))))
                .collect(),
        })
        .collect();

    TablePreview {
        columns,
        rows,
        total_rows: table.height(),
    }
}

fn display_value(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{preview_table, DEFAULT_PREVIEW_ROWS};
    use crate::table::{Column, Table};

    fn table(rows: usize) -> Table {
        let names: Vec<Option<String>> = (0..rows).map(|i| Some(format!(" n{i} "))).collect();
        let phones: Vec<Option<String>> = (0..rows)
            .map(|i| match i % 3 {
                0 => Some("nan".to_string()),
                1 => Some(String::new()),
                _ => None,
            })
            .collect();
        Table::new(vec![Column::new("name", names), Column::new("phone", phones)]).expect("table")
    }

    #[test]
    fn preview_limits_rows_and_reports_total() {
        let preview = preview_table(&table(25), DEFAULT_PREVIEW_ROWS);
        assert_eq!(preview.rows.len(), 20);
        assert_eq!(preview.total_rows, 25);
        assert_eq!(preview.columns, vec!["name", "phone"]);
    }

    #[test]
    fn preview_trims_and_blanks_values() {
        let preview = preview_table(&table(3), 10);
        assert_eq!(preview.rows[0].get("name"), Some("n0"));
        for row in &preview.rows {
            assert_eq!(row.get("phone"), None);
        }
    }

    #[test]
    fn preview_row_serializes_in_column_order() {
        let preview = preview_table(&table(1), 1);
        let json = serde_json::to_string(&preview.rows[0]).expect("json");
        assert_eq!(json, r#"{"name":"n0","phone":null}"#);
    }
}
