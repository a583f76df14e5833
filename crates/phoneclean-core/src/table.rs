use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    name: String,
    values: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn from_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::new(name, values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(|value| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }

    fn select(&self, keep: &[bool]) -> Column {
        let values = self
            .values
            .iter()
            .zip(keep)
            .filter(|(_, keep)| **keep)
            .map(|(value, _)| value.clone())
            .collect();
        Column::new(self.name.clone(), values)
    }
}

/// Named columns of optional string cells, all of the same height.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map(Column::len).unwrap_or(0);
        for column in &columns {
            if column.len() != height {
                return Err(CoreError::RaggedTable {
                    column: column.name.clone(),
                    expected: height,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, height })
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let width = headers.len();
        let mut values: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); width];
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(CoreError::RowWidth {
                    row: index,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (slot, cell) in values.iter_mut().zip(row) {
                slot.push(cell);
            }
        }
        let columns = headers
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Self::new(columns)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.columns.get(column).and_then(|column| column.get(row))
    }

    /// Adds `column`, replacing an existing column of the same name in place.
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        if !self.columns.is_empty() && column.len() != self.height {
            return Err(CoreError::RaggedTable {
                column: column.name,
                expected: self.height,
                actual: column.values.len(),
            });
        }
        if self.columns.is_empty() {
            self.height = column.len();
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    pub fn without_columns(mut self, names: &[String]) -> Self {
        self.columns
            .retain(|column| !names.iter().any(|name| name == &column.name));
        if self.columns.is_empty() {
            self.height = 0;
        }
        self
    }

    /// Keeps the rows whose flag is set, preserving order.
    pub fn retain_rows(&self, keep: &[bool]) -> Self {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|column| column.select(keep))
            .collect();
        let height = keep.iter().take(self.height).filter(|k| **k).count();
        Self { columns, height }
    }
}
