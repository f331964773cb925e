//! Raw Table - uploaded CSV as ordered string cells

use serde::Serialize;

/// Uploaded event table, exactly as read from the CSV
///
/// Every row has `headers.len()` cells; the reader rejects ragged input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// First `n` rows (fewer if the table is shorter)
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
