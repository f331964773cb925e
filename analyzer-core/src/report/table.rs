//! Table views for previews and the anomaly list

use serde::Serialize;

use crate::features::{ColumnKind, FeatureColumn, FeatureTable};
use crate::ingest::RawTable;

/// One displayed cell; serialises as a plain JSON scalar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    fn from_feature(column: &FeatureColumn, row: usize) -> Self {
        let value = column.values[row];
        match column.kind {
            ColumnKind::Indicator => Cell::Bool(value != 0.0),
            ColumnKind::Integer => Cell::Int(value as i64),
            ColumnKind::Float => Cell::Float(value),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{:.4}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Rectangular view of (part of) a table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Rows in the full table (may exceed `rows.len()` for previews)
    pub total_rows: usize,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw upload, first `limit` rows, cells as text
    pub fn from_raw(raw: &RawTable, limit: usize) -> Self {
        Self {
            columns: raw.headers.clone(),
            rows: raw
                .rows
                .iter()
                .take(limit)
                .map(|row| row.iter().cloned().map(Cell::Text).collect())
                .collect(),
            total_rows: raw.len(),
        }
    }

    /// Selected rows of a feature table, typed by column kind
    pub fn from_features(table: &FeatureTable, rows: &[usize]) -> Self {
        Self {
            columns: table.column_names().into_iter().map(String::from).collect(),
            rows: rows
                .iter()
                .map(|&r| table.columns().iter().map(|c| Cell::from_feature(c, r)).collect())
                .collect(),
            total_rows: table.n_rows(),
        }
    }

    /// Append a column; `values[i]` goes to `rows[i]`
    pub fn push_column(&mut self, name: &str, values: impl IntoIterator<Item = Cell>) {
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
}
