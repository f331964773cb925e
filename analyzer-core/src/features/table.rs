//! Feature Table - column-oriented numeric input for the models
//!
//! **Invariant:** every column has exactly `rows` values and every value is
//! finite. Indicator columns hold only 0.0 / 1.0.

use ndarray::Array2;
use serde::Serialize;

// ============================================================================
// COLUMN
// ============================================================================

/// How a column should be displayed (models only ever see `f64`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Whole numbers (hour, ip_int, cluster, integer pass-through columns)
    Integer,
    /// Real numbers
    Float,
    /// One-hot indicator (0 / 1)
    Indicator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<f64>,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn integer(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnKind::Integer, values)
    }

    pub fn indicator(name: impl Into<String>, flags: impl IntoIterator<Item = bool>) -> Self {
        let values = flags.into_iter().map(|f| if f { 1.0 } else { 0.0 }).collect();
        Self::new(name, ColumnKind::Indicator, values)
    }
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureTable {
    rows: usize,
    columns: Vec<FeatureColumn>,
}

impl FeatureTable {
    /// Empty table with a fixed row count
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    /// Append a column (must match the table's row count)
    pub fn push_column(&mut self, column: FeatureColumn) {
        debug_assert_eq!(
            column.values.len(),
            self.rows,
            "column '{}' has wrong length",
            column.name
        );
        self.columns.push(column);
    }

    /// Copy of this table with one more column
    pub fn with_column(&self, column: FeatureColumn) -> Self {
        let mut table = self.clone();
        table.push_column(column);
        table
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of one row, in column order
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c.values[index]).collect()
    }

    /// Row-major matrix (rows × columns) for model fitting
    pub fn to_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.columns.len()), |(r, c)| {
            self.columns[c].values[r]
        })
    }

    /// Subset of rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> FeatureTable {
        FeatureTable {
            rows: indices.len(),
            columns: self
                .columns
                .iter()
                .map(|c| FeatureColumn {
                    name: c.name.clone(),
                    kind: c.kind,
                    values: indices.iter().map(|&i| c.values[i]).collect(),
                })
                .collect(),
        }
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> FeatureTable {
        let indices: Vec<usize> = (0..n.min(self.rows)).collect();
        self.select_rows(&indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureTable {
        let mut table = FeatureTable::new(3);
        table.push_column(FeatureColumn::integer("hour", vec![1.0, 2.0, 3.0]));
        table.push_column(FeatureColumn::indicator("protocol_SSH", [true, false, true]));
        table
    }

    #[test]
    fn test_matrix_is_row_major() {
        let m = sample().to_matrix();
        assert_eq!(m.dim(), (3, 2));
        assert_eq!(m[[1, 0]], 2.0);
        assert_eq!(m[[1, 1]], 0.0);
        assert_eq!(m[[2, 1]], 1.0);
    }

    #[test]
    fn test_select_rows_keeps_columns() {
        let subset = sample().select_rows(&[2, 0]);
        assert_eq!(subset.n_rows(), 2);
        assert_eq!(subset.n_columns(), 2);
        assert_eq!(subset.row(0), vec![3.0, 1.0]);
    }

    #[test]
    fn test_with_column_does_not_mutate_original() {
        let table = sample();
        let extended = table.with_column(FeatureColumn::integer("cluster", vec![0.0, 1.0, 2.0]));
        assert_eq!(table.n_columns(), 2);
        assert_eq!(extended.n_columns(), 3);
        assert_eq!(extended.column_names(), vec!["hour", "protocol_SSH", "cluster"]);
    }
}
