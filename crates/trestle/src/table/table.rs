//! Row-aligned table of named, typed columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrestleError};

use super::column::Column;
use super::value::Value;

/// An ordered set of named columns, each a homogeneous-typed sequence of the
/// table's row count, plus optional row identifiers.
///
/// Invariants, checked at construction and on every insertion: all columns
/// share the same row count, and column names are unique. The core never
/// mutates a table in place; transformations produce new tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_ids: Option<Vec<String>>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            row_ids: None,
        }
    }

    /// Build a table from `(name, column)` pairs, validating the invariants.
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, column) in columns {
            table.insert_column(name, column)?;
        }
        Ok(table)
    }

    /// Builder-style column insertion.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.insert_column(name.into(), column)?;
        Ok(self)
    }

    /// Attach row identifiers, one per row.
    pub fn with_row_ids(mut self, ids: Vec<String>) -> Result<Self> {
        if ids.len() != self.n_rows() {
            return Err(TrestleError::Config(format!(
                "{} row identifiers for {} rows",
                ids.len(),
                self.n_rows()
            )));
        }
        self.row_ids = Some(ids);
        Ok(self)
    }

    /// Insert a column, validating length and name uniqueness.
    pub fn insert_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.columns.contains_key(&name) {
            return Err(TrestleError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(TrestleError::MismatchedColumnLength {
                column: name,
                expected: self.n_rows(),
                actual: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns
            .first()
            .map(|(_, column)| column.len())
            .unwrap_or(0)
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Get a column and its name by position.
    pub fn column_at(&self, index: usize) -> Option<(&str, &Column)> {
        self.columns
            .get_index(index)
            .map(|(name, column)| (name.as_str(), column))
    }

    /// Position of a column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Returns true when the table has a column of this name.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a cell value by row and column name.
    pub fn value(&self, row: usize, name: &str) -> Option<Value> {
        self.columns.get(name).and_then(|column| column.value(row))
    }

    /// Iterate over `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Column)> {
        self.columns.iter()
    }

    /// Row identifiers, when present.
    pub fn row_ids(&self) -> Option<&[String]> {
        self.row_ids.as_deref()
    }

    /// Check that every requested name resolves, collecting all missing
    /// names before reporting rather than stopping at the first.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| !self.contains(n))
            .map(String::from)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TrestleError::ColumnNotFound { columns: missing })
        }
    }

    /// New table holding the given rows of every column, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.take(rows)))
            .collect();
        let row_ids = self.row_ids.as_ref().map(|ids| {
            rows.iter()
                .map(|&i| ids.get(i).cloned().unwrap_or_default())
                .collect()
        });
        Table { columns, row_ids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new()
            .with_column("a", Column::Numeric(vec![1.0, 2.0, 3.0]))
            .unwrap()
            .with_column(
                "b",
                Column::Text(vec!["x".to_string(), "y".to_string(), "x".to_string()]),
            )
            .unwrap()
    }

    #[test]
    fn test_shape() {
        let table = sample();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = sample().with_column("a", Column::Numeric(vec![0.0, 0.0, 0.0]));
        assert!(matches!(result, Err(TrestleError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = sample().with_column("c", Column::Numeric(vec![1.0]));
        assert!(matches!(
            result,
            Err(TrestleError::MismatchedColumnLength {
                expected: 3,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_require_columns_reports_all_missing() {
        let table = sample();
        let err = table.require_columns(&["a", "z", "q"]).unwrap_err();
        match err {
            TrestleError::ColumnNotFound { columns } => {
                assert_eq!(columns, vec!["z".to_string(), "q".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_take_rows_subsets_ids() {
        let table = sample()
            .with_row_ids(vec!["r1".to_string(), "r2".to_string(), "r3".to_string()])
            .unwrap();
        let sub = table.take_rows(&[2, 0]);
        assert_eq!(sub.n_rows(), 2);
        assert_eq!(
            sub.row_ids(),
            Some(&["r3".to_string(), "r1".to_string()][..])
        );
        assert_eq!(sub.value(0, "a"), Some(Value::Number(3.0)));
    }
}
