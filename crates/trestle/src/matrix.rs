//! Numeric matrix extraction from tables.

use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::error::{Result, TrestleError};
use crate::table::{ColumnType, Table};

/// Column selection for matrix extraction, by name or position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelection {
    Names(Vec<String>),
    Positions(Vec<usize>),
}

/// Column-major numeric matrix with the originating column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericMatrix {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl NumericMatrix {
    /// Assemble a matrix from parallel name/column vectors.
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        let n_rows = columns.first().map(Vec::len).unwrap_or(0);
        Self {
            names,
            columns,
            n_rows,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Names of the originating columns, in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// A column by index.
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// A cell value; NaN when out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.columns
            .get(col)
            .and_then(|c| c.get(row))
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Row subset preserving column structure.
    pub fn take_rows(&self, rows: &[usize]) -> NumericMatrix {
        let columns: Vec<Vec<f64>> = self
            .columns
            .iter()
            .map(|column| {
                rows.iter()
                    .map(|&i| column.get(i).copied().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        NumericMatrix {
            names: self.names.clone(),
            n_rows: rows.len(),
            columns,
        }
    }
}

/// Extract a numeric matrix from a column selection.
///
/// With no selection, every `Numeric`-tagged column is used; if there are
/// none the extraction fails with `NoNumericColumns`. With a selection,
/// every name or position must resolve; all unresolvable entries are
/// collected and reported jointly. Column order follows the selection; row
/// order follows the table.
pub fn to_matrix(table: &Table, selection: Option<&ColumnSelection>) -> Result<NumericMatrix> {
    let names: Vec<String> = match selection {
        None => {
            let numeric: Vec<String> = table
                .iter()
                .filter(|(_, column)| column.type_tag() == ColumnType::Numeric)
                .map(|(name, _)| name.clone())
                .collect();
            if numeric.is_empty() {
                return Err(TrestleError::NoNumericColumns);
            }
            numeric
        }
        Some(ColumnSelection::Names(requested)) => {
            table.require_columns(requested)?;
            requested.clone()
        }
        Some(ColumnSelection::Positions(positions)) => {
            let out_of_range: Vec<String> = positions
                .iter()
                .filter(|&&p| p >= table.n_cols())
                .map(|p| format!("#{}", p))
                .collect();
            if !out_of_range.is_empty() {
                return Err(TrestleError::ColumnNotFound {
                    columns: out_of_range,
                });
            }
            positions
                .iter()
                .filter_map(|&p| table.column_at(p).map(|(name, _)| name.to_string()))
                .collect()
        }
    };

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let column = table
            .column(name)
            .ok_or_else(|| TrestleError::columns_not_found([name.clone()]))?;
        columns.push(coerce::coerce(name, column)?);
    }

    Ok(NumericMatrix::new(names, columns))
}

/// Indices of rows with no missing value in any of the given columns.
///
/// Used to drop rows with missing values jointly across an assembled
/// argument set before a toolbox call.
pub fn complete_rows(columns: &[&[f64]]) -> Vec<usize> {
    let n = columns.first().map(|c| c.len()).unwrap_or(0);
    (0..n)
        .filter(|&row| {
            columns
                .iter()
                .all(|column| column.get(row).map(|v| !v.is_nan()).unwrap_or(false))
        })
        .collect()
}
