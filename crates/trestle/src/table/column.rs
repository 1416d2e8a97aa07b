//! Typed column storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::value::{ColumnType, Value};

/// A homogeneous-typed column of cell values.
///
/// Missing markers per type: NaN for numeric, the empty string for
/// categorical/text, `None` for temporal. Boolean columns carry no missing
/// marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Column {
    Numeric(Vec<f64>),
    Boolean(Vec<bool>),
    Categorical(Vec<String>),
    Text(Vec<String>),
    Temporal(Vec<Option<NaiveDate>>),
}

impl Column {
    /// Number of cells in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Boolean(v) => v.len(),
            Column::Categorical(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Temporal(v) => v.len(),
        }
    }

    /// Returns true if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column's type tag.
    pub fn type_tag(&self) -> ColumnType {
        match self {
            Column::Numeric(_) => ColumnType::Numeric,
            Column::Boolean(_) => ColumnType::Boolean,
            Column::Categorical(_) => ColumnType::Categorical,
            Column::Text(_) => ColumnType::Text,
            Column::Temporal(_) => ColumnType::Temporal,
        }
    }

    /// Get the cell at `row` as a [`Value`], or `None` when out of range.
    pub fn value(&self, row: usize) -> Option<Value> {
        match self {
            Column::Numeric(v) => v.get(row).map(|&x| {
                if x.is_nan() {
                    Value::Missing
                } else {
                    Value::Number(x)
                }
            }),
            Column::Boolean(v) => v.get(row).map(|&b| Value::Bool(b)),
            Column::Categorical(v) | Column::Text(v) => v.get(row).map(|s| {
                if s.is_empty() {
                    Value::Missing
                } else {
                    Value::Str(s.clone())
                }
            }),
            Column::Temporal(v) => v
                .get(row)
                .map(|d| d.map(Value::Date).unwrap_or(Value::Missing)),
        }
    }

    /// Returns true when the cell at `row` holds the missing marker.
    pub fn is_missing(&self, row: usize) -> bool {
        self.value(row).map(|v| v.is_missing()).unwrap_or(true)
    }

    /// Number of distinct non-missing values.
    pub fn distinct_count(&self) -> usize {
        let mut seen: Vec<String> = Vec::new();
        for row in 0..self.len() {
            if self.is_missing(row) {
                continue;
            }
            if let Some(value) = self.value(row) {
                let label = value.to_string();
                if !seen.contains(&label) {
                    seen.push(label);
                }
            }
        }
        seen.len()
    }

    /// Row subset preserving order. Out-of-range indices yield the missing
    /// marker rather than failing.
    pub fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(
                rows.iter()
                    .map(|&i| v.get(i).copied().unwrap_or(f64::NAN))
                    .collect(),
            ),
            Column::Boolean(v) => Column::Boolean(
                rows.iter()
                    .map(|&i| v.get(i).copied().unwrap_or(false))
                    .collect(),
            ),
            Column::Categorical(v) => Column::Categorical(
                rows.iter()
                    .map(|&i| v.get(i).cloned().unwrap_or_default())
                    .collect(),
            ),
            Column::Text(v) => Column::Text(
                rows.iter()
                    .map(|&i| v.get(i).cloned().unwrap_or_default())
                    .collect(),
            ),
            Column::Temporal(v) => Column::Temporal(
                rows.iter()
                    .map(|&i| v.get(i).copied().unwrap_or(None))
                    .collect(),
            ),
        }
    }

    /// A column of `len` missing markers of the given type.
    ///
    /// Used to synthesize type-correct fillers for columns absent in one
    /// partition's result but present in another's.
    pub fn filler(tag: ColumnType, len: usize) -> Column {
        match tag {
            ColumnType::Numeric => Column::Numeric(vec![f64::NAN; len]),
            ColumnType::Boolean => Column::Boolean(vec![false; len]),
            ColumnType::Categorical => Column::Categorical(vec![String::new(); len]),
            ColumnType::Text => Column::Text(vec![String::new(); len]),
            ColumnType::Temporal => Column::Temporal(vec![None; len]),
        }
    }

    /// Append another column's cells. Returns false when the type tags
    /// differ, leaving `self` untouched.
    pub(crate) fn append(&mut self, other: &Column) -> bool {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => a.extend_from_slice(b),
            (Column::Boolean(a), Column::Boolean(b)) => a.extend_from_slice(b),
            (Column::Categorical(a), Column::Categorical(b)) => a.extend_from_slice(b),
            (Column::Text(a), Column::Text(b)) => a.extend_from_slice(b),
            (Column::Temporal(a), Column::Temporal(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}
