//! Cell values and column type tags.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Type tag for a column. Determines the coercion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Floating-point values. NaN marks a missing cell.
    Numeric,
    /// Boolean values. No missing marker.
    Boolean,
    /// Discrete labels with low cardinality. Empty string marks a missing cell.
    Categorical,
    /// Free text. Empty string marks a missing cell.
    Text,
    /// Calendar dates. `None` marks a missing cell.
    Temporal,
}

impl ColumnType {
    /// Returns true if this type can serve as an auto-detected grouping key.
    pub fn is_discrete(&self) -> bool {
        matches!(self, ColumnType::Categorical | ColumnType::Text)
    }
}

/// A single cell value viewed out of a typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    Date(NaiveDate),
    /// Missing marker, regardless of the owning column's type.
    Missing,
}

impl Value {
    /// Returns true for the missing marker.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(x) => x.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// Canonical string form used for group labels and reporting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
                    write!(f, "{}", *x as i64)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Missing => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_trims_whole_numbers() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(3.5).to_string(), "3.5");
    }

    #[test]
    fn test_missing_detection() {
        assert!(Value::Missing.is_missing());
        assert!(Value::Number(f64::NAN).is_missing());
        assert!(!Value::Number(0.0).is_missing());
        assert!(!Value::Str(String::new()).is_missing());
    }

    #[test]
    fn test_date_display_is_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::Date(d).to_string(), "2024-03-09");
    }
}
