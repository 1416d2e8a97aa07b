//! Per-column type inference for parsed text data.

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::Column;

// Date patterns compiled once on first use.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(), // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap(), // US date
        Regex::new(r"^\d{4}/\d{2}/\d{2}$").unwrap(), // Alt ISO
    ]
});

/// Date formats tried in order when building a temporal column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Maximum distinct labels for a string column to be tagged categorical.
const CATEGORICAL_THRESHOLD: usize = 20;

/// Check if a value represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

/// Raw type detected for a single text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RawType {
    Boolean,
    Integer,
    Float,
    Date,
    String,
}

/// Detect the type of a single value.
fn detect_value_type(value: &str) -> RawType {
    let trimmed = value.trim();

    if matches!(
        trimmed.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no"
    ) {
        return RawType::Boolean;
    }

    if trimmed.parse::<i64>().is_ok() {
        return RawType::Integer;
    }

    if trimmed.parse::<f64>().is_ok() {
        return RawType::Float;
    }

    if DATE_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed)) {
        return RawType::Date;
    }

    RawType::String
}

/// Infer a column type from text values by majority vote, then build the
/// typed column. Null-vocabulary values become the type's missing marker;
/// values that contradict the inferred type are treated as missing too.
pub fn build_column(values: &[String]) -> Column {
    let non_null: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|v| !is_null_value(v))
        .collect();

    if non_null.is_empty() {
        return Column::Text(vec![String::new(); values.len()]);
    }

    let mut type_counts: HashMap<RawType, usize> = HashMap::new();
    for value in &non_null {
        *type_counts.entry(detect_value_type(value)).or_insert(0) += 1;
    }

    let best = type_counts
        .iter()
        .max_by_key(|&(_, count)| *count)
        .map(|(&t, _)| t)
        .unwrap_or(RawType::String);

    // Integers mixed with floats promote to numeric.
    let best = match best {
        RawType::Integer => RawType::Float,
        other => other,
    };

    match best {
        RawType::Float | RawType::Integer => Column::Numeric(
            values
                .iter()
                .map(|v| {
                    if is_null_value(v) {
                        f64::NAN
                    } else {
                        v.trim().parse::<f64>().unwrap_or(f64::NAN)
                    }
                })
                .collect(),
        ),
        RawType::Boolean => Column::Boolean(
            values
                .iter()
                .map(|v| {
                    matches!(v.trim().to_lowercase().as_str(), "true" | "yes")
                })
                .collect(),
        ),
        RawType::Date => Column::Temporal(values.iter().map(|v| parse_date(v)).collect()),
        RawType::String => {
            let cleaned: Vec<String> = values
                .iter()
                .map(|v| {
                    if is_null_value(v) {
                        String::new()
                    } else {
                        v.trim().to_string()
                    }
                })
                .collect();
            let mut distinct: Vec<&str> = Vec::new();
            for value in cleaned.iter().filter(|v| !v.is_empty()) {
                if !distinct.contains(&value.as_str()) {
                    distinct.push(value);
                }
            }
            if distinct.len() <= CATEGORICAL_THRESHOLD {
                Column::Categorical(cleaned)
            } else {
                Column::Text(cleaned)
            }
        }
    }
}

/// Parse a date value against the known formats.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if is_null_value(trimmed) {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
