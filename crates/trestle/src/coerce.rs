//! Column-to-numeric coercion.
//!
//! Every column type has exactly one coercion strategy, matched exhaustively:
//! numeric passes through, booleans become 0/1, categorical labels become
//! integer codes in first-seen order, dates become ordinal day numbers, and
//! text is parsed as numbers when it fully parses, otherwise coded like
//! categorical labels. The functions here are pure; nothing is mutated.

use chrono::Datelike;
use indexmap::IndexMap;

use crate::error::{Result, TrestleError};
use crate::table::Column;

/// Convert a typed column into a numeric vector.
///
/// Missing cells map to NaN throughout. The only failure case is a text
/// column whose values all parse as numbers but include a value that is
/// neither finite nor NaN (e.g. `"inf"`); the error names the column.
pub fn coerce(name: &str, column: &Column) -> Result<Vec<f64>> {
    match column {
        Column::Numeric(values) => Ok(values.clone()),
        Column::Boolean(values) => Ok(values
            .iter()
            .map(|&b| if b { 1.0 } else { 0.0 })
            .collect()),
        Column::Categorical(values) => Ok(first_seen_codes(values)),
        Column::Text(values) => coerce_text(name, values),
        Column::Temporal(values) => Ok(values
            .iter()
            .map(|date| {
                date.map(|d| f64::from(d.num_days_from_ce()))
                    .unwrap_or(f64::NAN)
            })
            .collect()),
    }
}

/// Integer codes by first appearance of each distinct label, starting at 1.
///
/// `["b", "a", "b", "c"]` codes to `[1.0, 2.0, 1.0, 3.0]`: first-seen
/// order, not sorted order. Missing labels (empty strings) code to NaN and
/// consume no code.
pub fn first_seen_codes(values: &[String]) -> Vec<f64> {
    let mut codes: IndexMap<&str, usize> = IndexMap::new();
    values
        .iter()
        .map(|value| {
            if value.is_empty() {
                return f64::NAN;
            }
            let next = codes.len() + 1;
            *codes.entry(value.as_str()).or_insert(next) as f64
        })
        .collect()
}

/// Generic numeric parse for text columns, falling back to label codes.
fn coerce_text(name: &str, values: &[String]) -> Result<Vec<f64>> {
    let mut parsed = Vec::with_capacity(values.len());
    let mut all_numeric = true;
    for value in values {
        if value.is_empty() {
            parsed.push(f64::NAN);
            continue;
        }
        match value.trim().parse::<f64>() {
            Ok(number) => parsed.push(number),
            Err(_) => {
                all_numeric = false;
                break;
            }
        }
    }

    if all_numeric {
        if let Some(bad) = parsed.iter().find(|x| !x.is_finite() && !x.is_nan()) {
            return Err(TrestleError::CannotConvertColumn {
                column: name.to_string(),
                reason: format!("parsed value {} is not finite", bad),
            });
        }
        return Ok(parsed);
    }

    Ok(first_seen_codes(values))
}
