//! Per-group summary statistics used by the grouped fallback strategy.
//!
//! The grouped-statistics path never calls an external summary function;
//! this module computes count/mean/median directly so the fallback can
//! produce a filled row for any structurally valid group, including groups
//! with a single row or no usable values at all.

use crate::coerce;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, Severity};
use crate::error::Result;
use crate::partition::GroupPartition;
use crate::table::{Column, ColumnType, Table};

/// Count, mean, and median of the non-missing values of one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

/// Summarize the non-missing values of a numeric vector.
///
/// An empty set of usable values yields `count == 0` with NaN markers, not
/// an error.
pub fn summarize(values: &[f64]) -> VariableSummary {
    let mut usable: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if usable.is_empty() {
        return VariableSummary {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
        };
    }

    let count = usable.len();
    let mean = usable.iter().sum::<f64>() / count as f64;

    usable.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (usable[count / 2 - 1] + usable[count / 2]) / 2.0
    } else {
        usable[count / 2]
    };

    VariableSummary {
        count,
        mean,
        median,
    }
}

/// Candidate variables for a grouped summary: the explicit predictors when
/// given, else every numeric column other than the grouping key.
pub fn summary_variables(
    table: &Table,
    predictors: &[String],
    group_key: Option<&str>,
) -> Vec<String> {
    if !predictors.is_empty() {
        return predictors.to_vec();
    }
    table
        .iter()
        .filter(|(name, column)| {
            column.type_tag() == ColumnType::Numeric && Some(name.as_str()) != group_key
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// One single-row result table per group: the group label column followed by
/// `<var>_Count`, `<var>_Mean`, and `<var>_Median` per summarizable variable.
///
/// A variable that cannot be coerced within one group is dropped from that
/// group's result with a diagnostic; the schema reconciler fills the gap.
pub fn group_summaries(
    table: &Table,
    partition: &GroupPartition,
    variables: &[String],
    diagnostics: &mut DiagnosticLog,
) -> Result<Vec<Table>> {
    let label_column = partition
        .key_column
        .clone()
        .unwrap_or_else(|| "Group".to_string());

    let mut results = Vec::with_capacity(partition.n_groups());
    for (group, key) in partition.keys.iter().enumerate() {
        let rows = partition.row_indices(group);
        let sub = table.take_rows(&rows);

        let mut result = Table::new();
        result.insert_column(
            label_column.clone(),
            Column::Categorical(vec![key.label.clone()]),
        )?;

        for variable in variables {
            let Some(column) = sub.column(variable) else {
                continue;
            };
            match coerce::coerce(variable, column) {
                Ok(values) => {
                    let summary = summarize(&values);
                    result.insert_column(
                        format!("{}_Count", variable),
                        Column::Numeric(vec![summary.count as f64]),
                    )?;
                    result.insert_column(
                        format!("{}_Mean", variable),
                        Column::Numeric(vec![summary.mean]),
                    )?;
                    result.insert_column(
                        format!("{}_Median", variable),
                        Column::Numeric(vec![summary.median]),
                    )?;
                }
                Err(err) => {
                    diagnostics.record(Diagnostic::new(
                        DiagnosticKind::StrategyFailed,
                        Severity::Warning,
                        "grouped_stats",
                        format!("group '{}': {}", key.label, err),
                    ));
                }
            }
        }

        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use crate::partition::partition;

    use super::*;

    #[test]
    fn test_summarize_even_and_odd_counts() {
        let odd = summarize(&[3.0, 1.0, 2.0]);
        assert_eq!(odd.count, 3);
        assert_eq!(odd.mean, 2.0);
        assert_eq!(odd.median, 2.0);

        let even = summarize(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(even.count, 4);
        assert_eq!(even.median, 2.5);
    }

    #[test]
    fn test_summarize_skips_missing() {
        let summary = summarize(&[10.0, f64::NAN, 30.0]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.median, 20.0);
    }

    #[test]
    fn test_summarize_all_missing_yields_markers() {
        let summary = summarize(&[f64::NAN, f64::NAN]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.median.is_nan());
    }

    #[test]
    fn test_group_summaries_single_row_group() {
        let table = Table::new()
            .with_column(
                "Group",
                Column::Text(vec!["X".to_string(), "Y".to_string(), "X".to_string()]),
            )
            .unwrap()
            .with_column("Val", Column::Numeric(vec![10.0, f64::NAN, 30.0]))
            .unwrap();
        let part = partition(&table, None).unwrap();
        let variables = summary_variables(&table, &[], part.key_column.as_deref());
        let mut diagnostics = DiagnosticLog::new(false);

        let results = group_summaries(&table, &part, &variables, &mut diagnostics).unwrap();
        assert_eq!(results.len(), 2);

        // Group X: two usable values.
        assert_eq!(
            results[0].value(0, "Val_Count"),
            Some(crate::table::Value::Number(2.0))
        );
        assert_eq!(
            results[0].value(0, "Val_Mean"),
            Some(crate::table::Value::Number(20.0))
        );

        // Group Y: a single missing value still yields a filled row.
        assert_eq!(
            results[1].value(0, "Val_Count"),
            Some(crate::table::Value::Number(0.0))
        );
        assert_eq!(
            results[1].value(0, "Val_Mean"),
            Some(crate::table::Value::Missing)
        );
    }

    #[test]
    fn test_uncoercible_variable_dropped_per_group() {
        let table = Table::new()
            .with_column(
                "Group",
                Column::Text(vec!["a".to_string(), "b".to_string()]),
            )
            .unwrap()
            .with_column(
                "Note",
                Column::Text(vec!["1.5".to_string(), "inf".to_string()]),
            )
            .unwrap();
        let part = partition(&table, None).unwrap();
        let variables = vec!["Note".to_string()];
        let mut diagnostics = DiagnosticLog::new(false);

        let results = group_summaries(&table, &part, &variables, &mut diagnostics).unwrap();
        assert!(results[0].contains("Note_Mean"));
        assert!(!results[1].contains("Note_Mean"));
        assert_eq!(diagnostics.events().len(), 1);
    }
}
