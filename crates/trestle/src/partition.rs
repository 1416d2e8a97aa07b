//! Table partitioning by a grouping key.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{Column, Table, Value};

/// Conventional grouping column names checked during auto-detection,
/// in priority order.
const PRIORITY_KEYS: &[&str] = &[
    "Group", "group", "Region", "Class", "Category", "Label", "GroupVar",
];

/// A distinct grouping value: canonical label plus the original typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    /// Canonical string form, used for reporting and result labels.
    pub label: String,
    /// The typed value as it appears in the grouping column.
    pub value: Value,
}

/// Result of partitioning a table by a grouping key.
///
/// The partitions are disjoint and their union is the input table: every
/// row is assigned to exactly one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPartition {
    /// Name of the grouping column, `None` when the whole table is one group.
    pub key_column: Option<String>,
    /// Distinct key values in first-seen order.
    pub keys: Vec<GroupKey>,
    /// Group index for each row of the source table.
    pub assignment: Vec<usize>,
}

impl GroupPartition {
    /// Number of groups.
    pub fn n_groups(&self) -> usize {
        self.keys.len()
    }

    /// Row count per group, in key order.
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.keys.len()];
        for &group in &self.assignment {
            if let Some(size) = sizes.get_mut(group) {
                *size += 1;
            }
        }
        sizes
    }

    /// Source row indices belonging to one group, in source order.
    pub fn row_indices(&self, group: usize) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|&(_, &g)| g == group)
            .map(|(row, _)| row)
            .collect()
    }

    /// One sub-table per group, in key order.
    pub fn sub_tables(&self, table: &Table) -> Vec<Table> {
        (0..self.n_groups())
            .map(|group| table.take_rows(&self.row_indices(group)))
            .collect()
    }
}

/// Split a table into groups by a grouping key.
///
/// With an explicit key the column's distinct values define the groups, in
/// first-seen order. Without one, auto-detection applies: a fixed priority
/// list of conventional names is checked first; then columns are scanned
/// left-to-right for the first categorical/text column whose distinct-value
/// count `u` satisfies `1 < u <= max(ceil(0.5 n), 50)`; failing both, the
/// whole table becomes a single group named `"All"`.
pub fn partition(table: &Table, group_key: Option<&str>) -> Result<GroupPartition> {
    if let Some(name) = group_key {
        table.require_columns(&[name])?;
        if let Some(column) = table.column(name) {
            return Ok(partition_by(name, column, table.n_rows()));
        }
    }

    for name in PRIORITY_KEYS {
        if let Some(column) = table.column(name) {
            return Ok(partition_by(name, column, table.n_rows()));
        }
    }

    let n = table.n_rows();
    let cap = ((n as f64 / 2.0).ceil() as usize).max(50);
    for (name, column) in table.iter() {
        if !column.type_tag().is_discrete() {
            continue;
        }
        let distinct = column.distinct_count();
        if distinct > 1 && distinct <= cap {
            return Ok(partition_by(name, column, n));
        }
    }

    Ok(GroupPartition {
        key_column: None,
        keys: vec![GroupKey {
            label: "All".to_string(),
            value: Value::Str("All".to_string()),
        }],
        assignment: vec![0; n],
    })
}

/// Partition rows by one column's distinct values, first-seen order.
fn partition_by(name: &str, column: &Column, n_rows: usize) -> GroupPartition {
    let mut index: IndexMap<String, usize> = IndexMap::new();
    let mut keys = Vec::new();
    let mut assignment = Vec::with_capacity(n_rows);

    for row in 0..n_rows {
        let value = column.value(row).unwrap_or(Value::Missing);
        let label = value.to_string();
        let group = match index.get(&label) {
            Some(&g) => g,
            None => {
                let g = keys.len();
                index.insert(label.clone(), g);
                keys.push(GroupKey { label, value });
                g
            }
        };
        assignment.push(group);
    }

    GroupPartition {
        key_column: Some(name.to_string()),
        keys,
        assignment,
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TrestleError;

    use super::*;

    fn labels(values: &[&str]) -> Column {
        Column::Text(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_explicit_key_first_seen_order() {
        let table = Table::new()
            .with_column("site", labels(&["b", "a", "b", "c"]))
            .unwrap()
            .with_column("v", Column::Numeric(vec![1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        let part = partition(&table, Some("site")).unwrap();

        assert_eq!(part.key_column.as_deref(), Some("site"));
        let order: Vec<&str> = part.keys.iter().map(|k| k.label.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(part.assignment, vec![0, 1, 0, 2]);
        assert_eq!(part.group_sizes(), vec![2, 1, 1]);
    }

    #[test]
    fn test_explicit_key_must_exist() {
        let table = Table::new()
            .with_column("v", Column::Numeric(vec![1.0]))
            .unwrap();
        let err = partition(&table, Some("site")).unwrap_err();
        assert!(matches!(err, TrestleError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_priority_name_wins_over_position() {
        let table = Table::new()
            .with_column("site", labels(&["a", "b"]))
            .unwrap()
            .with_column("Group", labels(&["g1", "g2"]))
            .unwrap();
        let part = partition(&table, None).unwrap();
        assert_eq!(part.key_column.as_deref(), Some("Group"));
    }

    #[test]
    fn test_cardinality_scan_picks_first_qualifying() {
        let table = Table::new()
            .with_column("id", labels(&["r1", "r1", "r1"]))
            .unwrap()
            .with_column("region", labels(&["n", "s", "n"]))
            .unwrap()
            .with_column("v", Column::Numeric(vec![1.0, 2.0, 3.0]))
            .unwrap();
        // "id" has a single distinct value and does not qualify.
        let part = partition(&table, None).unwrap();
        assert_eq!(part.key_column.as_deref(), Some("region"));
        assert_eq!(part.n_groups(), 2);
    }

    #[test]
    fn test_no_grouping_falls_back_to_all() {
        let table = Table::new()
            .with_column("v", Column::Numeric(vec![1.0, 2.0]))
            .unwrap();
        let part = partition(&table, None).unwrap();
        assert_eq!(part.key_column, None);
        assert_eq!(part.n_groups(), 1);
        assert_eq!(part.keys[0].label, "All");
        assert_eq!(part.assignment, vec![0, 0]);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let table = Table::new()
            .with_column("Group", labels(&["x", "y", "x", "z", "y"]))
            .unwrap();
        let part = partition(&table, None).unwrap();

        let total: usize = part.group_sizes().iter().sum();
        assert_eq!(total, table.n_rows());

        let mut seen = vec![false; table.n_rows()];
        for group in 0..part.n_groups() {
            for row in part.row_indices(group) {
                assert!(!seen[row], "row {row} assigned twice");
                seen[row] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_sub_tables_carry_typed_values() {
        let table = Table::new()
            .with_column("Group", labels(&["x", "y", "x"]))
            .unwrap()
            .with_column("v", Column::Numeric(vec![10.0, 20.0, 30.0]))
            .unwrap();
        let part = partition(&table, None).unwrap();
        let subs = part.sub_tables(&table);

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].n_rows(), 2);
        assert_eq!(subs[0].value(1, "v"), Some(Value::Number(30.0)));
        assert_eq!(subs[1].n_rows(), 1);
    }
}
