//! Property-based tests for Trestle.
//!
//! These tests use proptest to generate random inputs and verify that the
//! core machinery maintains its invariants under all conditions:
//!
//! 1. **Coercion totality**: numeric/boolean/temporal columns never fail to
//!    coerce; label columns code in first-seen order.
//! 2. **Partition completeness**: partitions are disjoint and their union is
//!    the input row set.
//! 3. **Reconciliation**: column union with no data loss; identity on a
//!    single input.
//! 4. **No panics**: the parser accepts arbitrary text without crashing.

use proptest::prelude::*;

use trestle::coerce::{coerce, first_seen_codes};
use trestle::input::Parser;
use trestle::partition::partition;
use trestle::reconcile::{reconcile, Reconciled};
use trestle::{Column, DiagnosticLog, Table, Value};

// =============================================================================
// Test Strategies
// =============================================================================

/// Small label alphabet so groups repeat.
fn label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just("d".to_string()),
        Just("e".to_string()),
    ]
}

/// Non-empty label vectors.
fn labels(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(label(), 1..max)
}

/// Finite numeric vectors.
fn finite_values(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-1000i32..1000).prop_map(f64::from), len..=len)
}

/// Arbitrary printable text (for parser robustness).
fn arbitrary_text() -> impl Strategy<Value = String> {
    "[ -~\\t\\n]{0,200}"
}

// =============================================================================
// Coercion Properties
// =============================================================================

proptest! {
    /// Numeric columns always coerce, preserving values.
    #[test]
    fn coercion_total_for_numeric(values in prop::collection::vec(-1e6f64..1e6, 0..50)) {
        let column = Column::Numeric(values.clone());
        let out = coerce("v", &column).unwrap();
        prop_assert_eq!(out, values);
    }

    /// Boolean columns always coerce to 0/1.
    #[test]
    fn coercion_total_for_boolean(values in prop::collection::vec(any::<bool>(), 0..50)) {
        let column = Column::Boolean(values.clone());
        let out = coerce("v", &column).unwrap();
        for (bit, coded) in values.iter().zip(&out) {
            prop_assert_eq!(*coded, if *bit { 1.0 } else { 0.0 });
        }
    }

    /// Label columns code in first-seen order: the sequence of codes at
    /// first occurrences is 1, 2, 3, ... and equal labels share a code.
    #[test]
    fn codes_are_first_seen_ordered(values in labels(40)) {
        let codes = first_seen_codes(&values);
        prop_assert_eq!(codes.len(), values.len());

        let mut seen: Vec<&str> = Vec::new();
        for (value, &code) in values.iter().zip(&codes) {
            match seen.iter().position(|&s| s == value.as_str()) {
                Some(pos) => prop_assert_eq!(code, (pos + 1) as f64),
                None => {
                    seen.push(value.as_str());
                    prop_assert_eq!(code, seen.len() as f64);
                }
            }
        }
    }

    /// Categorical coercion never fails, for any distinct-value count.
    #[test]
    fn coercion_total_for_categorical(values in labels(40)) {
        let column = Column::Categorical(values);
        prop_assert!(coerce("v", &column).is_ok());
    }
}

// =============================================================================
// Partition Properties
// =============================================================================

proptest! {
    /// Partitions are disjoint and complete: every row lands in exactly one
    /// group and the sizes sum to the row count.
    #[test]
    fn partition_complete_and_disjoint(values in labels(60)) {
        let n = values.len();
        let table = Table::new()
            .with_column("key", Column::Text(values))
            .unwrap();
        let part = partition(&table, Some("key")).unwrap();

        let total: usize = part.group_sizes().iter().sum();
        prop_assert_eq!(total, n);

        let mut seen = vec![false; n];
        for group in 0..part.n_groups() {
            for row in part.row_indices(group) {
                prop_assert!(!seen[row], "row {} assigned twice", row);
                seen[row] = true;
            }
        }
        prop_assert!(seen.iter().all(|&s| s));
    }

    /// Sub-tables carry every original row exactly once.
    #[test]
    fn sub_tables_preserve_rows(values in labels(30)) {
        let n = values.len();
        let table = Table::new()
            .with_column("key", Column::Text(values))
            .unwrap();
        let part = partition(&table, Some("key")).unwrap();
        let subs = part.sub_tables(&table);

        let total: usize = subs.iter().map(Table::n_rows).sum();
        prop_assert_eq!(total, n);
    }
}

// =============================================================================
// Reconciliation Properties
// =============================================================================

proptest! {
    /// Reconciling a single table is an identity copy.
    #[test]
    fn reconcile_single_is_identity(
        rows in (1usize..12).prop_flat_map(|n| {
            (finite_values(n), prop::collection::vec(label(), n..=n))
        }),
    ) {
        let (values, names) = rows;
        let table = Table::new()
            .with_column("v", Column::Numeric(values))
            .unwrap()
            .with_column("label", Column::Text(names))
            .unwrap();

        let mut log = DiagnosticLog::new(false);
        let outcome = reconcile(vec![table.clone()], &mut log);
        prop_assert_eq!(outcome, Reconciled::Merged(table));
        prop_assert!(log.events().is_empty());
    }

    /// Reconciled output has the column union, the row sum, and every
    /// original cell preserved at its (group, column) position.
    #[test]
    fn reconcile_unions_without_data_loss(
        left in finite_values(3),
        right in finite_values(2),
        shared_right in finite_values(2),
    ) {
        let first = Table::new()
            .with_column("shared", Column::Numeric(left.clone()))
            .unwrap()
            .with_column("only_left", Column::Numeric(left.clone()))
            .unwrap();
        let second = Table::new()
            .with_column("shared", Column::Numeric(shared_right.clone()))
            .unwrap()
            .with_column("only_right", Column::Numeric(right.clone()))
            .unwrap();

        let mut log = DiagnosticLog::new(false);
        let merged = match reconcile(vec![first, second], &mut log) {
            Reconciled::Merged(table) => table,
            Reconciled::Unmerged(_) => {
                prop_assert!(false, "merge must succeed for aligned inputs");
                return Ok(());
            }
        };

        prop_assert_eq!(merged.names(), vec!["shared", "only_left", "only_right"]);
        prop_assert_eq!(merged.n_rows(), 5);

        // Originally present cells are unchanged.
        for (row, expected) in left.iter().enumerate() {
            prop_assert_eq!(merged.value(row, "shared"), Some(Value::Number(*expected)));
            prop_assert_eq!(merged.value(row, "only_left"), Some(Value::Number(*expected)));
        }
        for (offset, expected) in shared_right.iter().enumerate() {
            prop_assert_eq!(merged.value(3 + offset, "shared"), Some(Value::Number(*expected)));
        }
        for (offset, expected) in right.iter().enumerate() {
            prop_assert_eq!(merged.value(3 + offset, "only_right"), Some(Value::Number(*expected)));
        }

        // Fillers are missing markers.
        for row in 3..5 {
            prop_assert_eq!(merged.value(row, "only_left"), Some(Value::Missing));
        }
        for row in 0..3 {
            prop_assert_eq!(merged.value(row, "only_right"), Some(Value::Missing));
        }
    }
}

/// Non-proptest version of single-input idempotence, with mixed types.
#[test]
fn reconcile_single_identity_mixed_types() {
    let table = Table::new()
        .with_column("v", Column::Numeric(vec![1.0, 2.0]))
        .unwrap()
        .with_column(
            "label",
            Column::Categorical(vec!["x".to_string(), "y".to_string()]),
        )
        .unwrap()
        .with_column("flag", Column::Boolean(vec![true, false]))
        .unwrap();

    let mut log = DiagnosticLog::new(false);
    let merged = reconcile(vec![table.clone()], &mut log);
    assert_eq!(merged, Reconciled::Merged(table));
    assert!(log.events().is_empty());
}

// =============================================================================
// Parser Robustness
// =============================================================================

proptest! {
    /// The parser never panics on arbitrary printable input.
    #[test]
    fn parser_never_panics(text in arbitrary_text()) {
        let parser = Parser::new();
        let _ = parser.parse_str(&text);
    }

    /// Parsed tables are rectangular: every column has the same row count.
    #[test]
    fn parsed_tables_are_rectangular(text in arbitrary_text()) {
        let parser = Parser::new();
        if let Ok(table) = parser.parse_str(&text) {
            let n = table.n_rows();
            for (_, column) in table.iter() {
                prop_assert_eq!(column.len(), n);
            }
        }
    }
}
