//! Schema reconciliation across per-group result tables.
//!
//! Per-group attempts may produce tables with different column sets. The
//! reconciler unions them into one homogeneous table, synthesizing
//! type-correct fillers for columns a group is missing. Reconciliation
//! never loses data: when a merge is structurally impossible the inputs are
//! returned untouched with a diagnostic instead of an error.

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, Severity};
use crate::table::{Column, ColumnType, Table};

/// Outcome of reconciling per-group results.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// One table with the column union across all inputs, groups stacked in
    /// input order.
    Merged(Table),
    /// The inputs, untouched, because a merge was structurally impossible.
    Unmerged(Vec<Table>),
}

impl Reconciled {
    /// The merged table, when reconciliation succeeded.
    pub fn merged(self) -> Option<Table> {
        match self {
            Reconciled::Merged(table) => Some(table),
            Reconciled::Unmerged(_) => None,
        }
    }
}

/// Union per-group result tables into one.
///
/// Column order is first-seen across the input sequence. For a column a
/// table is missing, a filler of that table's row count is synthesized
/// using the type of the first table that carries the column. A single
/// input is returned as an identity copy.
pub fn reconcile(tables: Vec<Table>, diagnostics: &mut DiagnosticLog) -> Reconciled {
    let mut tables = tables;
    if tables.len() <= 1 {
        if let Some(table) = tables.pop() {
            return Reconciled::Merged(table);
        }
        return Reconciled::Merged(Table::new());
    }

    // Column union in first-seen order; the first occurrence fixes the type.
    let mut template: IndexMap<String, ColumnType> = IndexMap::new();
    let mut conflict: Option<String> = None;
    'scan: for table in &tables {
        for (name, column) in table.iter() {
            match template.get(name) {
                Some(&tag) if tag != column.type_tag() => {
                    conflict = Some(format!(
                        "column '{}' is {:?} in one group and {:?} in another",
                        name,
                        tag,
                        column.type_tag()
                    ));
                    break 'scan;
                }
                Some(_) => {}
                None => {
                    template.insert(name.clone(), column.type_tag());
                }
            }
        }
    }

    if let Some(reason) = conflict {
        diagnostics.record(Diagnostic::new(
            DiagnosticKind::ReconcileDegraded,
            Severity::Warning,
            "reconcile",
            format!("returning unmerged results: {}", reason),
        ));
        return Reconciled::Unmerged(tables);
    }

    match try_merge(&tables, &template) {
        Some(merged) => Reconciled::Merged(merged),
        None => {
            diagnostics.record(Diagnostic::new(
                DiagnosticKind::ReconcileDegraded,
                Severity::Warning,
                "reconcile",
                "returning unmerged results: row counts could not be aligned".to_string(),
            ));
            Reconciled::Unmerged(tables)
        }
    }
}

/// Stack the tables column-aligned, filling missing columns. `None` when
/// the stacked columns cannot form a valid table.
fn try_merge(tables: &[Table], template: &IndexMap<String, ColumnType>) -> Option<Table> {
    let mut stacked: Vec<(String, Column)> = template
        .iter()
        .map(|(name, &tag)| (name.clone(), Column::filler(tag, 0)))
        .collect();
    let keep_ids = tables.iter().any(|table| table.row_ids().is_some());
    let mut row_ids: Vec<String> = Vec::new();

    for table in tables {
        let rows = table.n_rows();
        for (name, accumulated) in stacked.iter_mut() {
            let piece = match table.column(name) {
                Some(column) => column.clone(),
                None => Column::filler(accumulated.type_tag(), rows),
            };
            if !accumulated.append(&piece) {
                return None;
            }
        }
        if keep_ids {
            match table.row_ids() {
                Some(ids) => row_ids.extend(ids.iter().cloned()),
                None => row_ids.extend(std::iter::repeat_n(String::new(), rows)),
            }
        }
    }

    let mut merged = Table::new();
    for (name, column) in stacked {
        merged.insert_column(name, column).ok()?;
    }
    if keep_ids {
        merged = merged.with_row_ids(row_ids).ok()?;
    }
    Some(merged)
}
