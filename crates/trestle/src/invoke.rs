//! Safe invocation: direct handlers with explicit fallback to generic
//! strategies.
//!
//! Resolution order: a direct handler registered (or discoverable through
//! the `safe_` naming convention) for the operation's base name is attempted
//! first. A direct failure is inspected as a result value, never unwound:
//! it is recorded as a recoverable diagnostic, and control falls through to the
//! generic strategy for the operation's class. Generic strategies produce a
//! best-effort result for any structurally valid input; only the fatal
//! precondition and conversion errors escape.

use std::fmt;

use indexmap::IndexMap;

use crate::coerce;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, Severity};
use crate::error::{Result, TrestleError};
use crate::mapping::Mapping;
use crate::matrix::{self, ColumnSelection};
use crate::options::Options;
use crate::partition;
use crate::reconcile::{self, Reconciled};
use crate::render::{LabelSpec, RenderHandle, RenderSink, Series};
use crate::summary;
use crate::table::Table;
use crate::toolbox::{NumericArgs, ToolboxRegistry, ToolboxValue};

/// Execution class for the generic fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    /// Per-group summary via partition, attempt, and reconciliation.
    GroupedStats,
    /// Multi-series comparison drawn on the render sink.
    PairedPlot,
    /// Numeric argument assembly and a positional black-box call.
    GenericNumeric,
}

/// Result value produced by an invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteValue {
    /// Tabular result (grouped summaries and similar).
    Table(Table),
    /// Per-group results returned unmerged after degraded reconciliation.
    Unmerged(Vec<Table>),
    /// Value returned by a black-box toolbox function.
    Value(ToolboxValue),
    /// Handle to something drawn on the render sink.
    Rendered(RenderHandle),
}

/// Dedicated handler for one operation, preferred over the generic path.
pub type DirectHandler = Box<dyn Fn(&Table, &Mapping, &Options) -> Result<RouteValue>>;

/// Normalize an operation identifier to a lowercase base name.
///
/// Path and namespace qualifiers (`/`, `\`, `.`, `:`) are stripped, as is
/// the `safe_` handler prefix, so `"stats/Safe_Histogram"` and
/// `"histogram"` resolve identically.
pub fn normalize_operation(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\', '.', ':']).next().unwrap_or(raw);
    let base = base.trim().to_lowercase();
    base.strip_prefix("safe_")
        .map(str::to_string)
        .unwrap_or(base)
}

/// Attempts direct handlers and falls back to class-specific generic
/// strategies.
pub struct SafeInvoker {
    direct: IndexMap<String, DirectHandler>,
    classes: IndexMap<String, OperationClass>,
}

impl SafeInvoker {
    /// Create an invoker with the built-in operation classes registered.
    pub fn new() -> Self {
        let mut classes = IndexMap::new();
        classes.insert("grouped_summary".to_string(), OperationClass::GroupedStats);
        classes.insert("paired_comparison".to_string(), OperationClass::PairedPlot);
        Self {
            direct: IndexMap::new(),
            classes,
        }
    }

    /// Register a direct handler. The name is normalized, so registering
    /// `safe_histogram` makes the handler discoverable for `histogram`.
    pub fn register_direct(&mut self, name: &str, handler: DirectHandler) {
        self.direct.insert(normalize_operation(name), handler);
    }

    /// Register or override the class of an operation name.
    pub fn register_class(&mut self, name: &str, class: OperationClass) {
        self.classes.insert(normalize_operation(name), class);
    }

    /// The class an operation resolves to: the class registry first, then
    /// generic-numeric for anything the toolbox can satisfy.
    pub fn classify(&self, base: &str, toolbox: &ToolboxRegistry) -> Option<OperationClass> {
        self.classes.get(base).copied().or_else(|| {
            toolbox
                .contains(base)
                .then_some(OperationClass::GenericNumeric)
        })
    }

    /// Invoke an operation: direct handler first, generic strategy on
    /// absence or failure.
    pub fn invoke(
        &self,
        operation: &str,
        table: &Table,
        mapping: &Mapping,
        options: &Options,
        toolbox: &ToolboxRegistry,
        sink: &mut dyn RenderSink,
        diagnostics: &mut DiagnosticLog,
    ) -> Result<RouteValue> {
        let base = normalize_operation(operation);

        if let Some(handler) = self.direct.get(&base) {
            diagnostics.progress("direct", format!("attempting direct handler '{}'", base));
            match handler(table, mapping, options) {
                Ok(value) => return Ok(value),
                Err(err) => diagnostics.record(Diagnostic::new(
                    DiagnosticKind::FallbackTaken,
                    Severity::Warning,
                    format!("direct:{}", base),
                    format!("direct handler failed, falling back: {}", err),
                )),
            }
        }

        let class = self
            .classify(&base, toolbox)
            .ok_or_else(|| TrestleError::UnknownOperation(operation.to_string()))?;

        match class {
            OperationClass::GroupedStats => self.grouped_stats(table, mapping, diagnostics),
            OperationClass::PairedPlot => self
                .paired_plot(table, mapping, options, sink, diagnostics)
                .map(RouteValue::Rendered),
            OperationClass::GenericNumeric => self
                .generic_numeric(&base, table, mapping, options, toolbox, sink, diagnostics)
                .map(RouteValue::Value),
        }
    }

    /// Grouped-statistics strategy: partition, per-group summary,
    /// reconciliation. There is no direct grouped path; this class of
    /// external function is known to fail on skewed distributions, so the
    /// summary is always computed here.
    fn grouped_stats(
        &self,
        table: &Table,
        mapping: &Mapping,
        diagnostics: &mut DiagnosticLog,
    ) -> Result<RouteValue> {
        mapping.validate(table)?;
        let part = partition::partition(table, mapping.group.as_deref())?;
        let variables =
            summary::summary_variables(table, &mapping.predictors, part.key_column.as_deref());
        diagnostics.progress(
            "grouped_stats",
            format!(
                "{} group(s), {} variable(s)",
                part.n_groups(),
                variables.len()
            ),
        );

        let results = summary::group_summaries(table, &part, &variables, diagnostics)?;
        match reconcile::reconcile(results, diagnostics) {
            Reconciled::Merged(merged) => Ok(RouteValue::Table(merged)),
            Reconciled::Unmerged(tables) => Ok(RouteValue::Unmerged(tables)),
        }
    }

    /// Paired-comparison strategy: extract the selected columns as series,
    /// draw them, and apply source column names as labels best-effort.
    fn paired_plot(
        &self,
        table: &Table,
        mapping: &Mapping,
        options: &Options,
        sink: &mut dyn RenderSink,
        diagnostics: &mut DiagnosticLog,
    ) -> Result<RenderHandle> {
        mapping.validate(table)?;
        let selection = if !mapping.cols.is_empty() {
            Some(ColumnSelection::Names(mapping.cols.clone()))
        } else if !mapping.predictors.is_empty() {
            Some(ColumnSelection::Names(mapping.predictors.clone()))
        } else {
            None
        };

        let m = matrix::to_matrix(table, selection.as_ref())?;
        let series: Vec<Series> = m
            .names()
            .iter()
            .enumerate()
            .map(|(i, name)| Series::new(name.clone(), m.column(i).unwrap_or(&[]).to_vec()))
            .collect();

        let handle = sink.draw_comparison(&series)?;

        if options.auto_label {
            let spec = LabelSpec::from_options(m.names().to_vec(), options);
            if let Err(err) = sink.apply_labels(handle, &spec) {
                diagnostics.record(Diagnostic::new(
                    DiagnosticKind::LabelFailure,
                    Severity::Warning,
                    "paired_plot",
                    format!("label application failed: {}", err),
                ));
            }
        }

        Ok(handle)
    }

    /// Generic-numeric strategy: assemble `(Y, X)` or `X`-only arguments
    /// from the mapping, drop rows with missing values jointly, and call the
    /// black-box function positionally. A failing call degrades to a
    /// missing-marker scalar with a diagnostic.
    fn generic_numeric(
        &self,
        base: &str,
        table: &Table,
        mapping: &Mapping,
        options: &Options,
        toolbox: &ToolboxRegistry,
        sink: &mut dyn RenderSink,
        diagnostics: &mut DiagnosticLog,
    ) -> Result<ToolboxValue> {
        let resolved = mapping.resolve(table)?;

        let x_full = matrix::to_matrix(
            table,
            Some(&ColumnSelection::Names(resolved.predictors.clone())),
        )?;
        let y_full = match &resolved.response {
            Some(name) => {
                let column = table
                    .column(name)
                    .ok_or_else(|| TrestleError::columns_not_found([name.clone()]))?;
                Some(coerce::coerce(name, column)?)
            }
            None => None,
        };

        let mut assembled: Vec<&[f64]> = (0..x_full.n_cols())
            .filter_map(|i| x_full.column(i))
            .collect();
        if let Some(y) = &y_full {
            assembled.push(y.as_slice());
        }
        let keep = matrix::complete_rows(&assembled);

        let x = x_full.take_rows(&keep);
        let y = y_full.map(|values| {
            keep.iter()
                .map(|&i| values.get(i).copied().unwrap_or(f64::NAN))
                .collect()
        });
        let args = NumericArgs { y, x };
        diagnostics.progress(
            "generic_numeric",
            format!("calling '{}' with {} complete row(s)", base, args.n_rows()),
        );

        let function = toolbox
            .get(base)
            .ok_or_else(|| TrestleError::UnknownOperation(base.to_string()))?;
        let value = match function.call(&args, options) {
            Ok(value) => value,
            Err(err) => {
                diagnostics.record(Diagnostic::new(
                    DiagnosticKind::StrategyFailed,
                    Severity::Warning,
                    format!("toolbox:{}", base),
                    format!("call failed, degrading to missing result: {}", err),
                ));
                ToolboxValue::Scalar(f64::NAN)
            }
        };

        if options.auto_label {
            if let Some(handle) = value.render_handle() {
                let spec = LabelSpec::from_options(args.x.names().to_vec(), options);
                if let Err(err) = sink.apply_labels(handle, &spec) {
                    diagnostics.record(Diagnostic::new(
                        DiagnosticKind::LabelFailure,
                        Severity::Warning,
                        format!("toolbox:{}", base),
                        format!("label application failed: {}", err),
                    ));
                }
            }
        }

        Ok(value)
    }
}

impl Default for SafeInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SafeInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeInvoker")
            .field("direct", &self.direct.keys().collect::<Vec<_>>())
            .field("classes", &self.classes)
            .finish()
    }
}
