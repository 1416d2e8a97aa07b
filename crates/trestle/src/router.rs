//! Top-level routing between direct handlers and the autopilot path.

use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::error::{Result, TrestleError};
use crate::invoke::{DirectHandler, OperationClass, RouteValue, SafeInvoker};
use crate::mapping::Mapping;
use crate::options::Options;
use crate::render::RenderSink;
use crate::table::Table;
use crate::toolbox::{builtin_histogram, ToolboxFn, ToolboxRegistry};

/// Outcome of a routed operation: the result value plus every diagnostic
/// event emitted along the way.
#[derive(Debug)]
pub struct RouteOutcome {
    pub value: RouteValue,
    pub diagnostics: Vec<Diagnostic>,
}

/// Top-level entry point resolving operation names to execution paths.
///
/// A router owns the direct-handler and class registries and the toolbox of
/// black-box functions. Requests are routed with [`Router::route`] or
/// through an [`Autopilot`] session.
#[derive(Debug)]
pub struct Router {
    invoker: SafeInvoker,
    toolbox: ToolboxRegistry,
}

impl Router {
    /// Create a router with the built-in classes and toolbox entries.
    pub fn new() -> Self {
        let mut toolbox = ToolboxRegistry::new();
        toolbox.register(builtin_histogram());
        Self {
            invoker: SafeInvoker::new(),
            toolbox,
        }
    }

    /// Register a direct handler, preferred over the generic path for its
    /// operation name (normalized; the `safe_` prefix is recognized).
    pub fn register_direct(&mut self, name: &str, handler: DirectHandler) {
        self.invoker.register_direct(name, handler);
    }

    /// Register or override an operation's execution class.
    pub fn register_class(&mut self, name: &str, class: OperationClass) {
        self.invoker.register_class(name, class);
    }

    /// Register a black-box toolbox function.
    pub fn register_toolbox(&mut self, function: impl ToolboxFn + 'static) {
        self.toolbox.register(function);
    }

    /// Route one operation request.
    ///
    /// The table must have at least one column; the mapping's referenced
    /// names must all resolve. Within those preconditions, the router favors
    /// returning some structurally valid result over failing: direct-handler
    /// failures, per-group failures, degraded merges, and label failures are
    /// absorbed into diagnostics carried on the outcome.
    pub fn route(
        &self,
        table: &Table,
        operation: &str,
        mapping: &Mapping,
        options: &Options,
        sink: &mut dyn RenderSink,
    ) -> Result<RouteOutcome> {
        if table.is_empty() {
            return Err(TrestleError::EmptyData("table has no columns".to_string()));
        }
        let mut diagnostics = DiagnosticLog::new(options.verbose);
        let value = self.invoker.invoke(
            operation,
            table,
            mapping,
            options,
            &self.toolbox,
            sink,
            &mut diagnostics,
        )?;
        Ok(RouteOutcome {
            value,
            diagnostics: diagnostics.into_events(),
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Session context binding a table, mapping, and options.
///
/// Results are returned from [`Autopilot::run`], never cached on the
/// session; callers needing the last outcome keep the return value.
#[derive(Debug, Clone)]
pub struct Autopilot {
    table: Table,
    mapping: Mapping,
    options: Options,
}

impl Autopilot {
    /// Bind a session. The mapping is validated against the table up front
    /// so every referenced column is known to resolve.
    pub fn new(table: Table, mapping: Mapping, options: Options) -> Result<Self> {
        if table.is_empty() {
            return Err(TrestleError::EmptyData("table has no columns".to_string()));
        }
        mapping.validate(&table)?;
        Ok(Self {
            table,
            mapping,
            options,
        })
    }

    /// The bound table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The bound mapping.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The bound options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Run one operation against the bound context.
    pub fn run(
        &self,
        router: &Router,
        operation: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<RouteOutcome> {
        router.route(&self.table, operation, &self.mapping, &self.options, sink)
    }
}

#[cfg(test)]
mod tests {
    use crate::render::RecordingSink;
    use crate::table::Column;

    use super::*;

    fn sample() -> Table {
        Table::new()
            .with_column(
                "Group",
                Column::Text(vec!["X".to_string(), "Y".to_string(), "X".to_string()]),
            )
            .unwrap()
            .with_column("Val", Column::Numeric(vec![10.0, f64::NAN, 30.0]))
            .unwrap()
    }

    #[test]
    fn test_empty_table_is_a_precondition_failure() {
        let router = Router::new();
        let mut sink = RecordingSink::new();
        let err = router
            .route(
                &Table::new(),
                "grouped_summary",
                &Mapping::new(),
                &Options::new(),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, TrestleError::EmptyData(_)));
    }

    #[test]
    fn test_unknown_operation_is_fatal() {
        let router = Router::new();
        let mut sink = RecordingSink::new();
        let err = router
            .route(
                &sample(),
                "no_such_operation",
                &Mapping::new(),
                &Options::new(),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, TrestleError::UnknownOperation(name) if name == "no_such_operation"));
    }

    #[test]
    fn test_autopilot_validates_mapping_up_front() {
        let mapping = Mapping::new().with_group("missing");
        let err = Autopilot::new(sample(), mapping, Options::new()).unwrap_err();
        assert!(matches!(err, TrestleError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_autopilot_runs_against_bound_context() {
        let autopilot =
            Autopilot::new(sample(), Mapping::new().with_group("Group"), Options::new()).unwrap();
        let router = Router::new();
        let mut sink = RecordingSink::new();
        let outcome = autopilot.run(&router, "grouped_summary", &mut sink).unwrap();
        match outcome.value {
            RouteValue::Table(table) => assert_eq!(table.n_rows(), 2),
            other => panic!("unexpected value: {other:?}"),
        }
    }
}
