//! Trestle: dispatch-with-fallback routing between tabular datasets and
//! numeric toolbox functions.
//!
//! Trestle maps logical tables (named columns, mixed types, missing values)
//! onto the positional numeric arguments that statistics and plotting
//! functions expect, and recovers when those functions cannot be called or
//! fail.
//!
//! # Core Principles
//!
//! - **Fallback over failure**: a direct handler is tried first; on absence
//!   or failure a generic strategy produces a structurally valid result.
//! - **No data loss**: heterogeneous per-group results are unioned with
//!   type-correct fillers; impossible merges return the unmerged inputs.
//! - **Diagnostics, not exceptions**: absorbed failures are reported as
//!   events on the outcome, never by unwinding.
//!
//! # Example
//!
//! ```no_run
//! use trestle::{Mapping, Options, RecordingSink, Router, Table, Column};
//!
//! let table = Table::new()
//!     .with_column("Group", Column::Text(vec!["X".into(), "Y".into(), "X".into()]))
//!     .unwrap()
//!     .with_column("Val", Column::Numeric(vec![10.0, f64::NAN, 30.0]))
//!     .unwrap();
//!
//! let router = Router::new();
//! let mut sink = RecordingSink::new();
//! let outcome = router
//!     .route(&table, "grouped_summary", &Mapping::new(), &Options::new(), &mut sink)
//!     .unwrap();
//!
//! println!("diagnostics: {}", outcome.diagnostics.len());
//! ```

pub mod coerce;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod invoke;
pub mod mapping;
pub mod matrix;
pub mod options;
pub mod partition;
pub mod reconcile;
pub mod render;
pub mod router;
pub mod summary;
pub mod table;
pub mod toolbox;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, Severity};
pub use error::{Result, TrestleError};
pub use invoke::{DirectHandler, OperationClass, RouteValue, SafeInvoker};
pub use mapping::{Mapping, ResolvedMapping};
pub use matrix::{ColumnSelection, NumericMatrix};
pub use options::{LabelOrientation, Options};
pub use partition::{GroupKey, GroupPartition};
pub use reconcile::Reconciled;
pub use render::{LabelSpec, RecordingSink, RenderHandle, RenderSink, Series};
pub use router::{Autopilot, RouteOutcome, Router};
pub use table::{Column, ColumnType, Table, Value};
pub use toolbox::{FnToolbox, NumericArgs, ToolboxFn, ToolboxRegistry, ToolboxValue};
