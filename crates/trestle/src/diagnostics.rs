//! Diagnostic events emitted by fallback and failure transitions.
//!
//! Every fallback taken, absorbed failure, and degraded merge emits one
//! event carrying the strategy name and the causing condition. Events never
//! change control flow; they are accumulated per request and returned with
//! the outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity level of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only, recorded in verbose mode.
    Info,
    /// A fallback or absorbed failure worth surfacing.
    Warning,
    /// A definite problem that still did not abort the request.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Kind of transition that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A direct handler failed and control fell through to a generic strategy.
    FallbackTaken,
    /// A strategy or per-group attempt failed and was absorbed.
    StrategyFailed,
    /// Label application failed; the primary result is unaffected.
    LabelFailure,
    /// Reconciliation degraded to returning the unmerged sequence.
    ReconcileDegraded,
    /// Progress note, recorded only in verbose mode.
    Progress,
}

/// A single diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Transition that produced the event.
    pub kind: DiagnosticKind,
    /// Severity level.
    pub severity: Severity,
    /// Strategy or stage that produced the event.
    pub strategy: String,
    /// Human-readable description of the causing condition.
    pub message: String,
    /// Structured detail, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// When the event was emitted.
    pub emitted_at: DateTime<Utc>,
}

impl Diagnostic {
    /// Create a new diagnostic event.
    pub fn new(
        kind: DiagnosticKind,
        severity: Severity,
        strategy: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            strategy: strategy.into(),
            message: message.into(),
            detail: None,
            emitted_at: Utc::now(),
        }
    }

    /// Attach structured detail.
    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Request-scoped accumulator for diagnostic events.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    events: Vec<Diagnostic>,
    verbose: bool,
}

impl DiagnosticLog {
    /// Create a log. Progress events are dropped unless `verbose` is set.
    pub fn new(verbose: bool) -> Self {
        Self {
            events: Vec::new(),
            verbose,
        }
    }

    /// Record an event. Progress events are recorded only in verbose mode.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind == DiagnosticKind::Progress && !self.verbose {
            return;
        }
        self.events.push(diagnostic);
    }

    /// Record a progress note.
    pub fn progress(&mut self, strategy: impl Into<String>, message: impl Into<String>) {
        self.record(Diagnostic::new(
            DiagnosticKind::Progress,
            Severity::Info,
            strategy,
            message,
        ));
    }

    /// Record a warning-level event.
    pub fn warning(
        &mut self,
        kind: DiagnosticKind,
        strategy: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(Diagnostic::new(kind, Severity::Warning, strategy, message));
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// Consume the log, returning its events.
    pub fn into_events(self) -> Vec<Diagnostic> {
        self.events
    }

    /// Count of events at or above a severity.
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.events.iter().filter(|d| d.severity >= severity).count()
    }
}
