//! Rendering boundary: an opaque sink for numeric series and labels.
//!
//! The core never draws anything itself. Plotting operations hand numeric
//! series to a [`RenderSink`] and get back an opaque handle; label
//! application may fail without affecting the drawn result.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrestleError};
use crate::options::{LabelOrientation, Options};

/// A named numeric series handed to the render sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    /// Create a named series.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Opaque handle identifying something the sink has drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle(pub u64);

/// Label request assembled from source column names and option hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// One label per series, in series order.
    pub labels: Vec<String>,
    /// Rotation in degrees.
    pub rotate: Option<f64>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Orientation hint.
    pub orientation: Option<LabelOrientation>,
}

impl LabelSpec {
    /// Build a label request from column names and option hints.
    pub fn from_options(labels: Vec<String>, options: &Options) -> Self {
        Self {
            labels,
            rotate: options.label_rotate,
            font_size: options.label_font_size,
            orientation: options.label_orientation,
        }
    }
}

/// Side-effecting sink that accepts numeric series and labels.
///
/// Implementations are external collaborators. The core requires only that
/// drawing yields an opaque handle and that applying labels may fail
/// independently of the drawn result.
pub trait RenderSink {
    /// Draw a multi-series comparison and return a handle to it.
    fn draw_comparison(&mut self, series: &[Series]) -> Result<RenderHandle>;

    /// Apply labels to a previously drawn handle.
    fn apply_labels(&mut self, handle: RenderHandle, labels: &LabelSpec) -> Result<()>;
}

/// Sink that records calls without rendering anything.
///
/// Useful as a default sink and in tests; the failure switches exercise the
/// fallback and warning paths.
#[derive(Debug, Default)]
pub struct RecordingSink {
    next_handle: u64,
    /// Every series set drawn, in call order.
    pub drawn: Vec<Vec<Series>>,
    /// Every label application, in call order.
    pub labeled: Vec<(RenderHandle, LabelSpec)>,
    /// When set, `draw_comparison` fails.
    pub fail_draw: bool,
    /// When set, `apply_labels` fails.
    pub fail_labels: bool,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `draw_comparison` fail.
    pub fn with_failing_draw(mut self) -> Self {
        self.fail_draw = true;
        self
    }

    /// Make `apply_labels` fail.
    pub fn with_failing_labels(mut self) -> Self {
        self.fail_labels = true;
        self
    }
}

impl RenderSink for RecordingSink {
    fn draw_comparison(&mut self, series: &[Series]) -> Result<RenderHandle> {
        if self.fail_draw {
            return Err(TrestleError::operation_failed(
                "draw_comparison",
                "sink configured to fail",
            ));
        }
        self.next_handle += 1;
        self.drawn.push(series.to_vec());
        Ok(RenderHandle(self.next_handle))
    }

    fn apply_labels(&mut self, handle: RenderHandle, labels: &LabelSpec) -> Result<()> {
        if self.fail_labels {
            return Err(TrestleError::operation_failed(
                "apply_labels",
                "sink configured to fail",
            ));
        }
        self.labeled.push((handle, labels.clone()));
        Ok(())
    }
}
