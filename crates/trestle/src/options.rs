//! Execution options and label rendering hints.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Orientation hint for axis/row labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrientation {
    Horizontal,
    Vertical,
}

/// Options recognized across operations.
///
/// The named fields are the cross-cutting keys; operation-specific keys
/// (`num_bins`, `bandwidth`, `num_points`, `num_components`, `center`,
/// `scale`) live in `extra` and are read through the typed getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Emit progress diagnostics.
    #[serde(alias = "Verbose")]
    pub verbose: bool,
    /// Apply source column names as plot labels, best-effort.
    #[serde(alias = "AutoLabel")]
    pub auto_label: bool,
    /// Label rotation in degrees.
    #[serde(alias = "LabelRotate")]
    pub label_rotate: Option<f64>,
    /// Label font size in points.
    #[serde(alias = "LabelFontSize")]
    pub label_font_size: Option<f64>,
    /// Label orientation hint.
    #[serde(alias = "LabelOrientation")]
    pub label_orientation: Option<LabelOrientation>,
    /// Operation-specific keys.
    pub extra: IndexMap<String, Value>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbose: false,
            auto_label: true,
            label_rotate: None,
            label_font_size: None,
            label_orientation: None,
            extra: IndexMap::new(),
        }
    }
}

impl Options {
    /// Default options: quiet, auto-labeling on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable or disable auto-labeling.
    pub fn with_auto_label(mut self, auto_label: bool) -> Self {
        self.auto_label = auto_label;
        self
    }

    /// Set the label rotation hint.
    pub fn with_label_rotate(mut self, degrees: f64) -> Self {
        self.label_rotate = Some(degrees);
        self
    }

    /// Set the label font size hint.
    pub fn with_label_font_size(mut self, points: f64) -> Self {
        self.label_font_size = Some(points);
        self
    }

    /// Set the label orientation hint.
    pub fn with_label_orientation(mut self, orientation: LabelOrientation) -> Self {
        self.label_orientation = Some(orientation);
        self
    }

    /// Set an operation-specific key.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    fn usize_key(&self, key: &str) -> Option<usize> {
        self.extra
            .get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }

    fn f64_key(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    fn bool_key(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(Value::as_bool)
    }

    /// Number of bins for histogram-class operations.
    pub fn num_bins(&self) -> Option<usize> {
        self.usize_key("num_bins")
    }

    /// Kernel bandwidth for density-class operations.
    pub fn bandwidth(&self) -> Option<f64> {
        self.f64_key("bandwidth")
    }

    /// Evaluation point count for density-class operations.
    pub fn num_points(&self) -> Option<usize> {
        self.usize_key("num_points")
    }

    /// Component count for projection-class operations.
    pub fn num_components(&self) -> Option<usize> {
        self.usize_key("num_components")
    }

    /// Whether projection-class operations should center. Defaults to true.
    pub fn center(&self) -> bool {
        self.bool_key("center").unwrap_or(true)
    }

    /// Whether projection-class operations should scale. Defaults to false.
    pub fn scale(&self) -> bool {
        self.bool_key("scale").unwrap_or(false)
    }
}
