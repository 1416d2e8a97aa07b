//! Black-box toolbox function boundary.
//!
//! Toolbox functions are the external collaborators this crate shims: a
//! name, positional numeric arguments, and the possibility of failure. The
//! registry resolves normalized operation names to implementations; the
//! dispatch machinery never inspects what a function computes.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::invoke::normalize_operation;
use crate::matrix::NumericMatrix;
use crate::options::Options;
use crate::render::RenderHandle;
use crate::table::Table;

/// Positional numeric arguments assembled for a toolbox call.
///
/// Rows containing missing values have already been removed jointly across
/// the response and predictor columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArgs {
    /// Response vector, when the mapping declares one.
    pub y: Option<Vec<f64>>,
    /// Predictor matrix, column order following the mapping.
    pub x: NumericMatrix,
}

impl NumericArgs {
    /// Number of rows in the assembled argument set.
    pub fn n_rows(&self) -> usize {
        self.x.n_rows()
    }
}

/// Result value returned by a toolbox function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ToolboxValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(NumericMatrix),
    Table(Table),
    /// Named result fields, e.g. `edges`/`pdf` or `scores`/`coeff`/`mu`.
    Fields(IndexMap<String, ToolboxValue>),
    Handle(RenderHandle),
}

impl ToolboxValue {
    /// The render handle carried by this value, when it looks renderable:
    /// either a handle directly, or named fields whose first field is one.
    pub fn render_handle(&self) -> Option<RenderHandle> {
        match self {
            ToolboxValue::Handle(handle) => Some(*handle),
            ToolboxValue::Fields(fields) => match fields.values().next() {
                Some(ToolboxValue::Handle(handle)) => Some(*handle),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A black-box toolbox function.
pub trait ToolboxFn {
    /// The function's registered name.
    fn name(&self) -> &str;

    /// Call with positional numeric arguments. May fail.
    fn call(&self, args: &NumericArgs, options: &Options) -> Result<ToolboxValue>;
}

/// Toolbox function backed by a closure.
pub struct FnToolbox {
    name: String,
    body: Box<dyn Fn(&NumericArgs, &Options) -> Result<ToolboxValue>>,
}

impl FnToolbox {
    /// Wrap a closure as a named toolbox function.
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&NumericArgs, &Options) -> Result<ToolboxValue> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }
}

impl ToolboxFn for FnToolbox {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &NumericArgs, options: &Options) -> Result<ToolboxValue> {
        (self.body)(args, options)
    }
}

impl fmt::Debug for FnToolbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnToolbox").field("name", &self.name).finish()
    }
}

/// Registry of toolbox functions keyed by normalized base name.
#[derive(Default)]
pub struct ToolboxRegistry {
    functions: IndexMap<String, Box<dyn ToolboxFn>>,
}

impl ToolboxRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its normalized name. A later registration
    /// under the same name replaces the earlier one.
    pub fn register(&mut self, function: impl ToolboxFn + 'static) {
        let key = normalize_operation(function.name());
        self.functions.insert(key, Box::new(function));
    }

    /// Look up a function by normalized base name.
    pub fn get(&self, base: &str) -> Option<&dyn ToolboxFn> {
        self.functions.get(base).map(Box::as_ref)
    }

    /// Returns true when a function is registered under this base name.
    pub fn contains(&self, base: &str) -> bool {
        self.functions.contains_key(base)
    }
}

impl fmt::Debug for ToolboxRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolboxRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Simple equal-width histogram over the first predictor column.
///
/// Returns `edges` (bin count + 1) and `pdf` normalized to unit area. This
/// is the one built-in; real statistical algorithms stay behind the
/// [`ToolboxFn`] boundary as external collaborators.
pub fn builtin_histogram() -> FnToolbox {
    FnToolbox::new("histogram", |args, options| {
        let bins = options.num_bins().unwrap_or(10).max(1);
        let data: Vec<f64> = args
            .x
            .column(0)
            .map(|column| column.iter().copied().filter(|v| v.is_finite()).collect())
            .unwrap_or_default();

        let mut fields = IndexMap::new();
        if data.is_empty() {
            fields.insert("edges".to_string(), ToolboxValue::Vector(Vec::new()));
            fields.insert("pdf".to_string(), ToolboxValue::Vector(Vec::new()));
            return Ok(ToolboxValue::Fields(fields));
        }

        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (low, high) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (high - low) / bins as f64;

        let edges: Vec<f64> = (0..=bins).map(|i| low + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &value in &data {
            let mut bin = ((value - low) / width) as usize;
            if bin >= bins {
                bin = bins - 1;
            }
            counts[bin] += 1;
        }
        let total = data.len() as f64;
        let pdf: Vec<f64> = counts
            .iter()
            .map(|&count| count as f64 / (total * width))
            .collect();

        fields.insert("edges".to_string(), ToolboxValue::Vector(edges));
        fields.insert("pdf".to_string(), ToolboxValue::Vector(pdf));
        Ok(ToolboxValue::Fields(fields))
    })
}
