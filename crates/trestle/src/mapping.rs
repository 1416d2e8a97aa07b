//! Column-role mapping configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrestleError};
use crate::table::{ColumnType, Table};

/// User-declared association of columns to operation roles.
///
/// All fields are optional; absent fields trigger auto-detection at
/// resolution time. The serde aliases mirror the configuration keys the
/// original toolbox accepted (`Y`/`Response`, `X`/`Predictors`, `Group`,
/// `Cols`/`VarNames`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mapping {
    /// Response column for `(Y, X)` argument assembly.
    #[serde(alias = "Y", alias = "Response")]
    pub response: Option<String>,
    /// Predictor columns, in argument order.
    #[serde(alias = "X", alias = "Predictors")]
    pub predictors: Vec<String>,
    /// Grouping column.
    #[serde(alias = "Group")]
    pub group: Option<String>,
    /// Column selection for plotting operations.
    #[serde(alias = "Cols", alias = "VarNames")]
    pub cols: Vec<String>,
}

impl Mapping {
    /// An empty mapping; every field auto-detects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response column.
    pub fn with_response(mut self, name: impl Into<String>) -> Self {
        self.response = Some(name.into());
        self
    }

    /// Set the predictor columns.
    pub fn with_predictors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predictors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the grouping column.
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.group = Some(name.into());
        self
    }

    /// Set the plotting column selection.
    pub fn with_cols<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cols = names.into_iter().map(Into::into).collect();
        self
    }

    /// Every column name this mapping references.
    pub fn referenced(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(response) = &self.response {
            names.push(response);
        }
        names.extend(self.predictors.iter().map(String::as_str));
        if let Some(group) = &self.group {
            names.push(group);
        }
        names.extend(self.cols.iter().map(String::as_str));
        names
    }

    /// Check every referenced name against the table, reporting all missing
    /// names jointly.
    pub fn validate(&self, table: &Table) -> Result<()> {
        table.require_columns(&self.referenced())
    }

    /// Resolve to concrete argument columns, auto-detecting absent fields:
    /// absent predictors default to every numeric column that is not the
    /// response or the grouping key.
    pub fn resolve(&self, table: &Table) -> Result<ResolvedMapping> {
        self.validate(table)?;

        let predictors: Vec<String> = if !self.predictors.is_empty() {
            self.predictors.clone()
        } else {
            table
                .iter()
                .filter(|(name, column)| {
                    column.type_tag() == ColumnType::Numeric
                        && Some(name.as_str()) != self.response.as_deref()
                        && Some(name.as_str()) != self.group.as_deref()
                })
                .map(|(name, _)| name.clone())
                .collect()
        };

        if predictors.is_empty() {
            return Err(TrestleError::NoNumericColumns);
        }

        Ok(ResolvedMapping {
            response: self.response.clone(),
            predictors,
            group: self.group.clone(),
        })
    }
}

/// A mapping with auto-detection applied; every name is known to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    pub response: Option<String>,
    pub predictors: Vec<String>,
    pub group: Option<String>,
}
