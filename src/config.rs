//! Scaler configuration.
//!
//! Mirrors the JSON a caller would keep next to its data, e.g.
//!
//! ```json
//! { "target": { "new_low": 0.0, "new_high": 1.0 }, "columns": ["price", "qty"] }
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use crate::error::Result;
use crate::range::Target;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`BitScaler::fit_table`](crate::BitScaler::fit_table).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BitScalerConfig {
    /// Interval every column is mapped into.
    #[serde(default)]
    pub target: Target,
    /// Columns to scale; `None` scales every column of the table.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl BitScalerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target interval.
    pub fn with_target(mut self, new_low: f64, new_high: f64) -> Self {
        self.target = Target::new(new_low, new_high);
        self
    }

    /// Restrict scaling to the given columns.
    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
