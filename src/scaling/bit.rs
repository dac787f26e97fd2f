//! Bit Scaler.
//!
//! Like min-max scaling, but each column's observed span is rounded up to
//! the smallest covering power of two before dividing, so the scale factor
//! of every column is an exact power of two times the target width.
//!
//! Lifecycle:
//! ```text
//! new() --auto_range()--> new() + ranges --fit()--> fitted --apply()/save()
//!                                                      ^
//! load() ----------------------------------------------+
//! ```
//!
//! # Example
//! ```
//! use bitscaler::{BitScaler, Target};
//! use bitscaler::table::InMemoryTable;
//!
//! let mut table = InMemoryTable::new(vec![("a", vec![0.0, 100.0, 128.0])]).unwrap();
//!
//! let mut scaler = BitScaler::new();
//! scaler.auto_range(&table, Some(&["a"])).unwrap();
//! scaler.fit(None, Target::default()).unwrap();
//! scaler.apply(&mut table).unwrap();
//!
//! assert_eq!(table.column("a").unwrap(), &[-1.0, 0.5625, 1.0]);
//! ```

use crate::config::BitScalerConfig;
use crate::error::{Result, ScalerError};
use crate::range::{RangeMap, Target};
use crate::scaling::quant::ColumnTransform;
use crate::serialization::{self, TARGET_KEY};
use crate::table::Table;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// State produced by a successful fit. Never mutated afterwards.
#[derive(Debug, Clone)]
struct FittedState {
    target: Target,
    ranges: RangeMap,
    transforms: BTreeMap<String, ColumnTransform>,
}

/// Per-column power-of-two range scaler.
///
/// Fitting is single-shot: a fitted scaler cannot be refitted, build a new
/// one instead. A fitted scaler is read-only and can be shared across
/// threads to transform distinct tables.
#[derive(Debug, Clone, Default)]
pub struct BitScaler {
    range_map: Option<RangeMap>,
    fitted: Option<FittedState>,
}

impl BitScaler {
    /// Create an unfitted scaler without range information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the `(min, max)` of `columns` (every column when `None`).
    ///
    /// Replaces any previously recorded ranges. Does not fit, and does not
    /// touch the ranges an already fitted scaler was fitted on.
    ///
    /// # Errors
    /// [`ScalerError::MissingColumn`] if a requested column is absent; the
    /// recorded ranges are left unchanged.
    pub fn auto_range<T: Table>(&mut self, table: &T, columns: Option<&[&str]>) -> Result<()> {
        let columns: Vec<&str> = match columns {
            Some(columns) => columns.to_vec(),
            None => table.column_names(),
        };

        let mut ranges = RangeMap::new();
        for column in columns {
            let (low, high) = table.column_min_max(column)?;
            debug!(column, low, high, "Observed column range");
            ranges.insert(column, (low, high));
        }

        info!(
            columns = ranges.len(),
            rows = table.n_rows(),
            "Discovered column ranges"
        );
        self.range_map = Some(ranges);
        Ok(())
    }

    /// Fit one transform per column.
    ///
    /// Uses `range_map` when given, otherwise the ranges recorded by
    /// [`auto_range`](Self::auto_range). Fitting is all-or-nothing: on error
    /// the scaler is left as it was.
    ///
    /// # Errors
    /// - [`ScalerError::AlreadyFitted`] if called a second time
    /// - [`ScalerError::NoRangeInformation`] if there are no ranges to fit
    /// - [`ScalerError::InvalidTarget`] if a target bound is not finite
    /// - [`ScalerError::ReservedColumnName`] for a column named `"target"`
    /// - [`ScalerError::DegenerateRange`] for a zero-width column range
    /// - [`ScalerError::InvalidRange`] for a non-finite, inverted or
    ///   uncoverable column range
    pub fn fit(&mut self, range_map: Option<RangeMap>, target: impl Into<Target>) -> Result<()> {
        if self.fitted.is_some() {
            return Err(ScalerError::AlreadyFitted);
        }

        let ranges = match range_map {
            Some(ranges) => ranges,
            None => self
                .range_map
                .clone()
                .ok_or(ScalerError::NoRangeInformation)?,
        };

        let target = target.into();
        if !target.is_finite() {
            return Err(ScalerError::InvalidTarget {
                new_low: target.new_low,
                new_high: target.new_high,
            });
        }

        info!(
            columns = ranges.len(),
            new_low = target.new_low,
            new_high = target.new_high,
            "Fitting bit scaler"
        );

        let mut transforms = BTreeMap::new();
        for (column, range) in &ranges {
            if column == TARGET_KEY {
                return Err(ScalerError::ReservedColumnName(column.clone()));
            }
            let transform = ColumnTransform::fit(column, *range, target)?;
            debug!(
                column = column.as_str(),
                low = range.low,
                high = range.high,
                quant_range = transform.quant_range(),
                "Fitted column"
            );
            transforms.insert(column.clone(), transform);
        }

        self.range_map = Some(ranges.clone());
        self.fitted = Some(FittedState {
            target,
            ranges,
            transforms,
        });
        Ok(())
    }

    /// Discover ranges and fit in one step, as described by `config`.
    ///
    /// # Errors
    /// Anything [`auto_range`](Self::auto_range) or [`fit`](Self::fit) reports.
    /// An already fitted scaler fails before its ranges are replaced.
    pub fn fit_table<T: Table>(&mut self, table: &T, config: &BitScalerConfig) -> Result<()> {
        if self.fitted.is_some() {
            return Err(ScalerError::AlreadyFitted);
        }
        let columns: Option<Vec<&str>> = config
            .columns
            .as_ref()
            .map(|columns| columns.iter().map(String::as_str).collect());
        self.auto_range(table, columns.as_deref())?;
        self.fit(None, config.target)
    }

    /// Transform every fitted column of `table` in place.
    ///
    /// All fitted columns are checked for presence before any is modified,
    /// so a failed call leaves the table untouched. Columns outside the fit
    /// are not modified. Copy the table first if the original values are
    /// still needed.
    ///
    /// # Errors
    /// - [`ScalerError::NotFitted`] before [`fit`](Self::fit)
    /// - [`ScalerError::MissingColumn`] if a fitted column is absent
    pub fn apply<'t, T: Table>(&self, table: &'t mut T) -> Result<&'t mut T> {
        let fitted = self.fitted()?;

        if let Some(missing) = fitted
            .transforms
            .keys()
            .find(|column| !table.has_column(column))
        {
            return Err(ScalerError::MissingColumn(missing.clone()));
        }

        for (column, transform) in &fitted.transforms {
            let transform = *transform;
            table.map_column(column, move |x| transform.apply(x))?;
        }

        debug!(
            columns = fitted.transforms.len(),
            rows = table.n_rows(),
            "Applied bit scaler"
        );
        Ok(table)
    }

    /// Transform raw values as if they were the column `column`.
    ///
    /// # Errors
    /// - [`ScalerError::NotFitted`] before [`fit`](Self::fit)
    /// - [`ScalerError::UnfittedColumn`] if `column` was not fitted
    pub fn transform_values(&self, column: &str, values: &[f64]) -> Result<Vec<f64>> {
        let transform = self
            .fitted()?
            .transforms
            .get(column)
            .ok_or_else(|| ScalerError::UnfittedColumn(column.to_string()))?;
        Ok(values.iter().map(|&x| transform.apply(x)).collect())
    }

    /// Encode the fitted ranges and target as bytes.
    ///
    /// # Errors
    /// [`ScalerError::NotFitted`] before [`fit`](Self::fit).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let fitted = self.fitted()?;
        serialization::encode(&fitted.ranges, fitted.target)
    }

    /// Rebuild a fitted scaler from [`to_bytes`](Self::to_bytes) output.
    ///
    /// The restored ranges and target go through [`fit`](Self::fit) again,
    /// so the same range errors apply.
    ///
    /// # Errors
    /// - [`ScalerError::Serialization`] for undecodable bytes
    /// - [`ScalerError::MissingTarget`] if the target entry is absent
    /// - any error of [`fit`](Self::fit)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (ranges, target) = serialization::decode(bytes)?;
        let mut scaler = Self::new();
        scaler.fit(Some(ranges), target)?;
        Ok(scaler)
    }

    /// Save the fitted ranges and target to `path`.
    ///
    /// # Errors
    /// [`ScalerError::NotFitted`] before [`fit`](Self::fit), or
    /// [`ScalerError::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        info!(path = %path.as_ref().display(), "Saved bit scaler");
        Ok(())
    }

    /// Load a scaler saved with [`save`](Self::save) and fit it.
    ///
    /// # Errors
    /// [`ScalerError::Io`] if the file cannot be read, otherwise as
    /// [`from_bytes`](Self::from_bytes).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let scaler = Self::from_bytes(&bytes)?;
        info!(path = %path.as_ref().display(), "Loaded bit scaler");
        Ok(scaler)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Ranges recorded by [`auto_range`](Self::auto_range) or used by the fit.
    pub fn range_map(&self) -> Option<&RangeMap> {
        self.range_map.as_ref()
    }

    /// Target interval of a fitted scaler.
    pub fn target(&self) -> Option<Target> {
        self.fitted.as_ref().map(|f| f.target)
    }

    /// Fitted transform of `column`.
    pub fn transform(&self, column: &str) -> Option<&ColumnTransform> {
        self.fitted.as_ref()?.transforms.get(column)
    }

    /// All fitted transforms in column-name order. Empty when unfitted.
    pub fn transforms(&self) -> impl Iterator<Item = (&str, &ColumnTransform)> {
        self.fitted
            .iter()
            .flat_map(|f| f.transforms.iter().map(|(c, t)| (c.as_str(), t)))
    }

    /// Names of the fitted columns. Empty when unfitted.
    pub fn fitted_columns(&self) -> Vec<&str> {
        self.transforms().map(|(column, _)| column).collect()
    }

    fn fitted(&self) -> Result<&FittedState> {
        self.fitted.as_ref().ok_or(ScalerError::NotFitted)
    }
}
