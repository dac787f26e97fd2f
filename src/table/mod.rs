//! Table abstraction consumed by the scaler.
//!
//! The scaler never owns table storage. It only needs four capabilities
//! from whatever holds the data:
//!
//! - **Columns** — list the named columns and test for presence
//! - **Rows** — report the row count (possibly zero)
//! - **Reduction** — per-column `(min, max)`
//! - **Replacement** — rewrite a named column elementwise
//!
//! [`InMemoryTable`] is a plain `Vec<f64>`-per-column implementation. With the
//! `ndarray` feature, [`NdarrayTable`] wraps an `Array2<f64>` with column names.
//!
//! # Example
//!
//! ```rust
//! use bitscaler::table::{InMemoryTable, Table};
//!
//! let table = InMemoryTable::new(vec![
//!     ("a", vec![0.0, 50.0, 100.0]),
//!     ("b", vec![5.0, 5.0, 5.0]),
//! ]).unwrap();
//!
//! assert_eq!(table.n_rows(), 3);
//! assert_eq!(table.column_min_max("a").unwrap(), (0.0, 100.0));
//! ```

use crate::error::Result;

pub mod memory;
pub use self::memory::InMemoryTable;

#[cfg(feature = "ndarray")]
mod ndarray_table;
#[cfg(feature = "ndarray")]
pub use self::ndarray_table::NdarrayTable;

/// Named numeric columns that can be reduced and rewritten in place.
pub trait Table {
    /// Column names in table order.
    fn column_names(&self) -> Vec<&str>;

    /// Number of rows. May be zero.
    fn n_rows(&self) -> usize;

    /// Whether a column called `name` exists.
    fn has_column(&self, name: &str) -> bool {
        self.column_names().iter().any(|c| *c == name)
    }

    /// `(min, max)` of a column, skipping NaN values.
    ///
    /// A column without any non-NaN value (including an empty one) reduces to
    /// `(0.0, 0.0)`.
    ///
    /// # Errors
    /// [`ScalerError::MissingColumn`](crate::ScalerError::MissingColumn) if the
    /// column does not exist.
    fn column_min_max(&self, name: &str) -> Result<(f64, f64)>;

    /// Replace every value `x` of column `name` with `f(x)`.
    ///
    /// # Errors
    /// [`ScalerError::MissingColumn`](crate::ScalerError::MissingColumn) if the
    /// column does not exist; the table is left untouched in that case.
    fn map_column<F: Fn(f64) -> f64>(&mut self, name: &str, f: F) -> Result<()>;
}

/// NaN-skipping min/max reduction shared by the table implementations.
pub(crate) fn nan_min_max<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}
