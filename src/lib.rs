//! # bitscaler
//!
//! Per-column numeric normalization with power-of-two scale factors.
//!
//! For every column the scaler maps the observed range `[low, high]` into a
//! target interval (default `[-1, 1]`), dividing by the smallest power of two
//! that covers `high - low` instead of the span itself:
//!
//! ```text
//! f(x) = new_low + (x - low) * (new_high - new_low) / 2^ceil(log2(high - low))
//! ```
//!
//! The scale factor is stable under small changes of the observed range,
//! which suits fixed-point and quantized pipelines. Fitted extremes usually
//! land strictly inside the target interval; that headroom is intended.
//!
//! ## Quick Start
//!
//! ```rust
//! use bitscaler::{BitScaler, Target};
//! use bitscaler::table::InMemoryTable;
//!
//! let mut table = InMemoryTable::new(vec![
//!     ("price", vec![10.0, 35.0, 70.0]),
//!     ("qty", vec![0.0, 3.0, 12.0]),
//! ]).unwrap();
//!
//! let mut scaler = BitScaler::new();
//! scaler.auto_range(&table, None).unwrap();
//! scaler.fit(None, Target::new(0.0, 1.0)).unwrap();
//! scaler.apply(&mut table).unwrap();
//!
//! // price: span 60 -> 64, qty: span 12 -> 16
//! assert_eq!(table.column("price").unwrap(), &[0.0, 0.390625, 0.9375]);
//! assert_eq!(table.column("qty").unwrap(), &[0.0, 0.1875, 0.75]);
//! ```
//!
//! ## Module Structure
//!
//! - `scaling` — the [`BitScaler`] and its per-column transforms
//! - `range` — observed column ranges and the target interval
//! - `table` — the table trait the scaler reads and rewrites
//! - `config` — JSON-loadable scaler configuration
//! - `serialization` — persisted form of a fitted scaler
//! - `error` — error type shared by all operations

/// Error type shared by all operations.
pub mod error;

/// Column ranges and target intervals.
pub mod range;

/// Power-of-two range scaling.
pub mod scaling;

/// Table abstraction the scaler reads from and writes to.
pub mod table;

/// JSON-loadable scaler configuration.
pub mod config;

/// Persistence of fitted scaler state.
pub mod serialization;

pub use config::BitScalerConfig;
pub use error::{ErrorKind, Result, ScalerError};
pub use range::{RangeEntry, RangeMap, Target};
pub use scaling::{quant_range, BitScaler, ColumnTransform};
pub use table::{InMemoryTable, Table};
