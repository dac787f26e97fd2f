//! Power-of-two range scaling.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`BitScaler`] | Fits, applies and persists per-column transforms |
//! | [`ColumnTransform`] | Affine transform of one fitted column |
//! | [`quant_range`] | Smallest power of two covering a span |

pub mod bit;
pub mod quant;

pub use bit::BitScaler;
pub use quant::{quant_range, ColumnTransform};
