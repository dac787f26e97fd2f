//! Power-of-two range quantum and the per-column affine transform.
//!
//! The transform is given by:
//! ```text
//! f(x) = new_low + (x - low) / quant_range * (new_high - new_low)
//! quant_range = 2 ^ ceil(log2(high - low))
//! ```
//!
//! `quant_range` is derived from the IEEE-754 exponent rather than a
//! floating-point `log2`, so exact powers of two map to themselves and
//! spans just above a power of two always round up.

use crate::error::{Result, ScalerError};
use crate::range::{RangeEntry, Target};
use serde::{Deserialize, Serialize};

const FRACTION_BITS: u32 = 52;
const FRACTION_MASK: u64 = (1 << FRACTION_BITS) - 1;
const MAX_BIASED_EXPONENT: u64 = 0x7fe;

/// Smallest power of two greater than or equal to `span`.
///
/// Returns `None` when `span` is not finite and positive, or when the cover
/// would exceed `f64::MAX` (any span above `2^1023` that is not itself
/// `2^1023`).
///
/// # Example
/// ```
/// use bitscaler::scaling::quant_range;
///
/// assert_eq!(quant_range(100.0), Some(128.0));
/// assert_eq!(quant_range(64.0), Some(64.0));
/// assert_eq!(quant_range(0.3), Some(0.5));
/// assert_eq!(quant_range(0.0), None);
/// ```
pub fn quant_range(span: f64) -> Option<f64> {
    if !span.is_finite() || span <= 0.0 {
        return None;
    }

    let bits = span.to_bits();
    let biased_exponent = bits >> FRACTION_BITS;
    let fraction = bits & FRACTION_MASK;

    if biased_exponent == 0 {
        // Subnormal: span = fraction * 2^-1074, so the cover is the next
        // power of two of the fraction on the same scale. 2^52 lands on the
        // smallest normal, whose bit pattern is 1 << 52.
        return Some(f64::from_bits(fraction.next_power_of_two()));
    }
    if fraction == 0 {
        return Some(span);
    }
    if biased_exponent >= MAX_BIASED_EXPONENT {
        return None;
    }
    Some(f64::from_bits((biased_exponent + 1) << FRACTION_BITS))
}

/// Fitted affine transform of a single column.
///
/// Holds only the numbers the formula needs; evaluating it never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransform {
    low: f64,
    quant_range: f64,
    new_low: f64,
    new_high: f64,
}

impl ColumnTransform {
    /// Fit the transform of `column` from its observed range and the target.
    ///
    /// # Errors
    /// - [`ScalerError::InvalidRange`] for non-finite or inverted bounds, or a
    ///   span too wide to cover with a finite power of two
    /// - [`ScalerError::DegenerateRange`] when `low == high`
    pub fn fit(column: &str, range: RangeEntry, target: Target) -> Result<Self> {
        let invalid = || ScalerError::InvalidRange {
            column: column.to_string(),
            low: range.low,
            high: range.high,
        };

        if !range.is_valid() {
            return Err(invalid());
        }
        if range.is_degenerate() {
            return Err(ScalerError::DegenerateRange {
                column: column.to_string(),
                low: range.low,
            });
        }
        let quant_range = quant_range(range.span()).ok_or_else(invalid)?;

        Ok(Self {
            low: range.low,
            quant_range,
            new_low: target.new_low,
            new_high: target.new_high,
        })
    }

    /// Evaluate the transform at `x`.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        // Dividing by a power of two first is exact and cannot overflow.
        self.new_low + (x - self.low) / self.quant_range * (self.new_high - self.new_low)
    }

    /// Slope of the transform, `(new_high - new_low) / quant_range`.
    pub fn scale(&self) -> f64 {
        self.target().width() / self.quant_range
    }

    /// Lower bound of the fitted range; maps to `new_low`.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Power-of-two width the fitted range was rounded up to.
    pub fn quant_range(&self) -> f64 {
        self.quant_range
    }

    pub fn target(&self) -> Target {
        Target::new(self.new_low, self.new_high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn is_power_of_two(x: f64) -> bool {
        x > 0.0 && x.to_bits() & FRACTION_MASK == 0
    }

    #[test]
    fn test_quant_range_rounds_up() {
        assert_eq!(quant_range(100.0), Some(128.0));
        assert_eq!(quant_range(3.0), Some(4.0));
        assert_eq!(quant_range(1.5), Some(2.0));
        assert_eq!(quant_range(0.75), Some(1.0));
        assert_eq!(quant_range(0.1), Some(0.125));
    }

    #[test]
    fn test_quant_range_exact_powers() {
        for exp in -60..60 {
            let span = 2f64.powi(exp);
            assert_eq!(quant_range(span), Some(span), "2^{}", exp);
        }
    }

    #[test]
    fn test_quant_range_just_above_power() {
        let span = f64::from_bits(1024f64.to_bits() + 1);
        assert_eq!(quant_range(span), Some(2048.0));
    }

    #[test]
    fn test_quant_range_just_below_power() {
        let span = f64::from_bits(1024f64.to_bits() - 1);
        assert_eq!(quant_range(span), Some(1024.0));
    }

    #[test]
    fn test_quant_range_covers_span() {
        let spans = [1e-7, 0.3, 1.0, 7.0, 99.99, 1234.5, 6.02e23, 1e300];
        for &span in &spans {
            let q = quant_range(span).unwrap();
            assert!(q >= span, "{} < {}", q, span);
            assert!(q / 2.0 < span, "{} is not the smallest cover of {}", q, span);
            assert!(is_power_of_two(q));
        }
    }

    #[test]
    fn test_quant_range_subnormal() {
        let smallest = f64::from_bits(1);
        assert_eq!(quant_range(smallest), Some(smallest));

        let three_ulps = f64::from_bits(3);
        assert_eq!(quant_range(three_ulps), Some(f64::from_bits(4)));

        let largest_subnormal = f64::from_bits(FRACTION_MASK);
        assert_eq!(quant_range(largest_subnormal), Some(f64::MIN_POSITIVE));
    }

    #[test]
    fn test_quant_range_rejects_non_positive() {
        assert_eq!(quant_range(0.0), None);
        assert_eq!(quant_range(-1.0), None);
        assert_eq!(quant_range(f64::NAN), None);
        assert_eq!(quant_range(f64::INFINITY), None);
    }

    #[test]
    fn test_quant_range_overflow() {
        assert_eq!(quant_range(2f64.powi(1023)), Some(2f64.powi(1023)));
        assert_eq!(quant_range(f64::MAX), None);
    }

    #[test]
    fn test_column_transform_widest_range_stays_finite() {
        let top = 8e307;
        let t = ColumnTransform::fit("a", RangeEntry::new(0.0, top), Target::new(-2.0, 2.0))
            .unwrap();
        assert_eq!(t.quant_range(), 2f64.powi(1023));

        let out = t.apply(top);
        assert!(out.is_finite());
        assert_relative_eq!(out, -2.0 + top / 2f64.powi(1023) * 4.0, epsilon = 1e-12);
        assert!(out < 2.0);
        assert_eq!(t.apply(0.0), -2.0);
    }

    #[test]
    fn test_column_transform_accessors() {
        let t = ColumnTransform::fit("a", RangeEntry::new(-3.0, 9.0), Target::new(0.0, 4.0))
            .unwrap();
        assert_eq!(t.low(), -3.0);
        assert_eq!(t.quant_range(), 16.0);
        assert_eq!(t.target(), Target::new(0.0, 4.0));
        assert_eq!(t.scale(), 0.25);
    }

    #[test]
    fn test_column_transform_reference_values() {
        let t = ColumnTransform::fit("a", RangeEntry::new(0.0, 100.0), Target::default()).unwrap();
        assert_eq!(t.quant_range(), 128.0);
        assert_eq!(t.apply(0.0), -1.0);
        assert_relative_eq!(t.apply(100.0), 0.5625, epsilon = 1e-12);
        assert_eq!(t.apply(128.0), 1.0);
        assert_eq!(t.scale(), 2.0 / 128.0);
    }

    #[test]
    fn test_column_transform_low_maps_to_new_low() {
        let ranges = [(-3.5, 12.0), (0.001, 0.002), (1e6, 3e6), (-500.0, -499.0)];
        let targets = [(-1.0, 1.0), (0.0, 1.0), (10.0, 20.0), (1.0, -1.0)];
        for &(low, high) in &ranges {
            for &(new_low, new_high) in &targets {
                let t = ColumnTransform::fit(
                    "c",
                    RangeEntry::new(low, high),
                    Target::new(new_low, new_high),
                )
                .unwrap();
                assert_relative_eq!(t.apply(low), new_low, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_column_transform_monotonic() {
        let t = ColumnTransform::fit("c", RangeEntry::new(-7.0, 13.0), Target::new(0.0, 1.0))
            .unwrap();
        let xs: Vec<f64> = (0..=40).map(|i| -7.0 + i as f64 * 0.5).collect();
        for w in xs.windows(2) {
            assert!(t.apply(w[0]) < t.apply(w[1]));
        }

        let inverted =
            ColumnTransform::fit("c", RangeEntry::new(-7.0, 13.0), Target::new(1.0, 0.0)).unwrap();
        for w in xs.windows(2) {
            assert!(inverted.apply(w[0]) > inverted.apply(w[1]));
        }
    }

    #[test]
    fn test_column_transform_headroom() {
        // span 100 rounds up to 128, so the fitted maximum stays inside the target
        let t = ColumnTransform::fit("a", RangeEntry::new(0.0, 100.0), Target::default()).unwrap();
        assert!(t.apply(100.0) < 1.0);

        // span 64 is already a power of two and hits the edge exactly
        let exact = ColumnTransform::fit("a", RangeEntry::new(0.0, 64.0), Target::default()).unwrap();
        assert_eq!(exact.apply(64.0), 1.0);
    }

    #[test]
    fn test_column_transform_degenerate() {
        let result = ColumnTransform::fit("b", RangeEntry::new(5.0, 5.0), Target::default());
        assert!(matches!(
            result,
            Err(ScalerError::DegenerateRange { ref column, low }) if column == "b" && low == 5.0
        ));
    }

    #[test]
    fn test_column_transform_invalid_ranges() {
        let bad = [
            (1.0, 0.0),
            (f64::NAN, 1.0),
            (0.0, f64::INFINITY),
            (-f64::MAX, f64::MAX),
        ];
        for &(low, high) in &bad {
            let result = ColumnTransform::fit("x", RangeEntry::new(low, high), Target::default());
            assert!(
                matches!(result, Err(ScalerError::InvalidRange { .. })),
                "({}, {}) should be rejected",
                low,
                high
            );
        }
    }
}
