//! Column ranges and target intervals.
//!
//! A [`RangeMap`] records the observed `(low, high)` bounds of every column a
//! scaler covers. It is either discovered from a table by
//! [`BitScaler::auto_range`](crate::BitScaler::auto_range) or supplied by the
//! caller. The [`Target`] interval is shared by all columns of one scaler.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Observed bounds of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    /// Smallest observed value.
    pub low: f64,
    /// Largest observed value.
    pub high: f64,
}

impl RangeEntry {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Width of the range, `high - low`.
    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// True when both bounds are finite and `high >= low`.
    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.high >= self.low
    }

    /// True when the range has zero width.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }
}

impl From<(f64, f64)> for RangeEntry {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

impl From<RangeEntry> for (f64, f64) {
    fn from(entry: RangeEntry) -> Self {
        (entry.low, entry.high)
    }
}

/// Column name to [`RangeEntry`] mapping.
///
/// Keys are kept sorted so iteration order, log output and persisted bytes
/// do not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeMap(BTreeMap<String, RangeEntry>);

impl RangeMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or replace the range of `column`, returning the previous one.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        entry: impl Into<RangeEntry>,
    ) -> Option<RangeEntry> {
        self.0.insert(column.into(), entry.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, column: impl Into<String>, low: f64, high: f64) -> Self {
        self.insert(column, RangeEntry::new(low, high));
        self
    }

    pub fn get(&self, column: &str) -> Option<&RangeEntry> {
        self.0.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<RangeEntry> {
        self.0.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, RangeEntry> {
        self.0.iter()
    }
}

impl<K: Into<String>, E: Into<RangeEntry>> FromIterator<(K, E)> for RangeMap {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, e)| (k.into(), e.into())).collect())
    }
}

impl From<BTreeMap<String, RangeEntry>> for RangeMap {
    fn from(map: BTreeMap<String, RangeEntry>) -> Self {
        Self(map)
    }
}

impl IntoIterator for RangeMap {
    type Item = (String, RangeEntry);
    type IntoIter = btree_map::IntoIter<String, RangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RangeMap {
    type Item = (&'a String, &'a RangeEntry);
    type IntoIter = btree_map::Iter<'a, String, RangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Interval every fitted column is mapped into. Defaults to `(-1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub new_low: f64,
    pub new_high: f64,
}

impl Target {
    pub fn new(new_low: f64, new_high: f64) -> Self {
        Self { new_low, new_high }
    }

    /// Length of the interval, `new_high - new_low`.
    pub fn width(&self) -> f64 {
        self.new_high - self.new_low
    }

    pub fn is_finite(&self) -> bool {
        self.new_low.is_finite() && self.new_high.is_finite()
    }
}

impl Default for Target {
    fn default() -> Self {
        Self {
            new_low: -1.0,
            new_high: 1.0,
        }
    }
}

impl From<(f64, f64)> for Target {
    fn from((new_low, new_high): (f64, f64)) -> Self {
        Self { new_low, new_high }
    }
}

impl From<Target> for (f64, f64) {
    fn from(target: Target) -> Self {
        (target.new_low, target.new_high)
    }
}
