//! Persistence of fitted scaler state.
//!
//! Only the fitted ranges and the target interval are stored; per-column
//! transforms are re-derived by fitting again on load. The payload is a
//! single bincode-encoded mapping from column name to `(low, high)`, with
//! the target stored as `(new_low, new_high)` under [`TARGET_KEY`].

use crate::error::{Result, ScalerError};
use crate::range::{RangeEntry, RangeMap, Target};
use bincode::Options;
use std::collections::BTreeMap;
use std::error::Error;

/// Key reserved in the persisted mapping for the target interval.
pub const TARGET_KEY: &str = "target";

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data, never derived
/// state that can be recomputed.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        // Same layout as `bincode::serialize`, but bytes left over after the
        // value mean the payload is corrupt.
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
            .deserialize(bytes)
    }
}

/// On-disk mapping: column name (or [`TARGET_KEY`]) to a bound pair.
pub(crate) type PersistedRanges = BTreeMap<String, (f64, f64)>;

/// Encode fitted ranges plus target into the persisted byte form.
pub(crate) fn encode(ranges: &RangeMap, target: Target) -> Result<Vec<u8>> {
    let mut payload: PersistedRanges = ranges
        .iter()
        .map(|(column, entry)| (column.clone(), (*entry).into()))
        .collect();
    if payload.insert(TARGET_KEY.to_string(), target.into()).is_some() {
        return Err(ScalerError::ReservedColumnName(TARGET_KEY.to_string()));
    }
    Ok(payload.to_bytes()?)
}

/// Decode the persisted byte form, splitting off the target entry.
///
/// # Errors
/// - [`ScalerError::Serialization`] if the bytes are not a valid payload
/// - [`ScalerError::MissingTarget`] if the target entry is absent
pub(crate) fn decode(bytes: &[u8]) -> Result<(RangeMap, Target)> {
    let mut payload = PersistedRanges::from_bytes(bytes)?;
    let target = payload
        .remove(TARGET_KEY)
        .map(Target::from)
        .ok_or(ScalerError::MissingTarget(TARGET_KEY))?;
    let ranges = payload
        .into_iter()
        .map(|(column, bounds)| (column, RangeEntry::from(bounds)))
        .collect();
    Ok((ranges, target))
}
