//! Error types for scaler operations.
//!
//! Every failure is reported through [`ScalerError`]. Callers that only
//! care about the broad class of a failure (lifecycle misuse, bad input,
//! persistence) can match on [`ScalerError::kind`].

use thiserror::Error;

/// Broad classification of a [`ScalerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation called in the wrong lifecycle state.
    State,
    /// Ranges, targets or tables that cannot be scaled.
    Input,
    /// Reading or writing persisted scaler state failed.
    Io,
}

/// Error type for scaler operations.
#[derive(Error, Debug)]
pub enum ScalerError {
    /// `fit` was called on a scaler that is already fitted.
    #[error("scaler already fitted")]
    AlreadyFitted,

    /// `apply` or `save` was called before `fit`.
    #[error("scaler not fitted")]
    NotFitted,

    /// `fit` had neither an explicit range map nor one from `auto_range`.
    #[error("no range information: provide a range map or call auto_range first")]
    NoRangeInformation,

    /// Column whose observed range has zero width.
    #[error("degenerate range for column '{column}': low == high == {low}")]
    DegenerateRange { column: String, low: f64 },

    /// Column range that is non-finite, inverted or too wide to cover.
    #[error("invalid range for column '{column}': ({low}, {high})")]
    InvalidRange { column: String, low: f64, high: f64 },

    /// Target interval with a non-finite bound.
    #[error("invalid target interval: ({new_low}, {new_high})")]
    InvalidTarget { new_low: f64, new_high: f64 },

    /// A referenced column does not exist in the table.
    #[error("column '{0}' not found in table")]
    MissingColumn(String),

    /// A column that the scaler was not fitted on.
    #[error("column '{0}' is not covered by the fit")]
    UnfittedColumn(String),

    /// Column name that collides with the key reserved for the target.
    #[error("column name '{0}' is reserved")]
    ReservedColumnName(String),

    /// Table construction with inconsistent column lengths or names.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// I/O error during file operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persisted payload lacks the reserved target entry.
    #[error("persisted scaler has no '{0}' entry")]
    MissingTarget(&'static str),
}

impl ScalerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScalerError::AlreadyFitted | ScalerError::NotFitted => ErrorKind::State,
            ScalerError::NoRangeInformation
            | ScalerError::DegenerateRange { .. }
            | ScalerError::InvalidRange { .. }
            | ScalerError::InvalidTarget { .. }
            | ScalerError::MissingColumn(_)
            | ScalerError::UnfittedColumn(_)
            | ScalerError::ReservedColumnName(_)
            | ScalerError::ShapeMismatch(_) => ErrorKind::Input,
            ScalerError::Io(_) | ScalerError::Serialization(_) | ScalerError::MissingTarget(_) => {
                ErrorKind::Io
            }
        }
    }
}

impl From<bincode::Error> for ScalerError {
    fn from(err: bincode::Error) -> Self {
        ScalerError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ScalerError {
    fn from(err: serde_json::Error) -> Self {
        ScalerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScalerError>;
