//! Error type for curve construction and evaluation.

use thiserror::Error;

/// Result alias used throughout the curve model.
pub type Result<T> = std::result::Result<T, CurveError>;

/// Errors raised while building or evaluating S-N curves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A curve or catalog definition is malformed.
    #[error("invalid curve '{curve}': {reason}")]
    Configuration { curve: String, reason: String },

    /// A caller supplied value is out of range or not finite.
    #[error("invalid {field}: {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// No curve with the requested name exists in the catalog.
    #[error("curve not found: {0}")]
    UnknownCurve(String),

    /// A comparison number outside `1..=COMPARISONS.len()`.
    #[error("comparison must be between 1 and {max}, got {number}")]
    UnknownComparison { number: usize, max: usize },

    /// Two curves in one catalog share a name.
    #[error("duplicate curve name in catalog: {0}")]
    DuplicateCurve(String),
}

impl CurveError {
    pub(crate) fn configuration(curve: &str, reason: impl Into<String>) -> Self {
        CurveError::Configuration {
            curve: curve.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(CurveError::InvalidInput {
            field,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(CurveError::InvalidInput {
            field,
            value,
            reason: "must be greater than 0",
        });
    }
    Ok(value)
}
