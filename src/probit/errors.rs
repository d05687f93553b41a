//! Errors for the probit model (data validation, simulation settings,
//! parameter checks, and fit/inference failures).
//!
//! This module defines [`ProbitError`], used across the Rust core and the
//! optional Python surface. It implements `Display`/`Error`, converts into
//! the optimizer's `OptError` (see `optimization::errors`), and converts to
//! a Python `ValueError` behind the `python-bindings` feature.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Outcomes must be exactly `0.0` or `1.0`.
//! - Optimizer/backend errors are normalized to
//!   [`ProbitError::OptimizationFailed`] with a human-readable message.
use crate::{inference::errors::InferenceError, optimization::errors::OptError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for probit operations that may produce [`ProbitError`].
pub type ProbitResult<T> = Result<T, ProbitError>;

/// Unified error type for the probit model.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbitError {
    // ---- Input/data validation ----
    /// No observations.
    EmptyData,

    /// Design matrix has no columns.
    NoRegressors,

    /// Rows of X and length of y disagree.
    LengthMismatch { x_rows: usize, y_len: usize },

    /// A regressor is NaN/±inf.
    NonFiniteRegressor { row: usize, col: usize, value: f64 },

    /// An outcome is not 0 or 1.
    InvalidOutcome { index: usize, value: f64 },

    // ---- Parameters ----
    /// β has the wrong number of coefficients.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// A coefficient is NaN/±inf.
    NonFiniteTheta { index: usize, value: f64 },

    // ---- Simulation settings ----
    /// Sample size must be > 0.
    InvalidSampleSize { n: usize },

    /// Noise scale must be finite and > 0.
    InvalidNoiseScale { sigma: f64 },

    /// A coefficient, cutoff, or mixing entry is NaN/±inf.
    NonFiniteSpec { field: &'static str, value: f64 },

    // ---- Options ----
    /// Unknown evaluator name.
    InvalidEvaluator { name: String },

    // ---- Estimation ----
    /// Inference requested before a successful fit.
    ModelNotFitted,

    /// Optimizer/backend failure.
    OptimizationFailed { text: String },

    /// Post-estimation failure.
    InferenceFailed { text: String },
}

impl std::error::Error for ProbitError {}

impl std::fmt::Display for ProbitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            ProbitError::EmptyData => write!(f, "Data contains no observations"),
            ProbitError::NoRegressors => write!(f, "Design matrix has no columns"),
            ProbitError::LengthMismatch { x_rows, y_len } => {
                write!(f, "Length mismatch: X has {x_rows} rows but y has {y_len} entries")
            }
            ProbitError::NonFiniteRegressor { row, col, value } => {
                write!(f, "Non-finite regressor at ({row}, {col}): {value}")
            }
            ProbitError::InvalidOutcome { index, value } => {
                write!(f, "Invalid outcome at index {index}: {value}, must be 0 or 1")
            }

            // ---- Parameters ----
            ProbitError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Coefficient length mismatch: expected {expected}, actual {actual}")
            }
            ProbitError::NonFiniteTheta { index, value } => {
                write!(f, "Non-finite coefficient at index {index}: {value}")
            }

            // ---- Simulation settings ----
            ProbitError::InvalidSampleSize { n } => {
                write!(f, "Invalid sample size {n}: must be greater than zero")
            }
            ProbitError::InvalidNoiseScale { sigma } => {
                write!(f, "Invalid noise scale {sigma}: must be finite and positive")
            }
            ProbitError::NonFiniteSpec { field, value } => {
                write!(f, "Non-finite simulation setting '{field}': {value}")
            }

            // ---- Options ----
            ProbitError::InvalidEvaluator { name } => {
                write!(
                    f,
                    "Invalid evaluator '{name}': valid options are case insensitive 'naive' or 'vectorized'"
                )
            }

            // ---- Estimation ----
            ProbitError::ModelNotFitted => write!(f, "Model has not been fitted"),
            ProbitError::OptimizationFailed { text } => write!(f, "Optimization failed: {text}"),
            ProbitError::InferenceFailed { text } => write!(f, "Inference failed: {text}"),
        }
    }
}

/// Convert a [`ProbitError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ProbitError> for PyErr {
    fn from(err: ProbitError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<OptError> for ProbitError {
    fn from(err: OptError) -> ProbitError {
        match err {
            OptError::ThetaLengthMismatch { expected, actual } => {
                ProbitError::ThetaLengthMismatch { expected, actual }
            }
            OptError::InvalidThetaInput { index, value } => {
                ProbitError::NonFiniteTheta { index, value }
            }
            other => ProbitError::OptimizationFailed { text: other.to_string() },
        }
    }
}

impl From<InferenceError> for ProbitError {
    fn from(err: InferenceError) -> ProbitError {
        ProbitError::InferenceFailed { text: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Parameter errors survive a trip through the optimizer error surface.
    //
    // Given
    // -----
    // - `ThetaLengthMismatch` and `NonFiniteTheta` converted to `OptError`
    //   and back.
    //
    // Expect
    // ------
    // - The original variants; other optimizer errors become
    //   `OptimizationFailed` with the optimizer's message.
    fn parameter_errors_round_trip_through_opt_error() {
        let len = ProbitError::ThetaLengthMismatch { expected: 3, actual: 2 };
        let nan = ProbitError::NonFiniteTheta { index: 1, value: f64::INFINITY };

        assert_eq!(ProbitError::from(OptError::from(len.clone())), len);
        assert_eq!(ProbitError::from(OptError::from(nan.clone())), nan);

        let other = ProbitError::from(OptError::NoTolerancesProvided);
        assert_eq!(
            other,
            ProbitError::OptimizationFailed { text: "No tolerances provided".to_string() }
        );
    }
}
