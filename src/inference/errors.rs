//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the central error type used by the
//! Hessian conditioning, standard-error, and significance-testing code. It
//! groups domain failures (too few observations, mismatched dimensions,
//! invalid reference distributions) with wrapped optimizer errors. An alias `InferenceResult<T>` standardizes the return
//! type across inference code.
//!
//! A singular or ill-conditioned Hessian is **not** an error: it is reported
//! through `HessianCondition` with NaN standard errors.
use crate::optimization::errors::OptError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Unified error type for inference routines.
///
/// Optimizer failures convert in via `From<OptError>`; `Display` gives
/// readable diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Inputs ----
    /// Residual degrees of freedom `n − k` must be positive.
    InsufficientDegreesOfFreedom {
        n_obs: usize,
        k: usize,
    },

    /// Estimate length does not match the model.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Reference distribution ----
    /// Student-t construction failed.
    Distribution {
        text: String,
    },

    // ---- Optimizer layer ----
    /// Gradient or Hessian evaluation failed.
    Optimization(OptError),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ThetaLengthMismatch { expected, actual } => {
                InferenceError::DimensionMismatch { expected, found: actual }
            }
            other => InferenceError::Optimization(other),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            InferenceError::InsufficientDegreesOfFreedom { n_obs, k } => write!(
                f,
                "Inference Error: {} observations leave no residual degrees of freedom for {} parameters",
                n_obs, k
            ),
            InferenceError::DimensionMismatch { expected, found } => {
                write!(f, "Inference Error: expected {} parameters, found {}", expected, found)
            }

            // ---- Reference distribution ----
            InferenceError::Distribution { text } => {
                write!(f, "Inference Error: invalid Student-t distribution ({})", text)
            }

            // ---- Optimizer layer ----
            InferenceError::Optimization(err) => write!(f, "Inference Error: {}", err),
        }
    }
}
