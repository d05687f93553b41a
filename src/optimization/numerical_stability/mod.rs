//! numerical_stability — guarded scalar transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the small numerical primitives used by the probit evaluators and
//! the inference layer, so that the tolerances deciding "saturated",
//! "singular", and "ill-conditioned" live in one place.
//!
//! Key behaviors
//! -------------
//! - Evaluate the standard normal CDF and density (`std_normal_cdf`,
//!   `std_normal_pdf`) with full precision in the lower tail.
//! - Clamp probabilities away from exact 0 and 1 (`clamp_probability`) for
//!   callers that opt into guarded log-likelihoods.
//! - Centralize tolerances (`PROB_EPS`, `EIGEN_EPS`, `RCOND_EPS`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All helpers are pure `f64 → f64` functions; none of them allocate.
//! - NaN inputs are propagated, never masked.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state.
//!
//! Downstream usage
//! ----------------
//! - `probit::loglik` evaluates `Φ` and `φ` through these helpers.
//! - `inference::hessian` uses `EIGEN_EPS` and `RCOND_EPS` to classify the
//!   Hessian before inverting it.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover reference values, tail
//!   saturation, and clamping behavior.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, PROB_EPS, RCOND_EPS, clamp_probability, inverse_mills_ratio, std_normal_cdf,
    std_normal_pdf,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use probit_mle::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, PROB_EPS, RCOND_EPS, clamp_probability, inverse_mills_ratio, std_normal_cdf,
        std_normal_pdf,
    };
}
