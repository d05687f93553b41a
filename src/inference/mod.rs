//! inference — standard errors and significance tests for fitted models.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification on top of any fitted
//! [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood):
//! classical observed-information standard errors, t-statistics, and
//! Student-t p-values, with explicit flags for Hessians that cannot be
//! trusted.
//!
//! Key behaviors
//! -------------
//! - Define a unified error and result type, [`InferenceError`] and
//!   [`InferenceResult`], for inference-specific failures (degrees of
//!   freedom, dimensions, wrapped optimizer errors).
//! - Approximate the Hessian at `θ̂`, classify it ([`HessianCondition`]),
//!   and invert it when well conditioned ([`calc_curvature`]).
//! - Assemble estimates, standard errors, t-statistics, and p-values into an
//!   [`InferenceReport`] with a printable coefficient table.
//!
//! Invariants & assumptions
//! ------------------------
//! - Curvature is taken on the **summed** log-likelihood scale, so the
//!   inverse observed information is the covariance of `θ̂` directly.
//! - A flagged Hessian never errors and never panics; it yields NaN
//!   statistics plus a non-`WellConditioned` condition.
//! - Degrees of freedom are `n − k` and must be positive.
//!
//! Conventions
//! -----------
//! - All functions are pure with respect to I/O: no logging, no global
//!   state, and no `unsafe` code paths. Failures are reported via
//!   [`InferenceResult`] only.
//!
//! Downstream usage
//! ----------------
//! - `probit::ProbitModel::infer` calls [`InferenceReport::compute`] at the
//!   fitted estimate and caches the result.
//! - Other models can call [`InferenceReport::compute`] directly with their
//!   own `LogLikelihood` implementation.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`hessian`] cover matrix classification and inversion;
//!   tests in [`report`] cover t-statistics, p-values, and flagged cases.
pub mod errors;
pub mod hessian;
pub mod report;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{
    Curvature, HessianCondition, calc_curvature, classify_information, curvature_from_information,
};
pub use self::report::{InferenceReport, two_sided_p_values};

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::HessianCondition;
    pub use super::report::InferenceReport;
}
