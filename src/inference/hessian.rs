//! inference::hessian — conditioning checks, inversion, and standard errors.
//!
//! Purpose
//! -------
//! Turn the finite-difference Hessian of a log-likelihood at `θ̂` into the
//! observed information `J(θ̂) = −∇²ℓ(θ̂)`, decide whether it can be trusted,
//! and, if so, invert it into a covariance matrix and standard errors.
//!
//! Key behaviors
//! -------------
//! - Call [`loglik_hessian`] and negate it to obtain `J(θ̂)`.
//! - Ask the model whether `θ̂` stands for a finite maximizer
//!   ([`LogLikelihood::is_identified`]); if not, flag
//!   [`HessianCondition::Unidentified`] before looking at `J` at all.
//! - Copy `J` into a `nalgebra::DMatrix` (`fill_dmatrix`) and classify it
//!   with a symmetric eigendecomposition ([`classify_information`]):
//!   - any non-finite entry → [`HessianCondition::NonFinite`],
//!   - smallest eigenvalue `≤ EIGEN_EPS` → [`HessianCondition::NotPositiveDefinite`],
//!   - `λmin / λmax < RCOND_EPS` → [`HessianCondition::IllConditioned`],
//!   - otherwise [`HessianCondition::WellConditioned`].
//! - Invert a well-conditioned `J` through its Cholesky factor and take
//!   `se_i = sqrt((J⁻¹)_ii)`.
//! - A flagged `J` yields NaN for **every** standard error and no
//!   covariance; nothing panics and nothing errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `J` is square with dimension `k = θ̂.len()` and symmetrized upstream.
//! - `EIGEN_EPS` is an absolute floor: `J` is on the summed (not averaged)
//!   log-likelihood scale, so its eigenvalues grow with `n`.
//!
//! Downstream usage
//! ----------------
//! - `inference::report::InferenceReport::compute` calls [`calc_curvature`]
//!   and builds t-statistics and p-values from the returned standard errors.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the matrix copy, each classification branch, and
//!   standard errors against a closed-form inverse.
use crate::{
    inference::errors::InferenceResult,
    optimization::{
        errors::OptError,
        loglik_optimizer::{LogLikelihood, Theta, finite_diff::loglik_hessian},
        numerical_stability::{EIGEN_EPS, RCOND_EPS},
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Verdict on the observed information matrix at the estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HessianCondition {
    /// Positive definite and safely invertible.
    WellConditioned,
    /// NaN/±inf entries (typically from saturated probabilities).
    NonFinite,
    /// Smallest eigenvalue at or below `EIGEN_EPS`.
    NotPositiveDefinite { min_eigenvalue: f64 },
    /// Reciprocal condition number below `RCOND_EPS`.
    IllConditioned { rcond: f64 },
    /// The model reports that `ℓ` has no finite maximizer at this estimate,
    /// so any finite curvature there is an artifact of where the solver
    /// stopped.
    Unidentified,
}

impl HessianCondition {
    pub fn is_well_conditioned(&self) -> bool {
        matches!(self, HessianCondition::WellConditioned)
    }
}

impl std::fmt::Display for HessianCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HessianCondition::WellConditioned => write!(f, "well conditioned"),
            HessianCondition::NonFinite => write!(f, "non-finite Hessian entries"),
            HessianCondition::NotPositiveDefinite { min_eigenvalue } => {
                write!(f, "not positive definite (min eigenvalue {min_eigenvalue:.3e})")
            }
            HessianCondition::IllConditioned { rcond } => {
                write!(f, "ill-conditioned (reciprocal condition {rcond:.3e})")
            }
            HessianCondition::Unidentified => {
                write!(f, "not identified (the likelihood has no finite maximizer)")
            }
        }
    }
}

/// Curvature summary at `θ̂`.
///
/// - `obs_info`: `J(θ̂)`; filled with NaN when the Hessian itself could not
///   be formed.
/// - `condition`: verdict from [`classify_information`].
/// - `covariance`: `J⁻¹` when well conditioned.
/// - `std_errors`: `sqrt(diag J⁻¹)`, or all NaN when flagged.
#[derive(Debug, Clone, PartialEq)]
pub struct Curvature {
    pub obs_info: Array2<f64>,
    pub condition: HessianCondition,
    pub covariance: Option<Array2<f64>>,
    pub std_errors: Array1<f64>,
}

/// calc_curvature — observed information, condition flag, and SEs at `θ̂`.
///
/// Parameters
/// ----------
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta_hat`: estimate at which curvature is evaluated.
/// - `data`: model data.
///
/// Returns
/// -------
/// `InferenceResult<Curvature>`; non-finite Hessians are folded into
/// `HessianCondition::NonFinite` rather than returned as errors. When
/// [`LogLikelihood::is_identified`] is `false` at `theta_hat` the result is
/// flagged `HessianCondition::Unidentified` whatever the matrix looks like.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` if `f.check` rejects the length
///   of `theta_hat`.
/// - `InferenceError::Optimization` for any other model failure.
pub fn calc_curvature<F: LogLikelihood>(
    f: &F, theta_hat: &Theta, data: &F::Data,
) -> InferenceResult<Curvature> {
    f.check(theta_hat, data)?;
    let k = theta_hat.len();
    let obs_info = match loglik_hessian(f, theta_hat, data) {
        Ok(h) => -h,
        Err(OptError::InvalidHessian { .. }) | Err(OptError::HessianDimMismatch { .. }) => {
            Array2::from_elem((k, k), f64::NAN)
        }
        Err(e) => return Err(e.into()),
    };
    if !f.is_identified(theta_hat, data) {
        return Ok(flagged(obs_info, HessianCondition::Unidentified));
    }
    Ok(curvature_from_information(obs_info))
}

/// Classify and, when possible, invert an observed information matrix.
pub fn curvature_from_information(obs_info: Array2<f64>) -> Curvature {
    let k = obs_info.nrows();
    let mut obs_info_nalg = DMatrix::<f64>::zeros(k, k);
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    let condition = classify_information(&obs_info_nalg);
    if !condition.is_well_conditioned() {
        return flagged(obs_info, condition);
    }
    match obs_info_nalg.clone().cholesky() {
        Some(chol) => {
            let inv = chol.inverse();
            let covariance = Array2::from_shape_fn((k, k), |(i, j)| inv[(i, j)]);
            let std_errors = covariance.diag().mapv(f64::sqrt);
            Curvature { obs_info, condition, covariance: Some(covariance), std_errors }
        }
        None => {
            let min_eigenvalue =
                obs_info_nalg.symmetric_eigenvalues().iter().copied().fold(f64::INFINITY, f64::min);
            flagged(obs_info, HessianCondition::NotPositiveDefinite { min_eigenvalue })
        }
    }
}

/// classify_information — decide whether `J` can be inverted safely.
///
/// Checks, in order: finiteness of entries, finiteness and positivity of
/// eigenvalues (`λmin > EIGEN_EPS`), then `λmin / λmax ≥ RCOND_EPS`.
pub fn classify_information(obs_info: &DMatrix<f64>) -> HessianCondition {
    if obs_info.iter().any(|v| !v.is_finite()) {
        return HessianCondition::NonFinite;
    }
    let eigenvals = obs_info.clone().symmetric_eigen().eigenvalues;
    if eigenvals.iter().any(|v| !v.is_finite()) {
        return HessianCondition::NonFinite;
    }
    let min_eigenvalue = eigenvals.iter().copied().fold(f64::INFINITY, f64::min);
    let max_eigenvalue = eigenvals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min_eigenvalue <= EIGEN_EPS {
        return HessianCondition::NotPositiveDefinite { min_eigenvalue };
    }
    let rcond = min_eigenvalue / max_eigenvalue;
    if rcond < RCOND_EPS {
        return HessianCondition::IllConditioned { rcond };
    }
    HessianCondition::WellConditioned
}

// ---- Helper methods ----

fn flagged(obs_info: Array2<f64>, condition: HessianCondition) -> Curvature {
    let k = obs_info.nrows();
    Curvature { obs_info, condition, covariance: None, std_errors: Array1::from_elem(k, f64::NAN) }
}

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`, writing
/// column by column to match `nalgebra`'s storage order.
fn fill_dmatrix(obs_info: &Array2<f64>, obs_info_nalg: &mut DMatrix<f64>) {
    let n = obs_info.ncols();
    for j in 0..n {
        for i in 0..n {
            obs_info_nalg[(i, j)] = obs_info[[i, j]];
        }
    }
}
