//! Probit model: log-likelihood, score, estimation, and inference.
//!
//! This module wires the probit evaluators to the `LogLikelihood` trait so
//! that the generic optimizer can maximize `ℓ(β)`, and exposes the usual
//! fit-then-infer workflow on a single stateful [`ProbitModel`].
//!
//! Key ideas:
//! - `value` returns `ℓ(β) = −NLL(β)` from the configured evaluator, with the
//!   configured saturation policy. Non-finite values are passed through and
//!   handled by the optimizer layer.
//! - `grad` returns the closed-form score of the configured objective
//!   (clamp-aware) when `GradientMode::Analytic` is selected; otherwise it
//!   reports `GradientNotImplemented` so the optimizer and the Hessian
//!   approximation fall back to finite differences.
//! - `is_identified` is `false` when `y` has no variation or when `β̂`
//!   strictly separates the sample. Either way the MLE does not exist, so
//!   `fit` reports non-convergence and `infer` flags the curvature as
//!   `HessianCondition::Unidentified`.
//! - `infer` evaluates curvature at the stored `β̂` and caches an
//!   [`InferenceReport`].
use crate::{
    inference::report::InferenceReport,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, OptimOutcome, Theta, maximize},
    },
    probit::{
        data::ProbitData,
        errors::{ProbitError, ProbitResult},
        loglik::{loglik_grad_with, neg_loglik, strictly_separates},
        options::{GradientMode, ProbitOptions},
    },
};
use ndarray::Array1;

/// Probit binary-choice model `P(y = 1 | x) = Φ(x·β)`.
///
/// Holds estimation options plus the results of the most recent
/// [`fit`](ProbitModel::fit) and [`infer`](ProbitModel::infer) calls.
///
/// # Notes
/// - Refitting clears any cached inference so the report always matches
///   `results.theta_hat`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbitModel {
    pub options: ProbitOptions,
    pub results: Option<OptimOutcome>,
    pub inference: Option<InferenceReport>,
}

impl Default for ProbitModel {
    fn default() -> Self {
        ProbitModel::new(ProbitOptions::default())
    }
}

impl ProbitModel {
    pub fn new(options: ProbitOptions) -> Self {
        ProbitModel { options, results: None, inference: None }
    }

    /// Fit the model by maximizing `ℓ(β)` from `theta0`.
    ///
    /// ## Steps
    /// 1. Validate `theta0` against `data` (length `k`, finite entries).
    /// 2. Run the solver selected in `options.mle_opts`.
    /// 3. Store the outcome in `self.results` and drop any stale report.
    ///
    /// ## Returns
    /// - `Ok(())` on success, including runs that hit the iteration cap,
    ///   abort in a line search, or stop on data without a finite MLE
    ///   (constant `y`, perfect separation); check `results.converged`.
    ///
    /// ## Errors
    /// - `ProbitError::ThetaLengthMismatch` / `ProbitError::NonFiniteTheta`
    ///   for an invalid starting point.
    /// - `ProbitError::OptimizationFailed` when the solver fails before a
    ///   single finite objective value was recorded.
    pub fn fit(&mut self, theta0: Array1<f64>, data: &ProbitData) -> ProbitResult<()> {
        let outcome = maximize(&*self, theta0, data, &self.options.mle_opts)?;
        self.results = Some(outcome);
        self.inference = None;
        Ok(())
    }

    /// [`fit`](ProbitModel::fit) starting from `β = 0`.
    pub fn fit_from_zero(&mut self, data: &ProbitData) -> ProbitResult<()> {
        self.fit(Array1::zeros(data.n_params()), data)
    }

    /// Compute and cache inference at the fitted estimate.
    ///
    /// ## Errors
    /// - `ProbitError::ModelNotFitted` if called before a successful `fit`.
    /// - `ProbitError::InferenceFailed` when `n ≤ k` or the score cannot be
    ///   evaluated. A singular Hessian is reported through the returned
    ///   report's `condition`, not as an error.
    pub fn infer(&mut self, data: &ProbitData) -> ProbitResult<&InferenceReport> {
        let theta_hat = &self.results.as_ref().ok_or(ProbitError::ModelNotFitted)?.theta_hat;
        let report = InferenceReport::compute(&*self, theta_hat, data, data.n_obs())?;
        Ok(&*self.inference.insert(report))
    }

    /// Negative log-likelihood at `beta` with the configured evaluator.
    pub fn neg_loglik(&self, beta: &Array1<f64>, data: &ProbitData) -> ProbitResult<f64> {
        data.check_theta(beta)?;
        Ok(neg_loglik(beta, &data.y, &data.x, self.options.evaluator, self.options.saturation))
    }
}

impl LogLikelihood for ProbitModel {
    type Data = ProbitData;

    /// `ℓ(β)`; may be non-finite under `Saturation::Propagate`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let nll =
            neg_loglik(theta, &data.y, &data.x, self.options.evaluator, self.options.saturation);
        Ok(-nll)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        data.check_theta(theta).map_err(OptError::from)
    }

    /// Closed-form score `Xᵀ s` under the configured saturation policy, or
    /// `GradientNotImplemented` in finite-difference mode.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        match self.options.gradient {
            GradientMode::Analytic => {
                Ok(loglik_grad_with(theta, &data.y, &data.x, self.options.saturation))
            }
            GradientMode::FiniteDifference => Err(OptError::GradientNotImplemented),
        }
    }

    fn is_identified(&self, theta: &Theta, data: &Self::Data) -> bool {
        data.has_outcome_variation() && !strictly_separates(theta, &data.y, &data.x)
    }
}
