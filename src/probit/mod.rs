//! probit — binary-choice probit model estimated by maximum likelihood.
//!
//! Purpose
//! -------
//! Provide the probit model `P(y = 1 | x) = Φ(x·β)` end to end: a validated
//! data container, a synthetic generator with known ground truth, naive and
//! vectorized negative log-likelihood evaluators, the analytic score, and a
//! stateful model that plugs into the generic optimizer and inference
//! layers.
//!
//! Key behaviors
//! -------------
//! - [`ProbitData`] validates `(X, y)` once at the crate boundary.
//! - [`simulate`], [`simulate_seeded`], and [`simulate_entropy`] draw data
//!   from a [`SimulationSpec`] whose implied coefficients are known.
//! - [`neg_loglik_naive`] and [`neg_loglik_vectorized`] compute the same
//!   objective (row loop vs whole-array operations); [`loglik_grad`] and
//!   [`loglik_grad_with`] give the score in inverse-Mills form.
//! - [`ProbitModel`] implements `LogLikelihood`, runs `maximize` in
//!   [`ProbitModel::fit`], and caches an `InferenceReport` in
//!   [`ProbitModel::infer`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `len(β) == ncols(X)` and `len(y) == nrows(X)`; outcomes are exactly
//!   `0.0` or `1.0`.
//! - Under the default [`Saturation::Propagate`] a saturated `Φ(x·β)` makes
//!   the objective non-finite; [`Saturation::Clamp`] keeps it finite.
//!
//! Conventions
//! -----------
//! - Evaluators return the **negative** log-likelihood; the `LogLikelihood`
//!   implementation and `OptimOutcome::value` use `ℓ = −NLL`.
//! - Errors are reported as [`ProbitError`] via [`ProbitResult`].
//!
//! Downstream usage
//! ----------------
//! - Typical flow: `simulate_seeded` → `ProbitModel::fit_from_zero` →
//!   `ProbitModel::infer` → print the report.
//! - The `probit-demo` binary and the Python bindings follow exactly this
//!   flow.
pub mod data;
pub mod errors;
pub mod loglik;
pub mod model;
pub mod options;
pub mod simulate;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::ProbitData;
pub use self::errors::{ProbitError, ProbitResult};
pub use self::loglik::{
    Evaluator, Saturation, loglik_grad, loglik_grad_with, neg_loglik, neg_loglik_naive,
    neg_loglik_naive_with, neg_loglik_vectorized, neg_loglik_vectorized_with, strictly_separates,
};
pub use self::model::ProbitModel;
pub use self::options::{GradientMode, ProbitOptions};
pub use self::simulate::{
    Simulated, SimulationSpec, simulate, simulate_entropy, simulate_seeded,
};

pub mod prelude {
    pub use super::data::ProbitData;
    pub use super::errors::{ProbitError, ProbitResult};
    pub use super::loglik::{Evaluator, Saturation};
    pub use super::model::ProbitModel;
    pub use super::options::{GradientMode, ProbitOptions};
    pub use super::simulate::{SimulationSpec, simulate_seeded};
}
