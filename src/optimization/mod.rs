//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used for model fitting: an Argmin-backed
//! log-likelihood optimizer with a choice of simplex and quasi-Newton
//! solvers, shared numerical primitives, and a single error/result surface.
//! Callers implement a log-likelihood, choose a method and tolerances, and
//! obtain fitted parameters and diagnostics without touching solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including method selection (Nelder–Mead, BFGS,
//!   L-BFGS), line-search choice, and stopping criteria.
//! - Supply shared numerical primitives (`numerical_stability`): the normal
//!   CDF/PDF, probability clamping, and Hessian conditioning tolerances.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ`; invalid
//!   states are reported as `OptError`, not panics.
//! - Failing to converge within the iteration budget is **not** an error;
//!   it is reported through `OptimOutcome::converged`.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Parameters, gradients, and Hessians are represented using `ndarray`
//!   aliases (`Theta`, `Grad`, `Hessian`).
//! - This module and its submodules avoid I/O; progress output is only
//!   produced behind the `obs_slog` feature when `MLEOptions::verbose` is set.
//!
//! Downstream usage
//! ----------------
//! - `probit::ProbitModel` implements `LogLikelihood` and calls `maximize`
//!   with a parameter guess, data payload, and `MLEOptions`.
//! - `inference` reuses `loglik_optimizer::finite_diff` for Hessians and the
//!   tolerances from `numerical_stability`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: solver wiring,
//!   tolerance handling, finite differences, error conversions, and basic
//!   MLE behavior on toy models.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use probit_mle::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
