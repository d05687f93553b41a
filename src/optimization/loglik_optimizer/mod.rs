//! loglik_optimizer — MLE-friendly, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run Nelder–Mead, BFGS, or
//! L-BFGS with configurable tolerances and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Expose a single, user-facing entrypoint [`maximize`] that:
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - selects a solver via [`builders`] based on [`Method`] and
//!     [`traits::LineSearcher`],
//!   - executes it via the matching runner in [`run`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide finite-difference Hessians in [`finite_diff`] for the
//!   inference layer.
//! - Centralize optimizer configuration ([`Tolerances`], [`MLEOptions`],
//!   [`SimplexOptions`]) and validation logic ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** a log-likelihood `ℓ(θ)` by minimizing
//!   a cost `c(θ) = -ℓ(θ)`; user code implements `ℓ(θ)` and `∇ℓ(θ)`
//!   (when available), **never** the cost directly.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] must treat invalid
//!   inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Configuration types are validated on construction and treated as
//!   internally consistent by the solver layer.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`] (`Array1<f64>`).
//! - All user-facing diagnostics (including [`OptimOutcome::value`]) are
//!   expressed in terms of the log-likelihood `ℓ`.
//! - Errors bubble up as `OptResult<T>`; this module and its children never
//!   intentionally panic or use `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - `probit::ProbitModel` implements [`LogLikelihood`] and calls
//!   [`maximize`]; `inference` calls [`finite_diff::loglik_hessian`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions and non-finite policies
//!   in [`adapter`], solver construction in [`builders`], end-to-end solves
//!   for every method in [`api`], Hessian approximation in [`finite_diff`],
//!   and configuration invariants in [`traits`] and [`validation`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, Method, OptimOutcome, SimplexOptions, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use probit_mle::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        LineSearcher, LogLikelihood, MLEOptions, Method, OptimOutcome, SimplexOptions, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
