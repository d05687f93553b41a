//! loglik_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the solvers used by the
//! log-likelihood optimizer. These helpers hide Argmin’s generic wiring
//! and apply crate-level options (tolerances, memory size, simplex shape)
//! so that higher-level code can request a configured solver without
//! touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS and BFGS solvers with either Hager–Zhang or
//!   More–Thuente line search based on crate-level aliases, with the line
//!   search's first trial step taken from [`first_step_length`].
//! - Apply optional gradient and cost-change tolerances from
//!   [`MLEOptions`] via shared configuration helpers.
//! - Construct a Nelder–Mead solver whose initial simplex is `θ0` plus one
//!   vertex per coordinate, offset by `opts.simplex.initial_step`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical optimizer numeric types
//!   [`Theta`], [`Grad`], and [`Cost`].
//! - The L-BFGS memory (`m`) is either provided via `opts.lbfgs_mem` or
//!   defaults to [`DEFAULT_LBFGS_MEM`].
//! - Any invalid tolerance passed into Argmin’s `with_tolerance_*` or
//!   `with_sd_tolerance` is surfaced as an [`OptError`] via the crate’s
//!   `From<Error>` implementation.
//!
//! Conventions
//! -----------
//! - The quasi-Newton builders do **not** set an initial parameter vector
//!   or `max_iters`; these are applied by the runners. The simplex builder
//!   is the exception, since Nelder–Mead encodes its start in the simplex.
//!
//! Downstream usage
//! ----------------
//! - `api::maximize` picks a builder from `opts.method` and
//!   `opts.line_searcher` and passes the solver to the matching runner.
//!
//! Testing notes
//! -------------
//! - Unit tests verify builder success for default/explicit settings and
//!   the geometry of the initial simplex.
use argmin::{
    core::LineSearch,
    solver::quasinewton::{BFGS, LBFGS},
};

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            BfgsHagerZhang, BfgsMoreThuente, Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS,
            LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Simplex, Theta,
        },
    },
};

/// Build an [`LbfgsHagerZhang`] solver with tolerances and memory from `opts`.
///
/// `initial_step` is the first trial step of every line search (see
/// [`first_step_length`]).
///
/// # Errors
/// `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
/// tolerance or the step length.
pub fn build_optimizer_hager_zhang(
    opts: &MLEOptions, initial_step: Cost,
) -> OptResult<LbfgsHagerZhang> {
    let mut hager_zhang = HagerZhangLS::new();
    hager_zhang.initial_step_length(initial_step)?;
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Build an [`LbfgsMoreThuente`] solver with tolerances and memory from `opts`.
///
/// # Errors
/// `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
/// tolerance or the step length.
pub fn build_optimizer_more_thuente(
    opts: &MLEOptions, initial_step: Cost,
) -> OptResult<LbfgsMoreThuente> {
    let mut more_thuente = MoreThuenteLS::new();
    more_thuente.initial_step_length(initial_step)?;
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Build a [`BfgsHagerZhang`] solver with tolerances from `opts`.
///
/// The inverse-Hessian approximation is seeded by the runner (identity).
pub fn build_bfgs_hager_zhang(opts: &MLEOptions, initial_step: Cost) -> OptResult<BfgsHagerZhang> {
    let mut hager_zhang = HagerZhangLS::new();
    hager_zhang.initial_step_length(initial_step)?;
    configure_bfgs(BFGS::new(hager_zhang), opts)
}

/// Build a [`BfgsMoreThuente`] solver with tolerances from `opts`.
pub fn build_bfgs_more_thuente(
    opts: &MLEOptions, initial_step: Cost,
) -> OptResult<BfgsMoreThuente> {
    let mut more_thuente = MoreThuenteLS::new();
    more_thuente.initial_step_length(initial_step)?;
    configure_bfgs(BFGS::new(more_thuente), opts)
}

/// first_step_length — trial step for the quasi-Newton line searches.
///
/// The first search direction is the raw gradient `∇c(θ0)`. On summed
/// log-likelihoods its norm grows with the sample size, and a unit step
/// along it can push every linear index into the saturated tail. The trial
/// step is therefore `1 / ||∇c(θ0)||` whenever that norm exceeds one, so the
/// first move has unit length; otherwise it is `1`.
pub fn first_step_length(grad0: &Grad) -> Cost {
    let norm = grad0.dot(grad0).sqrt();
    if norm.is_finite() && norm > 1.0 { 1.0 / norm } else { 1.0 }
}

/// build_nelder_mead — construct a Nelder–Mead solver around `theta0`.
///
/// Parameters
/// ----------
/// - `theta0`: `&Theta`
///   Starting point; becomes the first vertex of the simplex.
/// - `opts`: `&MLEOptions`
///   Consults `opts.simplex.initial_step` (edge length `h`) and
///   `opts.simplex.tol_sd` (stopping tolerance on vertex-cost spread).
///
/// Returns
/// -------
/// `OptResult<Simplex>` with `k + 1` vertices
/// `{θ0, θ0 + h·e_1, …, θ0 + h·e_k}`.
///
/// Errors
/// ------
/// - `OptError::ThetaLengthMismatch` if `theta0` is empty.
/// - `OptError` (via `From<argmin::core::Error>`) if Argmin rejects
///   `tol_sd`.
pub fn build_nelder_mead(theta0: &Theta, opts: &MLEOptions) -> OptResult<Simplex> {
    let vertices = initial_simplex(theta0, opts.simplex.initial_step)?;
    let solver = Simplex::new(vertices).with_sd_tolerance(opts.simplex.tol_sd)?;
    Ok(solver)
}

/// Vertices of the axis-aligned starting simplex.
///
/// # Errors
/// `OptError::ThetaLengthMismatch` for an empty `theta0`.
pub fn initial_simplex(theta0: &Theta, step: f64) -> OptResult<Vec<Theta>> {
    let k = theta0.len();
    if k == 0 {
        return Err(OptError::ThetaLengthMismatch { expected: 1, actual: 0 });
    }
    let mut vertices = Vec::with_capacity(k + 1);
    vertices.push(theta0.clone());
    for j in 0..k {
        let mut v = theta0.clone();
        v[j] += step;
        vertices.push(v);
    }
    Ok(vertices)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// Generic over the line-search type `L`. When a tolerance is `None`, the
/// corresponding `with_tolerance_*` call is skipped and Argmin’s default
/// remains in effect.
///
/// # Errors
/// `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
/// tolerance.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// configure_bfgs — BFGS counterpart of [`configure_lbfgs`].
pub fn configure_bfgs<L>(mut solver: BFGS<L, Cost>, opts: &MLEOptions) -> OptResult<BFGS<L, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
