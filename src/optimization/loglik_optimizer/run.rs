//! Execution helpers that run an `argmin` solver on a log-likelihood problem and
//! return a crate-friendly [`OptimOutcome`].
//!
//! One runner per solver family, since each family carries a different
//! `IterState` shape:
//! - [`run_lbfgs`]: `IterState<Theta, Grad, (), (), (), f64>`
//! - [`run_bfgs`]: `IterState<Theta, Grad, (), Hessian, (), f64>`, seeded with
//!   an identity inverse Hessian.
//! - [`run_nelder_mead`]: `IterState<Theta, (), (), (), (), f64>`; the start
//!   point lives in the solver's simplex.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
        types::Hessian,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
use argmin_math::ArgminL2Norm;

/// Run an L-BFGS optimization for a log-likelihood problem.
///
/// Wires up:
/// - the user model via [`ArgMinAdapter`],
/// - the chosen solver (L-BFGS with Hager–Zhang/More–Thuente),
/// - initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///
/// then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and a one-time pre-iteration
/// line logs ℓ(θ₀) and, if available, ||grad|| before the first iteration.
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, solver errors,
///   line-search failures, etc.) via the crate’s `From<argmin::core::Error>`
///   conversion.
/// - Propagates any validation errors encountered when constructing
///   [`OptimOutcome`].
///
/// # Examples
/// ```ignore
/// let problem = ArgMinAdapter::new(&model, &data);
/// let solver  = build_optimizer_hager_zhang(&opts)?;
/// let out     = run_lbfgs(theta0.clone(), &opts, problem, solver)?;
/// println!("done in {} iters, status: {}", out.iterations, out.status);
/// ```
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem, true)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let grad_norm = result.take_gradient().map(|g| g.l2_norm());
    outcome_from_state(result, grad_norm)
}

/// Run a BFGS optimization for a log-likelihood problem.
///
/// Same wiring as [`run_lbfgs`], plus the inverse-Hessian approximation is
/// initialized to the `k × k` identity.
///
/// # Errors
/// As for [`run_lbfgs`].
pub fn run_bfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), Hessian, (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem, true)?;
    }
    let inv_hessian = Hessian::eye(theta0.len());
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0).inv_hessian(inv_hessian));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let grad_norm = result.take_gradient().map(|g| g.l2_norm());
    outcome_from_state(result, grad_norm)
}

/// Run a Nelder–Mead optimization for a log-likelihood problem.
///
/// `theta0` is only used for the optional initial log line; the solver
/// already carries its simplex. No gradient is ever computed, so
/// `grad_norm` is always `None`.
///
/// # Errors
/// As for [`run_lbfgs`].
pub fn run_nelder_mead<'a, F, S>(
    theta0: &Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, (), (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(theta0, &problem, false)?;
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = theta0;
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let result = optimizer.run()?.state().clone();
    outcome_from_state(result, None)
}

// ---- Helper Methods ----

fn outcome_from_state<G, H>(
    mut state: IterState<Theta, G, (), H, (), f64>, grad_norm: Option<f64>,
) -> OptResult<OptimOutcome> {
    let iterations = state.get_iter();
    let function_counts = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let value = -state.get_best_cost();
    OptimOutcome::new(
        state.take_best_param(),
        value,
        termination,
        iterations,
        function_counts,
        grad_norm,
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>, with_grad: bool,
) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n =
        if with_grad { problem.gradient(theta0).ok().map(|g| g.l2_norm()) } else { None };

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
