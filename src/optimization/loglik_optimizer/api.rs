//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects a solver from `opts.method` (Nelder–Mead, BFGS, or L-BFGS,
//! the latter two with either Hager–Zhang or More–Thuente line search),
//! wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`), and
//! delegates the run to the matching runner.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Cost, OptimOutcome, Theta,
        adapter::{ArgMinAdapter, BestPoint},
        builders::{
            build_bfgs_hager_zhang, build_bfgs_more_thuente, build_nelder_mead,
            build_optimizer_hager_zhang, build_optimizer_more_thuente, first_step_length,
        },
        run::{run_bfgs, run_lbfgs, run_nelder_mead},
        traits::{LineSearcher, LogLikelihood, MLEOptions, Method},
    },
};
use argmin::core::Gradient;

/// Maximize a log-likelihood `ℓ(θ)` with the configured solver.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -ℓ(θ)` to `argmin`. For Nelder–Mead the adapter maps
///   non-finite values to `+∞`; for gradient methods it maps them to
///   `adapter::WALL_COST` so a line search backtracks out of them.
/// - For BFGS / L-BFGS, evaluates `∇c(θ0)` once to size the line search's
///   first trial step (`builders::first_step_length`).
/// - Builds the solver selected by `opts.method` / `opts.line_searcher` and
///   calls the matching runner, which configures the executor (initial
///   params, max iters, optional observers) and returns an `OptimOutcome`.
/// - If a gradient run aborts after it started (a line search or gradient
///   evaluation failing on a numerically hostile point), the best finite
///   point evaluated is returned through `OptimOutcome::aborted`.
/// - Finally asks `f.is_identified` at `θ̂`; a `false` answer downgrades the
///   outcome to `converged == false`.
///
/// Reaching the iteration cap, aborting, or stopping at a point the model
/// reports as unidentified is not an error; it is reported through
/// `OptimOutcome::converged == false`.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates errors evaluating `∇c(θ0)` and builder errors from `build_*`.
/// - Propagates runtime errors from the runners when no finite point was
///   recorded.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use probit_mle::optimization::errors::{OptError, OptResult};
/// use probit_mle::optimization::loglik_optimizer::{
///     LineSearcher, LogLikelihood, MLEOptions, Method, Tolerances, maximize,
/// };
///
/// struct MyLL;
/// impl LogLikelihood for MyLL {
///     type Data = ();
///     fn value(&self, theta: &ndarray::Array1<f64>, _: &()) -> OptResult<f64> {
///         // Simple concave log-likelihood: -(θ·θ)
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &ndarray::Array1<f64>, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let tols = Tolerances::new(Some(1e-6), None, Some(200))?;
/// let opts = MLEOptions::new(tols, Method::Bfgs, LineSearcher::HagerZhang, None)?;
/// let out = maximize(&MyLL, array![0.1, -0.2, 0.3], &(), &opts)?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let best = BestPoint::default();
    let mut outcome = match (opts.method, opts.line_searcher) {
        (Method::NelderMead, _) => {
            let problem = ArgMinAdapter::penalizing(f, data);
            let solver = build_nelder_mead(&theta0, opts)?;
            run_nelder_mead(&theta0, opts, problem, solver)?
        }
        (Method::Bfgs, LineSearcher::MoreThuente) => {
            let (problem, step) = gradient_problem(f, data, &theta0, &best)?;
            let solver = build_bfgs_more_thuente(opts, step)?;
            recover(run_bfgs(theta0, opts, problem, solver), &best)?
        }
        (Method::Bfgs, LineSearcher::HagerZhang) => {
            let (problem, step) = gradient_problem(f, data, &theta0, &best)?;
            let solver = build_bfgs_hager_zhang(opts, step)?;
            recover(run_bfgs(theta0, opts, problem, solver), &best)?
        }
        (Method::Lbfgs, LineSearcher::MoreThuente) => {
            let (problem, step) = gradient_problem(f, data, &theta0, &best)?;
            let solver = build_optimizer_more_thuente(opts, step)?;
            recover(run_lbfgs(theta0, opts, problem, solver), &best)?
        }
        (Method::Lbfgs, LineSearcher::HagerZhang) => {
            let (problem, step) = gradient_problem(f, data, &theta0, &best)?;
            let solver = build_optimizer_hager_zhang(opts, step)?;
            recover(run_lbfgs(theta0, opts, problem, solver), &best)?
        }
    };
    if !f.is_identified(&outcome.theta_hat, data) {
        outcome.mark_unconverged("likelihood has no finite maximizer at theta_hat");
    }
    Ok(outcome)
}

/// Walled adapter plus the first line-search step, from `∇c(θ0)`.
fn gradient_problem<'a, F: LogLikelihood>(
    f: &'a F, data: &'a F::Data, theta0: &Theta, best: &'a BestPoint,
) -> OptResult<(ArgMinAdapter<'a, F>, Cost)> {
    let problem = ArgMinAdapter::walled(f, data, best);
    let step = first_step_length(&problem.gradient(theta0)?);
    Ok((problem, step))
}

/// Fall back to the best finite point when a gradient run aborts.
fn recover(run: OptResult<OptimOutcome>, best: &BestPoint) -> OptResult<OptimOutcome> {
    match run {
        Ok(outcome) => Ok(outcome),
        Err(err) => match best.take() {
            Some((theta, cost)) => OptimOutcome::aborted(theta, -cost, &err),
            None => Err(err),
        },
    }
}
