//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their model.
//! - [`MLEOptions`], [`Tolerances`], and [`SimplexOptions`]: configuration
//!   for the optimizer.
//! - [`Method`]: choice of solver family (simplex or quasi-Newton).
//! - [`LineSearcher`]: choice of line search used by BFGS / L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        types::{DEFAULT_SIMPLEX_STEP, DEFAULT_TOL_SD},
        validation::{
            validate_theta_hat, validate_value, verify_simplex_step, verify_tol_cost,
            verify_tol_grad, verify_tol_sd,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
///   - Errors: return a descriptive `OptError` for invalid inputs or model failures.
///   - A non-finite `Ok` value is allowed; the optimizer decides whether to
///     reject the step or fail.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, robust finite differences are used automatically.
/// - `is_identified(&Theta, &Data) -> bool`: whether a point where the
///   solver stopped can stand for a finite maximizer. Models whose
///   likelihood keeps increasing along a ray (for example under perfect
///   separation) return `false`; `maximize` then reports non-convergence
///   and inference flags the curvature. Defaults to `true`.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
    fn is_identified(&self, _theta: &Theta, _data: &Self::Data) -> bool {
        true
    }
}

/// Solver family used by [`maximize`](crate::optimization::loglik_optimizer::maximize).
///
/// Variants:
/// - `NelderMead`: derivative-free simplex search. Robust to non-smooth or
///   occasionally non-finite objectives, slower to converge.
/// - `Bfgs`: quasi-Newton with a dense inverse-Hessian approximation.
/// - `Lbfgs`: limited-memory quasi-Newton.
///
/// Parsing:
/// `FromStr` accepts case-insensitive names: `"nelder-mead"`, `"neldermead"`,
/// `"nm"`, `"bfgs"`, `"l-bfgs"`, `"lbfgs"`. Unknown names return
/// `OptError::InvalidMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    NelderMead,
    Bfgs,
    Lbfgs,
}

impl Method {
    /// Whether the solver consumes gradients.
    pub fn uses_gradient(&self) -> bool {
        !matches!(self, Method::NelderMead)
    }
}

impl FromStr for Method {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nelder-mead" | "neldermead" | "nm" => Ok(Method::NelderMead),
            "bfgs" => Ok(Method::Bfgs),
            "l-bfgs" | "lbfgs" => Ok(Method::Lbfgs),
            _ => Err(OptError::InvalidMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Nelder-Mead', 'BFGS' or 'L-BFGS'.",
            }),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::NelderMead => write!(f, "Nelder-Mead"),
            Method::Bfgs => write!(f, "BFGS"),
            Method::Lbfgs => write!(f, "L-BFGS"),
        }
    }
}

/// Choice of line search used inside the BFGS / L-BFGS solvers.
///
/// Variants:
/// - `MoreThuente`: More–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search choice from a string (case-insensitive).
    ///
    /// Any other value returns `OptError::InvalidLineSearch` with a helpful message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Settings specific to the Nelder–Mead solver.
///
/// - `initial_step`: edge length `h` of the starting simplex; vertices are
///   `θ0` and `θ0 + h·e_j` for every coordinate `j`.
/// - `tol_sd`: stop once the standard deviation of the vertex costs drops
///   below this value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexOptions {
    pub initial_step: f64,
    pub tol_sd: f64,
}

impl SimplexOptions {
    /// Construct validated simplex settings.
    ///
    /// # Errors
    /// - [`OptError::InvalidSimplexStep`] for a non-finite or non-positive step.
    /// - [`OptError::InvalidTolSd`] for a non-finite or non-positive tolerance.
    pub fn new(initial_step: f64, tol_sd: f64) -> OptResult<Self> {
        verify_simplex_step(initial_step)?;
        verify_tol_sd(tol_sd)?;
        Ok(Self { initial_step, tol_sd })
    }
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self { initial_step: DEFAULT_SIMPLEX_STEP, tol_sd: DEFAULT_TOL_SD }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `method: Method` — solver family.
/// - `line_searcher: LineSearcher` — line-search algorithm used by BFGS / L-BFGS.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history; `None` uses the default of 7.
/// - `simplex: SimplexOptions` — Nelder–Mead settings.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `method`: `NelderMead`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None`
/// - `simplex`: `SimplexOptions::default()`
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub method: Method,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
    pub simplex: SimplexOptions,
}

impl MLEOptions {
    /// Create a new set of optimizer options with default simplex settings
    /// and verbosity off.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, method: Method, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self {
            tols,
            method,
            line_searcher,
            verbose: false,
            lbfgs_mem,
            simplex: SimplexOptions::default(),
        })
    }

    /// Replace the Nelder–Mead settings.
    pub fn with_simplex(mut self, simplex: SimplexOptions) -> Self {
        self.simplex = simplex;
        self
    }

    /// Toggle progress output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            method: Method::NelderMead,
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
            simplex: SimplexOptions::default(),
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]). The gradient and cost tolerances only apply to
/// the quasi-Newton methods; Nelder–Mead uses [`SimplexOptions::tol_sd`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` only if the solver met its own convergence
///   criterion (`SolverConverged` or `TargetCostReached`). The iteration
///   cap, interrupts, timeouts, `SolverExit` (e.g. a failed line search),
///   and aborted runs all yield `false`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - Keys follow argmin’s counters, e.g., cost_count, gradient_count, etc.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad_norm: Option<f64>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached,
            ) => (true, format!("{termination:?}")),
            TerminationStatus::Terminated(_) => (false, format!("{termination:?}")),
        };
        let iterations = iterations as usize;
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }

    /// Outcome for a run the backend abandoned with a numerical error.
    ///
    /// `theta_hat` / `value` are the best finite point the objective was
    /// evaluated at. The backend state is gone, so `iterations` is 0 and no
    /// counters or gradient norm are available.
    ///
    /// # Errors
    /// Same validation as [`OptimOutcome::new`].
    pub fn aborted(theta_hat: Theta, value: f64, reason: &OptError) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(Some(theta_hat))?;
        validate_value(value)?;
        Ok(Self {
            theta_hat,
            value,
            converged: false,
            status: format!("Aborted({reason})"),
            iterations: 0,
            fn_evals: FnEvalMap::new(),
            grad_norm: None,
        })
    }

    /// Mark the outcome as not converged, appending `note` to the status.
    pub fn mark_unconverged(&mut self, note: &str) {
        self.converged = false;
        self.status = format!("{}; {note}", self.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parsing of method and line-search names.
    // - Validation in `Tolerances::new`, `SimplexOptions::new`, and
    //   `MLEOptions::new`.
    // - Mapping of termination statuses onto the `converged` flag, including
    //   early exits and aborted runs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Method names parse case-insensitively, with aliases; garbage is rejected.
    //
    // Given
    // -----
    // - A set of accepted spellings and one unknown name.
    //
    // Expect
    // ------
    // - Each spelling maps to the right variant; the unknown name yields
    //   `OptError::InvalidMethod` carrying the original text.
    fn method_from_str_accepts_aliases_and_rejects_unknown() {
        assert_eq!("Nelder-Mead".parse::<Method>(), Ok(Method::NelderMead));
        assert_eq!("NM".parse::<Method>(), Ok(Method::NelderMead));
        assert_eq!("BFGS".parse::<Method>(), Ok(Method::Bfgs));
        assert_eq!("l-bfgs".parse::<Method>(), Ok(Method::Lbfgs));
        match "powell".parse::<Method>() {
            Err(OptError::InvalidMethod { name, .. }) => assert_eq!(name, "powell"),
            other => panic!("Expected InvalidMethod, got {other:?}"),
        }
        assert!(!Method::NelderMead.uses_gradient());
        assert!(Method::Bfgs.uses_gradient());
    }

    #[test]
    // Purpose
    // -------
    // Line-search names parse case-insensitively.
    //
    // Given
    // -----
    // - "HAGERZHANG", "morethuente", and "backtracking".
    //
    // Expect
    // ------
    // - First two succeed, the last returns `InvalidLineSearch`.
    fn line_searcher_from_str_is_case_insensitive() {
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Option constructors enforce their documented rules.
    //
    // Given
    // -----
    // - All-`None` tolerances, a zero iteration cap, zero L-BFGS memory,
    //   and a non-positive simplex step.
    //
    // Expect
    // ------
    // - Each returns its dedicated error variant.
    fn option_constructors_validate_inputs() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
        let tols = Tolerances::new(Some(1e-6), None, Some(100)).expect("valid tolerances");
        assert!(matches!(
            MLEOptions::new(tols, Method::Lbfgs, LineSearcher::MoreThuente, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
        assert!(matches!(SimplexOptions::new(0.0, 1e-8), Err(OptError::InvalidSimplexStep { .. })));
        assert!(matches!(SimplexOptions::new(0.1, 0.0), Err(OptError::InvalidTolSd { .. })));

        let opts = MLEOptions::new(tols, Method::Bfgs, LineSearcher::HagerZhang, None)
            .expect("valid options")
            .with_simplex(SimplexOptions::new(0.5, 1e-10).expect("valid simplex"))
            .with_verbose(true);
        assert_eq!(opts.simplex.initial_step, 0.5);
        assert!(opts.verbose);
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is reported as non-convergence, while a
    // solver-declared convergence sets the flag.
    //
    // Given
    // -----
    // - Identical raw state with `MaxItersReached` and `SolverConverged`.
    //
    // Expect
    // ------
    // - `converged == false` and `true` respectively; both build successfully.
    fn optim_outcome_maps_termination_to_converged_flag() {
        let capped = OptimOutcome::new(
            Some(array![0.1, 0.2]),
            -10.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            50,
            FnEvalMap::new(),
            None,
        )
        .expect("outcome should build");
        let done = OptimOutcome::new(
            Some(array![0.1, 0.2]),
            -10.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(1e-7),
        )
        .expect("outcome should build");

        assert!(!capped.converged);
        assert!(done.converged);
        assert_eq!(done.iterations, 12);
        assert_eq!(done.grad_norm, Some(1e-7));
    }

    #[test]
    // Purpose
    // -------
    // Early exits are never reported as convergence.
    //
    // Given
    // -----
    // - A `SolverExit` carrying a line-search failure, `Interrupt`, and
    //   `TargetCostReached`.
    // - An aborted run built from a best point and an error.
    // - A converged outcome marked unconverged afterwards.
    //
    // Expect
    // ------
    // - `converged == false` for the exit, interrupt, aborted, and marked
    //   outcomes, with the reason kept in `status`; `true` for the target.
    fn optim_outcome_reports_early_exits_as_unconverged() {
        let build = |reason| {
            OptimOutcome::new(
                Some(array![0.0, 0.0]),
                -5.0,
                TerminationStatus::Terminated(reason),
                1,
                FnEvalMap::new(),
                None,
            )
            .expect("outcome should build")
        };
        let exit = build(TerminationReason::SolverExit(
            "Line search terminated with: 'Non-finite cost value: NaN'".to_string(),
        ));
        let interrupted = build(TerminationReason::Interrupt);
        let target = build(TerminationReason::TargetCostReached);
        let aborted =
            OptimOutcome::aborted(array![0.5], -3.0, &OptError::NonFiniteCost { value: f64::NAN })
                .expect("aborted outcome should build");
        let mut marked = build(TerminationReason::SolverConverged);
        marked.mark_unconverged("no finite maximizer");

        assert!(!exit.converged);
        assert!(exit.status.contains("Line search terminated"));
        assert!(!interrupted.converged);
        assert!(target.converged);
        assert!(!aborted.converged);
        assert_eq!(aborted.iterations, 0);
        assert!(aborted.status.contains("Non-finite cost value"));
        assert!(!marked.converged);
        assert!(marked.status.ends_with("no finite maximizer"));
    }

    #[test]
    // Purpose
    // -------
    // Outcome construction rejects non-finite best values.
    //
    // Given
    // -----
    // - A finite θ̂ but value = −∞.
    //
    // Expect
    // ------
    // - `OptError::NonFiniteCost`.
    fn optim_outcome_rejects_non_finite_value() {
        let res = OptimOutcome::new(
            Some(array![0.0]),
            f64::NEG_INFINITY,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );
        assert!(matches!(res, Err(OptError::NonFiniteCost { .. })));
    }
}
