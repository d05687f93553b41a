//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
//!
//! Non-finite log-likelihood values are handled by a [`NonFinitePolicy`]:
//! the simplex solver sees a cost of `+∞`, so the offending vertex is never
//! preferred, while line searches see a large finite [`WALL_COST`] they can
//! backtrack from. An optional [`BestPoint`] records the lowest finite cost
//! evaluated so a run that still aborts can report where it got to.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Cost reported for a non-finite `ℓ(θ)` under [`NonFinitePolicy::Wall`].
///
/// Finite, so More–Thuente interpolation stays finite, and far above any
/// negative log-likelihood a line search would otherwise accept.
pub const WALL_COST: Cost = 1e100;

/// What the adapter reports when `ℓ(θ)` is not finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinitePolicy {
    /// Raise `OptError::NonFiniteCost`.
    Error,
    /// Return a cost of `+∞`.
    Infinity,
    /// Return [`WALL_COST`].
    Wall,
}

/// Lowest finite cost seen by an adapter, with the point it was seen at.
#[derive(Debug, Default)]
pub struct BestPoint {
    inner: RefCell<Option<(Theta, Cost)>>,
}

impl BestPoint {
    fn offer(&self, theta: &Theta, cost: Cost) {
        let mut slot = self.inner.borrow_mut();
        let improves = match slot.as_ref() {
            Some((_, best)) => cost < *best,
            None => true,
        };
        if improves {
            *slot = Some((theta.clone(), cost));
        }
    }

    /// Remove and return the recorded `(θ, cost)`, if any.
    pub fn take(&self) -> Option<(Theta, Cost)> {
        self.inner.borrow_mut().take()
    }
}

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood).
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
/// - `non_finite` selects what happens when `ℓ(θ)` is not finite.
/// - `best`, when set, is offered every finite cost evaluated.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub non_finite: NonFinitePolicy,
    pub best: Option<&'a BestPoint>,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// - Calls the user's `value(θ, data)` and checks the result is finite.
    /// - A non-finite value is mapped through `non_finite`.
    /// - A finite cost is offered to `best`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user’s `value` via `?`.
    /// - `NonFiniteCost` under [`NonFinitePolicy::Error`].
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return match self.non_finite {
                NonFinitePolicy::Error => Err((OptError::NonFiniteCost { value: output }).into()),
                NonFinitePolicy::Infinity => Ok(f64::INFINITY),
                NonFinitePolicy::Wall => Ok(WALL_COST),
            };
        }
        if let Some(best) = self.best {
            best.offer(theta, -output);
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(θ, data)`, we validate it and return `-grad`
    ///   (because the cost is `-ℓ`).
    /// - Otherwise, we compute a finite-difference gradient of the **cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), retry with *forward* differences.
    ///   - Validate the FD gradient; if it fails (e.g., non-finite), retry once
    ///     with *forward* differences and validate again.
    ///
    /// The FD closure must return `f64`, so the first error raised inside it is
    /// parked in `closure_err` and the closure returns `NaN`.
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() {
                    return run_fd_diff(theta, &cost_func, &closure_err);
                }
                match validate_grad(&fd_grad, dim) {
                    Ok(()) => Ok(fd_grad),
                    Err(_) => run_fd_diff(theta, &cost_func, &closure_err),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct an adapter that rejects non-finite log-likelihood values.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, non_finite: NonFinitePolicy::Error, best: None }
    }

    /// Construct an adapter that maps non-finite log-likelihood values to a
    /// cost of `+∞` (used by derivative-free solvers).
    pub fn penalizing(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, non_finite: NonFinitePolicy::Infinity, best: None }
    }

    /// Construct an adapter for line-search solvers: non-finite values cost
    /// [`WALL_COST`] and every finite evaluation is offered to `best`.
    pub fn walled(f: &'a F, data: &'a F::Data, best: &'a BestPoint) -> Self {
        Self { f, data, non_finite: NonFinitePolicy::Wall, best: Some(best) }
    }
}

/// Compute a forward-difference gradient of `func` at `theta`, with error capture.
///
/// - clears `closure_err`,
/// - performs `forward_diff`,
/// - if an error was captured, returns it as `Err`,
/// - otherwise validates and returns the gradient.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD routine
/// or by validation of the resulting gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}
