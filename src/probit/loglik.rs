//! Probit negative log-likelihood evaluators and the analytic score.
//!
//! Purpose
//! -------
//! Evaluate `NLL(β) = −Σ_i [ y_i·ln Φ(x_i·β) + (1 − y_i)·ln(1 − Φ(x_i·β)) ]`
//! in two interchangeable forms, and the gradient of the log-likelihood
//! `∇ℓ(β)` used by gradient-based solvers and the Hessian approximation.
//!
//! Key behaviors
//! -------------
//! - [`neg_loglik_naive`]: one pass over observations with an explicit inner
//!   product per row and the weighted two-term formula.
//! - [`neg_loglik_vectorized`]: one matrix–vector product `Xβ`, elementwise
//!   `Φ` and `1 − Φ`, an arithmetic 0/1 mask `m·Φ + (1 − m)·(1 − Φ)` in place
//!   of branching, elementwise `ln`, one batched sum.
//! - [`loglik_grad`]: `∇ℓ(β) = Xᵀ s` with per-observation scores
//!   `s_i = λ(z_i)` when `y_i = 1` and `s_i = −λ(−z_i)` when `y_i = 0`,
//!   where `λ` is the inverse Mills ratio. This equals
//!   `φ(z)(y − Φ)/(Φ(1 − Φ))` but stays finite when `Φ` saturates.
//! - [`loglik_grad_with`]: the score of the objective under a saturation
//!   policy. Under [`Saturation::Clamp`] an observation whose `Φ` sits on a
//!   clamp bound contributes a constant to `ℓ`, so its score is zero.
//! - [`strictly_separates`]: whether `β` puts every observation on its own
//!   side of the hyperplane `x·β = 0`, in which case `ℓ` keeps increasing
//!   along `β` and has no finite maximizer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both evaluators agree within 1e-9 relative error whenever no `Φ(x_i·β)`
//!   saturates to exactly 0 or 1.
//! - Under [`Saturation::Propagate`] nothing is guarded: `ln(0)` shows up as
//!   `+∞` in the NLL, and the naive form yields `NaN` when a zero weight
//!   meets `ln(0)`. [`Saturation::Clamp`] clamps `Φ` into
//!   `[PROB_EPS, 1 − PROB_EPS]` in both forms.
//! - Inputs are assumed validated by `ProbitData`; the functions here never
//!   allocate errors.
//!
//! Downstream usage
//! ----------------
//! - `probit::model::ProbitModel` dispatches on [`Evaluator`] and
//!   [`Saturation`] through [`neg_loglik`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover naive/vectorized agreement, determinism, saturation
//!   under both policies, the analytic score against finite differences
//!   (clamped and unclamped), and the separation check.
use crate::optimization::numerical_stability::{
    PROB_EPS, clamp_probability, inverse_mills_ratio, std_normal_cdf,
};
use crate::probit::errors::ProbitError;
use ndarray::{Array1, Array2, Zip};
use std::str::FromStr;

/// Which evaluator form computes the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Evaluator {
    Naive,
    #[default]
    Vectorized,
}

impl FromStr for Evaluator {
    type Err = ProbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" => Ok(Evaluator::Naive),
            "vectorized" | "vectorised" => Ok(Evaluator::Vectorized),
            _ => Err(ProbitError::InvalidEvaluator { name: s.to_string() }),
        }
    }
}

/// What to do when `Φ(x_i·β)` reaches exactly 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Saturation {
    /// Let `ln(0)` through.
    #[default]
    Propagate,
    /// Clamp `Φ` into `[PROB_EPS, 1 − PROB_EPS]`.
    Clamp,
}

impl Saturation {
    #[inline]
    fn apply(self, p: f64) -> f64 {
        match self {
            Saturation::Propagate => p,
            Saturation::Clamp => clamp_probability(p),
        }
    }
}

/// Unguarded naive negative log-likelihood.
pub fn neg_loglik_naive(beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>) -> f64 {
    neg_loglik_naive_with(beta, y, x, Saturation::Propagate)
}

/// Unguarded vectorized negative log-likelihood.
pub fn neg_loglik_vectorized(beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>) -> f64 {
    neg_loglik_vectorized_with(beta, y, x, Saturation::Propagate)
}

/// Naive form under an explicit saturation policy.
pub fn neg_loglik_naive_with(
    beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>, saturation: Saturation,
) -> f64 {
    let mut total = 0.0;
    for (row, &yi) in x.outer_iter().zip(y.iter()) {
        let mut z = 0.0;
        for (xij, bj) in row.iter().zip(beta.iter()) {
            z += xij * bj;
        }
        let p = saturation.apply(std_normal_cdf(z));
        total += yi * p.ln() + (1.0 - yi) * (1.0 - p).ln();
    }
    -total
}

/// Vectorized form under an explicit saturation policy.
pub fn neg_loglik_vectorized_with(
    beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>, saturation: Saturation,
) -> f64 {
    let z = x.dot(beta);
    let p = z.mapv(|v| saturation.apply(std_normal_cdf(v)));
    let q = p.mapv(|v| 1.0 - v);
    let selected = y * &p + &((1.0 - y) * &q);
    -selected.mapv(f64::ln).sum()
}

/// Dispatch to the chosen evaluator.
pub fn neg_loglik(
    beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>, evaluator: Evaluator,
    saturation: Saturation,
) -> f64 {
    match evaluator {
        Evaluator::Naive => neg_loglik_naive_with(beta, y, x, saturation),
        Evaluator::Vectorized => neg_loglik_vectorized_with(beta, y, x, saturation),
    }
}

/// Gradient of the log-likelihood `∇ℓ(β)` (not of the NLL).
pub fn loglik_grad(beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>) -> Array1<f64> {
    loglik_grad_with(beta, y, x, Saturation::Propagate)
}

/// `∇ℓ(β)` of the objective evaluated under `saturation`.
///
/// With [`Saturation::Clamp`], rows where `Φ(x_i·β)` lies outside
/// `[PROB_EPS, 1 − PROB_EPS]` get a zero score, matching the flat clamped
/// objective there.
pub fn loglik_grad_with(
    beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>, saturation: Saturation,
) -> Array1<f64> {
    let z = x.dot(beta);
    let scores = Zip::from(&z).and(y).map_collect(|&zi, &yi| {
        if saturation == Saturation::Clamp && clamp_binds(zi) {
            return 0.0;
        }
        if yi == 1.0 { inverse_mills_ratio(zi) } else { -inverse_mills_ratio(-zi) }
    });
    x.t().dot(&scores)
}

/// `true` when every row is strictly on the side of `x·β = 0` its outcome
/// points to (`x_i·β > 0` for `y_i = 1`, `< 0` for `y_i = 0`).
pub fn strictly_separates(beta: &Array1<f64>, y: &Array1<f64>, x: &Array2<f64>) -> bool {
    let z = x.dot(beta);
    Zip::from(&z).and(y).all(|&zi, &yi| if yi == 1.0 { zi > 0.0 } else { zi < 0.0 })
}

#[inline]
fn clamp_binds(z: f64) -> bool {
    let p = std_normal_cdf(z);
    p < PROB_EPS || p > 1.0 - PROB_EPS
}
