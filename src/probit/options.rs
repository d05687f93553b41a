//! Probit options — configuration for estimation.
//!
//! Purpose
//! -------
//! Bundle the knobs that decide *how* a probit model is estimated: which
//! evaluator form computes the objective, what happens at saturation,
//! whether the solver sees the analytic score or finite differences, and the
//! optimizer settings themselves.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`ProbitOptions`] assumes its components were validated by their own
//!   builders (`MLEOptions::new`, `Tolerances::new`, `SimplexOptions::new`);
//!   it imposes no cross-field checks.
//!
//! Conventions
//! -----------
//! - Defaults reproduce the textbook setup: vectorized evaluator, no
//!   clamping, analytic score, Nelder–Mead with at most 300 iterations.
use crate::{
    optimization::loglik_optimizer::MLEOptions,
    probit::loglik::{Evaluator, Saturation},
};

/// Source of first derivatives handed to the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMode {
    /// Closed-form score `Xᵀ s`, consistent with the configured
    /// [`Saturation`] policy.
    #[default]
    Analytic,
    /// Let the optimizer difference the objective.
    FiniteDifference,
}

/// ProbitOptions — estimation-time configuration for probit models.
///
/// Fields
/// ------
/// - `evaluator`: [`Evaluator`] used for `ℓ(β)`.
/// - `saturation`: [`Saturation`] policy applied inside the evaluator.
/// - `gradient`: [`GradientMode`] exposed to the optimizer and to the
///   Hessian approximation.
/// - `mle_opts`: [`MLEOptions`] for the solver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbitOptions {
    pub evaluator: Evaluator,
    pub saturation: Saturation,
    pub gradient: GradientMode,
    pub mle_opts: MLEOptions,
}

impl ProbitOptions {
    /// Bundle already-validated components; stores its inputs as given.
    pub fn new(
        evaluator: Evaluator, saturation: Saturation, gradient: GradientMode,
        mle_opts: MLEOptions,
    ) -> Self {
        ProbitOptions { evaluator, saturation, gradient, mle_opts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{LineSearcher, Method, Tolerances};

    #[test]
    // Purpose
    // -------
    // `new` stores inputs verbatim and `default` matches the documented setup.
    //
    // Given
    // -----
    // - BFGS options with clamping and finite differences.
    //
    // Expect
    // ------
    // - Fields equal their inputs; the default uses the vectorized
    //   evaluator, `Propagate`, `Analytic`, and Nelder–Mead.
    fn new_preserves_inputs_and_default_is_documented() {
        // Arrange
        let tols = Tolerances::new(Some(1e-7), None, Some(50)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, Method::Bfgs, LineSearcher::HagerZhang, None)
            .expect("valid options");

        // Act
        let opts = ProbitOptions::new(
            Evaluator::Naive,
            Saturation::Clamp,
            GradientMode::FiniteDifference,
            mle.clone(),
        );
        let default = ProbitOptions::default();

        // Assert
        assert_eq!(opts.evaluator, Evaluator::Naive);
        assert_eq!(opts.saturation, Saturation::Clamp);
        assert_eq!(opts.gradient, GradientMode::FiniteDifference);
        assert_eq!(opts.mle_opts, mle);
        assert_eq!(default.evaluator, Evaluator::Vectorized);
        assert_eq!(default.saturation, Saturation::Propagate);
        assert_eq!(default.gradient, GradientMode::Analytic);
        assert_eq!(default.mle_opts.method, Method::NelderMead);
    }
}
