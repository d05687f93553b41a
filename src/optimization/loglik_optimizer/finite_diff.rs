//! loglik_optimizer::finite_diff — finite-difference Hessians of a log-likelihood.
//!
//! Purpose
//! -------
//! Approximate the Hessian `∇²ℓ(θ)` of a [`LogLikelihood`] at a point, with
//! validation and symmetry cleanup, so that the inference layer can obtain
//! curvature without depending directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - [`loglik_hessian`]: differentiate the analytic gradient `∇ℓ` when the
//!   model provides one, otherwise take second differences of `ℓ` itself
//!   with a step of order `ε^{1/4}` (nesting two first-difference passes
//!   with `√ε` steps leaves nothing but rounding noise).
//! - [`compute_hessian`]: central-difference Hessian of a gradient
//!   function, falling back to forward differences when validation fails.
//! - [`symmetrize_hess`]: average each off-diagonal pair in-place.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter vectors, gradients, and Hessians are `ndarray` containers
//!   over `f64` (`Theta`, `Grad`, `Hessian`).
//! - Any error raised by the model while differencing is parked in a shared
//!   cell (the `finitediff` closures must return plain values) and surfaced
//!   after the pass; the first error wins.
//! - Returned Hessians satisfy [`validate_hessian`] and are symmetric.
//!
//! Conventions
//! -----------
//! - Hessians are of the **log-likelihood**, not the cost; callers that
//!   want observed information negate the result.
//! - Domain errors are surfaced as [`OptError`] via `OptResult<T>`.
//!
//! Downstream usage
//! ----------------
//! - `inference::hessian` calls [`loglik_hessian`] at the fitted `θ̂` and
//!   classifies the result before inverting it.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the analytic-gradient and value-only paths on a
//!   quadratic and a non-polynomial surface, error propagation from the
//!   model, the central→forward fallback failure path, and in-place
//!   symmetrization.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Theta, traits::LogLikelihood, types::Hessian, validation::validate_hessian,
    },
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// loglik_hessian — Hessian of `ℓ` at `theta`.
///
/// Parameters
/// ----------
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta`: evaluation point; its length fixes the `k × k` shape.
/// - `data`: model data passed through to `value` / `grad`.
///
/// Returns
/// -------
/// `OptResult<Hessian>`: a finite, symmetric `k × k` matrix.
///
/// Errors
/// ------
/// - Any `OptError` raised by `f.grad` (other than
///   `GradientNotImplemented`) or `f.value` while differencing.
/// - `OptError::InvalidHessian` when the approximation is non-finite (on
///   both the central and forward paths for the analytic-gradient route).
pub fn loglik_hessian<F: LogLikelihood>(
    f: &F, theta: &Theta, data: &F::Data,
) -> OptResult<Hessian> {
    let dim = theta.len();
    match f.grad(theta, data) {
        Ok(_) => {}
        Err(OptError::GradientNotImplemented) => return value_hessian(f, theta, data),
        Err(e) => return Err(e),
    }
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let grad_fn = |t: &Theta| -> Grad {
        match f.grad(t, data) {
            Ok(g) => g,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Grad::from_elem(dim, f64::NAN)
            }
        }
    };
    let hess = compute_hessian(&grad_fn, theta);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    hess
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Approximates the Jacobian of the gradient function `f` at `theta`,
/// preferring central differences and falling back to forward differences
/// when the central result fails [`validate_hessian`]. Only the
/// forward-difference validation error is surfaced.
///
/// # Errors
/// - `OptError::HessianDimMismatch` if the forward result has the wrong shape.
/// - `OptError::InvalidHessian` if the forward result has non-finite entries.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Second-difference Hessian of `ℓ` from values alone.
///
/// Steps are `h_i = ε^{1/4} · max(1, |θ_i|)`. Diagonal entries use
/// `(ℓ(θ + h_i e_i) − 2ℓ(θ) + ℓ(θ − h_i e_i)) / h_i²`, off-diagonal entries
/// the four-point stencil `(ℓ₊₊ − ℓ₊₋ − ℓ₋₊ + ℓ₋₋) / (4 h_i h_j)`.
fn value_hessian<F: LogLikelihood>(f: &F, theta: &Theta, data: &F::Data) -> OptResult<Hessian> {
    let dim = theta.len();
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let value_at = |t: &Theta| -> f64 {
        match f.value(t, data) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let shifted = |moves: &[(usize, f64)]| -> f64 {
        let mut t = theta.clone();
        for &(i, delta) in moves {
            t[i] += delta;
        }
        value_at(&t)
    };

    let step_base = f64::EPSILON.powf(0.25);
    let steps: Vec<f64> = theta.iter().map(|t| step_base * t.abs().max(1.0)).collect();
    let center = value_at(theta);
    let mut hess = Hessian::zeros((dim, dim));
    for i in 0..dim {
        let hi = steps[i];
        hess[[i, i]] = (shifted(&[(i, hi)]) - 2.0 * center + shifted(&[(i, -hi)])) / (hi * hi);
        for j in 0..i {
            let hj = steps[j];
            let cross = shifted(&[(i, hi), (j, hj)])
                - shifted(&[(i, hi), (j, -hj)])
                - shifted(&[(i, -hi), (j, hj)])
                + shifted(&[(i, -hi), (j, -hj)]);
            let hij = cross / (4.0 * hi * hj);
            hess[[i, j]] = hij;
            hess[[j, i]] = hij;
        }
    }
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_hessian(&hess, dim)?;
    Ok(hess)
}

/// Replace each off-diagonal pair `(i, j)` / `(j, i)` with its average.
///
/// Assumes a square matrix that already passed [`validate_hessian`].
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `loglik_hessian` through the analytic-gradient and value-only paths.
    // - Propagation of model errors raised while differencing.
    // - Validation failures for non-finite Hessians.
    // - In-place symmetrization.
    //
    // They intentionally DO NOT cover:
    // - Conditioning or inversion, which live in `inference::hessian`.
    // -------------------------------------------------------------------------

    // ℓ(θ) = -θ₀² - 3θ₁² + θ₀θ₁; ∇²ℓ = [[-2, 1], [1, -6]].
    struct Coupled {
        analytic: bool,
        fail_grad: bool,
    }

    impl LogLikelihood for Coupled {
        type Data = ();

        fn value(&self, t: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-t[0] * t[0] - 3.0 * t[1] * t[1] + t[0] * t[1])
        }

        fn check(&self, _t: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, t: &Theta, _data: &()) -> OptResult<Grad> {
            if self.fail_grad {
                return Err(OptError::ModelError { text: "grad failed".to_string() });
            }
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            Ok(array![-2.0 * t[0] + t[1], -6.0 * t[1] + t[0]])
        }
    }

    fn assert_close(h: &Hessian, expected: &Array2<f64>, tol: f64) {
        for ((i, j), &v) in h.indexed_iter() {
            assert!((v - expected[[i, j]]).abs() < tol, "h[{i},{j}] = {v}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Both derivative paths recover the exact Hessian of a quadratic.
    //
    // Given
    // -----
    // - The coupled quadratic at θ = [0.3, -1.2], with and without `grad`.
    //
    // Expect
    // ------
    // - Analytic path within 1e-6, value-only path within 1e-5 of
    //   [[-2, 1], [1, -6]].
    fn loglik_hessian_matches_quadratic_on_both_paths() {
        // Arrange
        let theta = array![0.3, -1.2];
        let expected = array![[-2.0, 1.0], [1.0, -6.0]];

        // Act
        let h_an = loglik_hessian(&Coupled { analytic: true, fail_grad: false }, &theta, &())
            .expect("analytic Hessian should succeed");
        let h_fd = loglik_hessian(&Coupled { analytic: false, fail_grad: false }, &theta, &())
            .expect("FD Hessian should succeed");

        // Assert
        assert_close(&h_an, &expected, 1e-6);
        assert_close(&h_fd, &expected, 1e-5);
        assert_eq!(h_fd[[0, 1]], h_fd[[1, 0]]);
    }

    // ℓ(θ) = -exp(θ₀) - θ₀²θ₁², value only.
    struct Curved;

    impl LogLikelihood for Curved {
        type Data = ();

        fn value(&self, t: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-t[0].exp() - t[0] * t[0] * t[1] * t[1])
        }

        fn check(&self, _t: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Without a gradient, curvature comes from second differences of ℓ
    // and is accurate well beyond what nested first differences give.
    //
    // Given
    // -----
    // - ℓ(θ) = -exp(θ₀) - θ₀²θ₁² at θ = [0.5, -1], whose Hessian is
    //   [[-e^0.5 - 2, 2], [2, -0.5]].
    //
    // Expect
    // ------
    // - Every entry within 1e-5 of the closed form.
    fn loglik_hessian_value_only_path_matches_closed_form() {
        // Arrange
        let theta = array![0.5, -1.0];
        let expected = array![[-(0.5_f64.exp()) - 2.0, 2.0], [2.0, -0.5]];

        // Act
        let h = loglik_hessian(&Curved, &theta, &()).expect("value-only Hessian should succeed");

        // Assert
        assert_close(&h, &expected, 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Model errors are surfaced unchanged.
    //
    // Given
    // -----
    // - A model whose `grad` always returns `ModelError`.
    //
    // Expect
    // ------
    // - `loglik_hessian` returns that same error.
    fn loglik_hessian_propagates_model_error() {
        // Arrange
        let f = Coupled { analytic: true, fail_grad: true };

        // Act
        let res = loglik_hessian(&f, &array![0.0, 0.0], &());

        // Assert
        assert_eq!(res, Err(OptError::ModelError { text: "grad failed".to_string() }));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `compute_hessian` surfaces a validation error when both the
    // central- and forward-difference Hessians contain non-finite entries.
    //
    // Given
    // -----
    // - A gradient function that returns `NaN` in its single component.
    //
    // Expect
    // ------
    // - `Err(OptError::InvalidHessian { .. })`.
    fn compute_hessian_non_finite_entries_yield_invalidhessian_error() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64]);
        let grad_fn = |_theta: &Theta| Array1::from(vec![f64::NAN]);

        // Act
        let result = compute_hessian(&grad_fn, &theta);

        // Assert
        match result {
            Err(OptError::InvalidHessian { .. }) => {}
            other => panic!("Expected InvalidHessian, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `symmetrize_hess` averages off-diagonal pairs and keeps the diagonal.
    //
    // Given
    // -----
    // - [[1, 2], [0, 3]].
    //
    // Expect
    // ------
    // - [[1, 1], [1, 3]].
    fn symmetrize_hess_makes_matrix_symmetric() {
        // Arrange
        let mut h: Hessian = array![[1.0, 2.0], [0.0, 3.0]];

        // Act
        symmetrize_hess(&mut h);

        // Assert
        assert_eq!(h, array![[1.0, 1.0], [1.0, 3.0]]);
    }
}
