//! Numerical stability utilities.
//!
//! Provides the scalar building blocks shared by the probit evaluators and
//! the inference layer: the standard normal CDF/PDF, probability clamping
//! for saturated predictions, and the small tolerances used when judging
//! whether a Hessian can be inverted.
//!
//! # Provided items
//! - [`PROB_EPS`]: distance kept from 0 and 1 when probabilities are clamped.
//! - [`EIGEN_EPS`]: absolute floor below which a Hessian eigenvalue is
//!   treated as numerically zero.
//! - [`RCOND_EPS`]: floor on the reciprocal condition number `λmin / λmax`.
//! - [`std_normal_cdf(z)`]: `Φ(z)` through `erfc`, accurate in both tails.
//! - [`std_normal_pdf(z)`]: `φ(z)`.
//! - [`clamp_probability(p)`]: maps `p` into `[PROB_EPS, 1 − PROB_EPS]`.
//! - [`inverse_mills_ratio(z)`]: `φ(z) / Φ(z)`, finite for every finite `z`.
//!
//! # Precision
//! `Φ(z) = 1 − Φ(−z)` loses all precision for large positive `z` when
//! computed as `1 − Φ(z)`; routing through `erfc` keeps the lower tail
//! exact down to underflow, which is what the saturation tests rely on.
use statrs::function::erf::erfc;
use std::f64::consts::FRAC_1_SQRT_2;

/// Probability clamp margin.
///
/// `1 − PROB_EPS` is still representable and distinct from `1.0`, so
/// `ln(1 − p)` stays finite after clamping.
pub const PROB_EPS: f64 = 1e-15;

/// Eigenvalues of a Hessian at or below this value are treated as zero.
pub const EIGEN_EPS: f64 = 1e-10;

/// Smallest acceptable reciprocal condition number of a Hessian.
pub const RCOND_EPS: f64 = 1e-12;

/// `1 / sqrt(2π)`.
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal cumulative distribution function `Φ(z)`.
///
/// Evaluated as `0.5 · erfc(−z / √2)`. Returns exactly `0.0` once the
/// lower tail underflows (around `z < −38.5`) and exactly `1.0` for large
/// positive `z`; callers that need to avoid `ln(0)` must clamp.
#[inline]
pub fn std_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z * FRAC_1_SQRT_2)
}

/// Standard normal density `φ(z) = exp(−z²/2) / √(2π)`.
#[inline]
pub fn std_normal_pdf(z: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * z * z).exp()
}

/// Clamp a probability into `[PROB_EPS, 1 − PROB_EPS]`.
///
/// NaN is passed through unchanged so that upstream failures remain
/// visible.
#[inline]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { p } else { p.clamp(PROB_EPS, 1.0 - PROB_EPS) }
}

/// Inverse Mills ratio `λ(z) = φ(z) / Φ(z)`.
///
/// Once `Φ(z)` underflows to zero the ratio is replaced by its asymptote
/// `−z`, so the score of a saturated observation stays finite.
#[inline]
pub fn inverse_mills_ratio(z: f64) -> f64 {
    let cdf = std_normal_cdf(z);
    if cdf > 0.0 { std_normal_pdf(z) / cdf } else { -z }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reference values and symmetry of `std_normal_cdf`.
    // - Tail saturation behavior that the evaluators rely on.
    // - `std_normal_pdf` against the closed form at the mode.
    // - Clamping of probabilities, including NaN passthrough.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check `Φ` against well-known reference values and the identity
    // `Φ(z) + Φ(−z) = 1`.
    //
    // Given
    // -----
    // - z ∈ {0, 1.959963984540054, −1}.
    //
    // Expect
    // ------
    // - Φ(0) = 0.5, Φ(1.96) ≈ 0.975, Φ(−1) ≈ 0.158655, the latter two
    //   within 1e-9 (statrs' erfc is accurate to about 1e-10 here).
    // - Symmetry holds to 1e-15 on a small grid.
    fn std_normal_cdf_matches_reference_values() {
        // Act / Assert
        assert!((std_normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((std_normal_cdf(1.959_963_984_540_054) - 0.975).abs() < 1e-9);
        assert!((std_normal_cdf(-1.0) - 0.158_655_253_931_457_05).abs() < 1e-9);
        for &z in &[-3.0, -0.5, 0.25, 2.0, 4.5] {
            assert!((std_normal_cdf(z) + std_normal_cdf(-z) - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    // Purpose
    // -------
    // Document the saturation points: the CDF hits exactly 0 and 1 in the
    // far tails.
    //
    // Given
    // -----
    // - z = −40 and z = 40.
    //
    // Expect
    // ------
    // - Φ(−40) == 0.0 and Φ(40) == 1.0 exactly.
    fn std_normal_cdf_saturates_in_far_tails() {
        assert_eq!(std_normal_cdf(-40.0), 0.0);
        assert_eq!(std_normal_cdf(40.0), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the density at the mode and its symmetry.
    //
    // Given
    // -----
    // - z = 0 and z = ±1.3.
    //
    // Expect
    // ------
    // - φ(0) = 1/√(2π); φ(1.3) == φ(−1.3).
    fn std_normal_pdf_matches_closed_form() {
        let expected = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert!((std_normal_pdf(0.0) - expected).abs() < 1e-15);
        assert_eq!(std_normal_pdf(1.3), std_normal_pdf(-1.3));
    }

    #[test]
    // Purpose
    // -------
    // Ensure clamping keeps log terms finite and leaves NaN visible.
    //
    // Given
    // -----
    // - p ∈ {0, 1, 0.3, NaN}.
    //
    // Expect
    // ------
    // - 0 → PROB_EPS, 1 → 1 − PROB_EPS, interior values unchanged,
    //   NaN stays NaN; ln of both clamped ends is finite.
    fn clamp_probability_bounds_and_passthrough() {
        assert_eq!(clamp_probability(0.0), PROB_EPS);
        assert_eq!(clamp_probability(1.0), 1.0 - PROB_EPS);
        assert_eq!(clamp_probability(0.3), 0.3);
        assert!(clamp_probability(f64::NAN).is_nan());
        assert!(clamp_probability(0.0).ln().is_finite());
        assert!((1.0 - clamp_probability(1.0)).ln().is_finite());
    }

    #[test]
    // Purpose
    // -------
    // The inverse Mills ratio is exact in the body and finite in the tail.
    //
    // Given
    // -----
    // - z = 0, z = 40, and z = −60 (where Φ underflows).
    //
    // Expect
    // ------
    // - λ(0) = 2φ(0); λ(40) == 0; λ(−60) == 60.
    fn inverse_mills_ratio_is_finite_across_tails() {
        assert!((inverse_mills_ratio(0.0) - 2.0 * std_normal_pdf(0.0)).abs() < 1e-15);
        assert_eq!(inverse_mills_ratio(40.0), 0.0);
        assert_eq!(inverse_mills_ratio(-60.0), 60.0);
        assert!(inverse_mills_ratio(-20.0).is_finite());
    }
}
