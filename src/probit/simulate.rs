//! Synthetic probit data with a known data-generating process.
//!
//! Purpose
//! -------
//! Generate binary-choice data whose true probit coefficients are known in
//! closed form, so that the estimator can be validated end to end.
//!
//! Key behaviors
//! -------------
//! - Two correlated regressors are built from independent standard-normal
//!   draws through a 2 × 2 mixing matrix:
//!   `x1 = m00·e1 + m01·e2`, `x2 = m10·e1 + m11·e2`.
//! - A latent outcome `y* = const + b1·x1 + b2·x2 + σ·e3` is thresholded at
//!   the cutoff: `y = 1` iff `y* ≥ cutoff`.
//! - The design matrix is `[1, x1, x2]`.
//! - [`SimulationSpec::implied_beta`] gives the probit coefficients implied
//!   by the process, `((const − cutoff)/σ, b1/σ, b2/σ)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Randomness is injected: [`simulate`] takes any `rand::Rng`.
//!   [`simulate_seeded`] is reproducible, [`simulate_entropy`] draws from
//!   the thread-local generator.
//! - Draws are taken block-wise: all of `e1`, then `e2`, then `e3`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover spec validation, shapes and coding of the output,
//!   seeded reproducibility, and the empirical positive share against its
//!   theoretical value.
use crate::probit::{
    data::ProbitData,
    errors::{ProbitError, ProbitResult},
};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Settings of the data-generating process.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSpec {
    /// Number of observations.
    pub n: usize,
    /// Row `i` holds the weights of `(e1, e2)` in regressor `x_{i+1}`.
    pub mixing: [[f64; 2]; 2],
    /// Scale of the latent noise.
    pub sigma: f64,
    /// Intercept of the latent equation.
    pub constant: f64,
    pub b1: f64,
    pub b2: f64,
    /// Threshold applied to the latent outcome.
    pub cutoff: f64,
}

impl Default for SimulationSpec {
    fn default() -> Self {
        Self {
            n: 1000,
            mixing: [[1.0, 0.5], [0.5, 1.0]],
            sigma: 2.0,
            constant: 0.5,
            b1: 0.75,
            b2: -0.75,
            cutoff: 0.5,
        }
    }
}

impl SimulationSpec {
    /// Construct a validated spec.
    ///
    /// `coefficients` is `[constant, b1, b2]`.
    ///
    /// # Errors
    /// See [`SimulationSpec::validate`].
    pub fn new(
        n: usize, mixing: [[f64; 2]; 2], sigma: f64, coefficients: [f64; 3], cutoff: f64,
    ) -> ProbitResult<Self> {
        let [constant, b1, b2] = coefficients;
        let spec = Self { n, mixing, sigma, constant, b1, b2, cutoff };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the settings' invariants.
    ///
    /// # Errors
    /// - `ProbitError::InvalidSampleSize` if `n == 0`.
    /// - `ProbitError::InvalidNoiseScale` if `sigma` is non-finite or ≤ 0.
    /// - `ProbitError::NonFiniteSpec` for any non-finite coefficient, cutoff,
    ///   or mixing weight.
    pub fn validate(&self) -> ProbitResult<()> {
        if self.n == 0 {
            return Err(ProbitError::InvalidSampleSize { n: self.n });
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ProbitError::InvalidNoiseScale { sigma: self.sigma });
        }
        let scalars = [
            ("constant", self.constant),
            ("b1", self.b1),
            ("b2", self.b2),
            ("cutoff", self.cutoff),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ProbitError::NonFiniteSpec { field, value });
            }
        }
        if let Some(&value) = self.mixing.iter().flatten().find(|v| !v.is_finite()) {
            return Err(ProbitError::NonFiniteSpec { field: "mixing", value });
        }
        Ok(())
    }

    /// Probit coefficients implied by the process.
    pub fn implied_beta(&self) -> Array1<f64> {
        Array1::from(vec![
            (self.constant - self.cutoff) / self.sigma,
            self.b1 / self.sigma,
            self.b2 / self.sigma,
        ])
    }
}

/// Simulated sample plus the latent outcome that generated it.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulated {
    pub data: ProbitData,
    pub latent: Array1<f64>,
}

/// Draw a sample from `spec` using the supplied generator.
///
/// # Errors
/// Spec validation errors; data construction cannot fail for a valid spec.
pub fn simulate<R: Rng + ?Sized>(spec: &SimulationSpec, rng: &mut R) -> ProbitResult<Simulated> {
    spec.validate()?;
    let n = spec.n;
    let e1 = draw_standard_normal(n, rng);
    let e2 = draw_standard_normal(n, rng);
    let e3 = draw_standard_normal(n, rng);

    let [[m00, m01], [m10, m11]] = spec.mixing;
    let x1 = &e1 * m00 + &e2 * m01;
    let x2 = &e1 * m10 + &e2 * m11;
    let latent = &x1 * spec.b1 + &x2 * spec.b2 + &e3 * spec.sigma + spec.constant;
    let y = latent.mapv(|v| if v >= spec.cutoff { 1.0 } else { 0.0 });

    let mut x = Array2::<f64>::ones((n, 3));
    x.column_mut(1).assign(&x1);
    x.column_mut(2).assign(&x2);
    let data = ProbitData::new(x, y)?;
    Ok(Simulated { data, latent })
}

/// Reproducible draw from a `StdRng` seeded with `seed`.
pub fn simulate_seeded(spec: &SimulationSpec, seed: u64) -> ProbitResult<Simulated> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate(spec, &mut rng)
}

/// Draw from the thread-local generator.
pub fn simulate_entropy(spec: &SimulationSpec) -> ProbitResult<Simulated> {
    let mut rng = rand::thread_rng();
    simulate(spec, &mut rng)
}

fn draw_standard_normal<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_iter((0..n).map(|_| rng.sample::<f64, _>(StandardNormal)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::numerical_stability::std_normal_cdf;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation of `SimulationSpec`.
    // - Shapes, constant column, and 0/1 coding of simulated data.
    // - Seeded reproducibility.
    // - The positive share against the share implied by the process.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Invalid settings are rejected before any draw.
    //
    // Given
    // -----
    // - n = 0, σ = 0, a NaN cutoff, and an infinite mixing weight.
    //
    // Expect
    // ------
    // - The matching `ProbitError` variant for each.
    fn spec_validation_rejects_invalid_settings() {
        let mix = [[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(
            SimulationSpec::new(0, mix, 1.0, [0.0; 3], 0.0),
            Err(ProbitError::InvalidSampleSize { n: 0 })
        );
        assert_eq!(
            SimulationSpec::new(10, mix, 0.0, [0.0; 3], 0.0),
            Err(ProbitError::InvalidNoiseScale { sigma: 0.0 })
        );
        assert!(matches!(
            SimulationSpec::new(10, mix, 1.0, [0.0; 3], f64::NAN),
            Err(ProbitError::NonFiniteSpec { field: "cutoff", .. })
        ));
        assert!(matches!(
            SimulationSpec::new(10, [[1.0, f64::INFINITY], [0.0, 1.0]], 1.0, [0.0; 3], 0.0),
            Err(ProbitError::NonFiniteSpec { field: "mixing", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The default process implies β = (0, 0.375, -0.375).
    //
    // Given
    // -----
    // - `SimulationSpec::default()`.
    //
    // Expect
    // ------
    // - `implied_beta` equals the closed form exactly.
    fn implied_beta_matches_closed_form_for_default_spec() {
        let beta = SimulationSpec::default().implied_beta();
        assert_eq!(beta.to_vec(), vec![0.0, 0.375, -0.375]);
    }

    #[test]
    // Purpose
    // -------
    // Output has the documented shape and coding, and seeding is reproducible.
    //
    // Given
    // -----
    // - Default spec with n = 200 drawn twice with seed 7 and once with seed 8.
    //
    // Expect
    // ------
    // - X is 200 × 3 with a unit first column; y ∈ {0, 1} and agrees with
    //   the latent threshold; same seed → identical samples; different
    //   seed → different latent draws.
    fn simulate_seeded_shapes_coding_and_reproducibility() {
        // Arrange
        let spec = SimulationSpec { n: 200, ..SimulationSpec::default() };

        // Act
        let a = simulate_seeded(&spec, 7).expect("simulation should succeed");
        let b = simulate_seeded(&spec, 7).expect("simulation should succeed");
        let c = simulate_seeded(&spec, 8).expect("simulation should succeed");

        // Assert
        assert_eq!(a.data.x.dim(), (200, 3));
        assert!(a.data.x.column(0).iter().all(|&v| v == 1.0));
        for (&y, &ystar) in a.data.y.iter().zip(a.latent.iter()) {
            assert_eq!(y, if ystar >= spec.cutoff { 1.0 } else { 0.0 });
        }
        assert_eq!(a, b);
        assert_ne!(a.latent, c.latent);
    }

    #[test]
    // Purpose
    // -------
    // The empirical share of ones tracks the mean of Φ(x·β_true).
    //
    // Given
    // -----
    // - Default spec with n = 20000, seed 11.
    //
    // Expect
    // ------
    // - |share − mean Φ(x·β)| < 0.02.
    fn simulate_positive_share_matches_implied_probabilities() {
        // Arrange
        let spec = SimulationSpec { n: 20_000, ..SimulationSpec::default() };
        let sim = simulate_seeded(&spec, 11).expect("simulation should succeed");

        // Act
        let z = sim.data.x.dot(&spec.implied_beta());
        let implied = z.mapv(std_normal_cdf).mean().expect("non-empty");

        // Assert
        assert!((sim.data.positive_share() - implied).abs() < 0.02);
    }

    #[test]
    // Purpose
    // -------
    // The entropy-backed entry point produces valid data.
    //
    // Given
    // -----
    // - Default spec with n = 50.
    //
    // Expect
    // ------
    // - 50 observations, 3 regressors.
    fn simulate_entropy_produces_valid_data() {
        let spec = SimulationSpec { n: 50, ..SimulationSpec::default() };
        let sim = simulate_entropy(&spec).expect("simulation should succeed");
        assert_eq!(sim.data.n_obs(), 50);
        assert_eq!(sim.data.n_params(), 3);
    }
}
