//! inference::report — coefficient table for a fitted log-likelihood.
//!
//! Combines the curvature at `θ̂` from [`calc_curvature`] with Student-t
//! reference distributions on `n − k` degrees of freedom. A flagged Hessian
//! still produces a report: standard errors, t-statistics, and p-values are
//! NaN and `condition` records the reason.
use crate::{
    inference::{
        errors::{InferenceError, InferenceResult},
        hessian::{HessianCondition, calc_curvature},
    },
    optimization::loglik_optimizer::{LogLikelihood, Theta},
};
use ndarray::{Array1, Array2, Zip};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Estimates with standard errors, t-statistics, and two-sided p-values.
///
/// All vectors have length `k = estimates.len()`. `covariance` is the
/// inverse observed information and is `None` when `condition` is flagged.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceReport {
    pub estimates: Array1<f64>,
    pub std_errors: Array1<f64>,
    pub t_stats: Array1<f64>,
    pub p_values: Array1<f64>,
    pub dof: usize,
    pub condition: HessianCondition,
    pub covariance: Option<Array2<f64>>,
}

impl InferenceReport {
    /// compute — full inference pass at `theta_hat`.
    ///
    /// Parameters
    /// ----------
    /// - `f`: model implementing [`LogLikelihood`].
    /// - `theta_hat`: fitted estimate.
    /// - `data`: model data.
    /// - `n_obs`: number of observations behind `data`; fixes `dof = n_obs − k`.
    ///
    /// Errors
    /// ------
    /// - `InferenceError::InsufficientDegreesOfFreedom` when `n_obs ≤ k`.
    /// - `InferenceError::DimensionMismatch` when `f.check` rejects the
    ///   estimate length.
    /// - `InferenceError::Optimization` when the gradient cannot be evaluated.
    /// - `InferenceError::Distribution` if the Student-t cannot be built.
    ///
    /// A singular or ill-conditioned Hessian is not an error.
    pub fn compute<F: LogLikelihood>(
        f: &F, theta_hat: &Theta, data: &F::Data, n_obs: usize,
    ) -> InferenceResult<Self> {
        let k = theta_hat.len();
        if n_obs <= k {
            return Err(InferenceError::InsufficientDegreesOfFreedom { n_obs, k });
        }
        let dof = n_obs - k;
        let curvature = calc_curvature(f, theta_hat, data)?;
        let t_stats = Zip::from(theta_hat)
            .and(&curvature.std_errors)
            .map_collect(|&est, &se| est / se);
        let p_values = two_sided_p_values(&t_stats, dof)?;
        Ok(InferenceReport {
            estimates: theta_hat.clone(),
            std_errors: curvature.std_errors,
            t_stats,
            p_values,
            dof,
            condition: curvature.condition,
            covariance: curvature.covariance,
        })
    }

    pub fn is_well_conditioned(&self) -> bool {
        self.condition.is_well_conditioned()
    }
}

/// `p_i = 2 · P(T_dof > |t_i|)`; NaN in, NaN out.
pub fn two_sided_p_values(t_stats: &Array1<f64>, dof: usize) -> InferenceResult<Array1<f64>> {
    let dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|e| InferenceError::Distribution { text: e.to_string() })?;
    Ok(t_stats.mapv(|t| if t.is_nan() { f64::NAN } else { 2.0 * dist.sf(t.abs()) }))
}

impl std::fmt::Display for InferenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<8} {:>12} {:>12} {:>10} {:>10}",
            "param", "estimate", "std. error", "t", "P>|t|"
        )?;
        for i in 0..self.estimates.len() {
            writeln!(
                f,
                "{:<8} {:>12.6} {:>12.6} {:>10.3} {:>10.4}",
                format!("beta[{i}]"),
                self.estimates[i],
                self.std_errors[i],
                self.t_stats[i],
                self.p_values[i]
            )?;
        }
        write!(f, "dof = {}, Hessian: {}", self.dof, self.condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::Grad,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - t-statistics as exact ratios of estimates to standard errors.
    // - Student-t p-values against known quantiles.
    // - Degrees-of-freedom and flagged-Hessian edge cases.
    // - The `Display` table.
    //
    // They intentionally DO NOT cover:
    // - Probit curvature, covered by `probit::model` tests and the
    //   integration suite.
    // -------------------------------------------------------------------------

    // ℓ(θ) = −½ Σ a_i θ_i², so se_i = 1 / sqrt(a_i).
    struct Diagonal {
        a: Array1<f64>,
    }

    impl LogLikelihood for Diagonal {
        type Data = ();

        fn value(&self, t: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-0.5 * (&self.a * &t.mapv(|v| v * v)).sum())
        }

        fn check(&self, t: &Theta, _data: &()) -> OptResult<()> {
            if t.len() != self.a.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: self.a.len(),
                    actual: t.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, t: &Theta, _data: &()) -> OptResult<Grad> {
            Ok(-(&self.a * t))
        }
    }

    #[test]
    // Purpose
    // -------
    // Standard errors, t-statistics, and p-values on a known quadratic.
    //
    // Given
    // -----
    // - a = [4, 1], θ̂ = [1, 2], n = 12 (dof = 10).
    //
    // Expect
    // ------
    // - se ≈ [0.5, 1.0], t == est / se exactly, p matches 2·sf(|t|).
    // - For t = 2 on 10 dof, p ≈ 0.0734.
    fn compute_matches_closed_form_quadratic() {
        // Arrange
        let f = Diagonal { a: array![4.0, 1.0] };
        let theta_hat = array![1.0, 2.0];

        // Act
        let report = InferenceReport::compute(&f, &theta_hat, &(), 12).expect("report");

        // Assert
        assert_eq!(report.dof, 10);
        assert!(report.is_well_conditioned());
        assert!((report.std_errors[0] - 0.5).abs() < 1e-6);
        assert!((report.std_errors[1] - 1.0).abs() < 1e-6);
        for i in 0..2 {
            assert_eq!(report.t_stats[i], report.estimates[i] / report.std_errors[i]);
        }
        assert!((report.p_values[0] - 0.0734).abs() < 1e-3);
        assert!(report.covariance.is_some());
    }

    #[test]
    // Purpose
    // -------
    // `n ≤ k` leaves no residual degrees of freedom.
    //
    // Given
    // -----
    // - k = 2 and n = 2.
    //
    // Expect
    // ------
    // - `InsufficientDegreesOfFreedom { n_obs: 2, k: 2 }`.
    fn compute_rejects_zero_dof() {
        let f = Diagonal { a: array![1.0, 1.0] };

        let res = InferenceReport::compute(&f, &array![0.0, 0.0], &(), 2);

        assert_eq!(res, Err(InferenceError::InsufficientDegreesOfFreedom { n_obs: 2, k: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // A flat direction is flagged and produces NaN throughout, not a panic.
    //
    // Given
    // -----
    // - a = [1, 0]: no curvature in the second coordinate.
    //
    // Expect
    // ------
    // - `NotPositiveDefinite`, NaN standard errors, t-statistics, and
    //   p-values, and no covariance.
    fn compute_flags_singular_hessian_with_nan_statistics() {
        let f = Diagonal { a: array![1.0, 0.0] };

        let report = InferenceReport::compute(&f, &array![0.3, 0.1], &(), 50).expect("report");

        assert!(matches!(report.condition, HessianCondition::NotPositiveDefinite { .. }));
        assert!(report.std_errors.iter().all(|v| v.is_nan()));
        assert!(report.t_stats.iter().all(|v| v.is_nan()));
        assert!(report.p_values.iter().all(|v| v.is_nan()));
        assert!(report.covariance.is_none());
    }

    #[test]
    // Purpose
    // -------
    // p-values are symmetric in t and NaN-preserving.
    //
    // Given
    // -----
    // - t = [0, −1.96, 1.96, NaN] on a large dof.
    //
    // Expect
    // ------
    // - p(0) = 1, p(±1.96) ≈ 0.05, p(NaN) is NaN.
    fn two_sided_p_values_are_symmetric_and_nan_safe() {
        let p = two_sided_p_values(&array![0.0, -1.96, 1.96, f64::NAN], 100_000).expect("p");

        assert!((p[0] - 1.0).abs() < 1e-12);
        assert!((p[1] - 0.05).abs() < 1e-3);
        assert_eq!(p[1], p[2]);
        assert!(p[3].is_nan());
    }

    #[test]
    fn display_lists_every_parameter_and_condition() {
        let f = Diagonal { a: array![4.0, 1.0, 9.0] };
        let report = InferenceReport::compute(&f, &array![1.0, 2.0, 3.0], &(), 20).expect("report");

        let table = report.to_string();

        assert!(table.contains("beta[0]"));
        assert!(table.contains("beta[2]"));
        assert!(table.contains("well conditioned"));
        assert!(table.contains("dof = 17"));
    }
}
