//! Binary-choice data container for probit models.
//!
//! Purpose
//! -------
//! Provide a small, validated container for a design matrix `X` and a binary
//! outcome vector `y`, so that the evaluators and the optimizer can assume
//! clean inputs and skip re-validation on every likelihood call.
//!
//! Key behaviors
//! -------------
//! - [`ProbitData::new`] enforces shape, finiteness, and outcome-coding
//!   invariants once, at the boundary where data enters the crate.
//! - [`ProbitData::check_theta`] validates a coefficient vector against the
//!   number of regressors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n = x.nrows() > 0` and `k = x.ncols() > 0`.
//! - `y.len() == n`.
//! - Every entry of `x` is finite; every entry of `y` is exactly `0.0` or `1.0`.
//!
//! Conventions
//! -----------
//! - Rows are observations, columns are regressors. A constant column is not
//!   required here; the simulator always supplies one as column 0.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each rejection branch of
//!   [`ProbitData::new`] and [`ProbitData::check_theta`].
use crate::probit::errors::{ProbitError, ProbitResult};
use ndarray::{Array1, Array2};

/// `ProbitData` — validated design matrix and binary outcomes.
///
/// Fields
/// ------
/// - `x`: `Array2<f64>`, `n × k` regressors (finite).
/// - `y`: `Array1<f64>`, length-`n` outcomes in `{0, 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbitData {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl ProbitData {
    /// Construct a validated [`ProbitData`].
    ///
    /// Errors
    /// ------
    /// - `ProbitError::EmptyData` if `x` has no rows.
    /// - `ProbitError::NoRegressors` if `x` has no columns.
    /// - `ProbitError::LengthMismatch` if `y.len() != x.nrows()`.
    /// - `ProbitError::NonFiniteRegressor` for the first non-finite entry of `x`.
    /// - `ProbitError::InvalidOutcome` for the first outcome not in `{0, 1}`.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> ProbitResult<Self> {
        if x.nrows() == 0 {
            return Err(ProbitError::EmptyData);
        }
        if x.ncols() == 0 {
            return Err(ProbitError::NoRegressors);
        }
        if y.len() != x.nrows() {
            return Err(ProbitError::LengthMismatch { x_rows: x.nrows(), y_len: y.len() });
        }
        if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ProbitError::NonFiniteRegressor { row, col, value });
        }
        if let Some((index, &value)) =
            y.iter().enumerate().find(|(_, v)| **v != 0.0 && **v != 1.0)
        {
            return Err(ProbitError::InvalidOutcome { index, value });
        }
        Ok(Self { x, y })
    }

    /// Number of observations `n`.
    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    /// Number of regressors `k`.
    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Share of observations with `y = 1`.
    pub fn positive_share(&self) -> f64 {
        self.y.sum() / self.n_obs() as f64
    }

    /// `true` when both outcomes occur in the sample.
    pub fn has_outcome_variation(&self) -> bool {
        let share = self.positive_share();
        share > 0.0 && share < 1.0
    }

    /// Validate a coefficient vector against this data set.
    ///
    /// Errors
    /// ------
    /// - `ProbitError::ThetaLengthMismatch` if `beta.len() != k`.
    /// - `ProbitError::NonFiniteTheta` for the first non-finite coefficient.
    pub fn check_theta(&self, beta: &Array1<f64>) -> ProbitResult<()> {
        if beta.len() != self.n_params() {
            return Err(ProbitError::ThetaLengthMismatch {
                expected: self.n_params(),
                actual: beta.len(),
            });
        }
        if let Some((index, &value)) = beta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ProbitError::NonFiniteTheta { index, value });
        }
        Ok(())
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
    // - Successful construction and the derived counts.
    // - Every validation branch of `ProbitData::new`.
    // - Coefficient checks in `check_theta`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Valid inputs are accepted unchanged.
    //
    // Given
    // -----
    // - A 3 × 2 design and outcomes [1, 0, 1].
    //
    // Expect
    // ------
    // - `n_obs == 3`, `n_params == 2`, positive share 2/3.
    fn new_accepts_valid_data() {
        // Arrange
        let x = array![[1.0, 0.2], [1.0, -1.0], [1.0, 3.0]];
        let y = array![1.0, 0.0, 1.0];

        // Act
        let data = ProbitData::new(x.clone(), y.clone()).expect("data should be valid");

        // Assert
        assert_eq!(data.x, x);
        assert_eq!(data.y, y);
        assert_eq!(data.n_obs(), 3);
        assert_eq!(data.n_params(), 2);
        assert!((data.positive_share() - 2.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Each invariant violation maps to its own error.
    //
    // Given
    // -----
    // - Empty X, zero-column X, mismatched y, a NaN regressor, and y = 0.5.
    //
    // Expect
    // ------
    // - `EmptyData`, `NoRegressors`, `LengthMismatch`, `NonFiniteRegressor`
    //   with its position, and `InvalidOutcome` with its index.
    fn new_rejects_each_invalid_input() {
        assert_eq!(
            ProbitData::new(Array2::zeros((0, 2)), Array1::zeros(0)),
            Err(ProbitError::EmptyData)
        );
        assert_eq!(
            ProbitData::new(Array2::zeros((2, 0)), Array1::zeros(2)),
            Err(ProbitError::NoRegressors)
        );
        assert_eq!(
            ProbitData::new(Array2::zeros((2, 1)), Array1::zeros(3)),
            Err(ProbitError::LengthMismatch { x_rows: 2, y_len: 3 })
        );
        assert!(matches!(
            ProbitData::new(array![[1.0, 0.0], [1.0, f64::NAN]], array![0.0, 1.0]),
            Err(ProbitError::NonFiniteRegressor { row: 1, col: 1, .. })
        ));
        assert_eq!(
            ProbitData::new(array![[1.0], [1.0]], array![1.0, 0.5]),
            Err(ProbitError::InvalidOutcome { index: 1, value: 0.5 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Coefficient vectors are checked for length and finiteness.
    //
    // Given
    // -----
    // - A 2-regressor data set.
    //
    // Expect
    // ------
    // - Length 3 → `ThetaLengthMismatch`; [0, ∞] → `NonFiniteTheta`;
    //   [0.1, -0.1] → Ok.
    fn check_theta_validates_length_and_entries() {
        // Arrange
        let data = ProbitData::new(array![[1.0, 0.0], [1.0, 1.0]], array![0.0, 1.0])
            .expect("data should be valid");

        // Act / Assert
        assert_eq!(
            data.check_theta(&array![0.0, 0.0, 0.0]),
            Err(ProbitError::ThetaLengthMismatch { expected: 2, actual: 3 })
        );
        assert!(matches!(
            data.check_theta(&array![0.0, f64::INFINITY]),
            Err(ProbitError::NonFiniteTheta { index: 1, .. })
        ));
        assert!(data.check_theta(&array![0.1, -0.1]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Outcome variation requires at least one of each outcome.
    //
    // Given
    // -----
    // - y = (0, 1), y ≡ 0, and y ≡ 1 on the same two rows.
    //
    // Expect
    // ------
    // - Only the mixed sample has variation.
    fn has_outcome_variation_requires_both_outcomes() {
        // Arrange
        let x = array![[1.0, 0.0], [1.0, 1.0]];
        let build = |y| ProbitData::new(x.clone(), y).expect("data should be valid");

        // Act / Assert
        assert!(build(array![0.0, 1.0]).has_outcome_variation());
        assert!(!build(array![0.0, 0.0]).has_outcome_variation());
        assert!(!build(array![1.0, 1.0]).has_outcome_variation());
    }
}
