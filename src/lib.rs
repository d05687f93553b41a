//! probit_mle — probit maximum-likelihood estimation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the probit estimator to Python via the `_probit_mle` extension module. When
//! the `python-bindings` feature is enabled, this module defines the
//! Python-facing classes and functions used by the `probit_mle` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`optimization`, `probit`, `inference`)
//!   as the public crate surface.
//! - Define `#[pyclass]` wrappers, a `simulate` function, and the
//!   `#[pymodule]` initializer for the `_probit_mle` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules are assumed to hold.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as rich error types internally
//!   and mapped to Python `ValueError`s at the boundary.
//! - Python getters copy `ndarray` vectors into `Vec<f64>`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`probit`], [`inference`], and
//!   [`optimization`] and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//! - The `probit-demo` binary shows the full Rust-side workflow.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration suite under `tests/`.

pub mod inference;
pub mod optimization;
pub mod probit;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::report::InferenceReport,
    optimization::loglik_optimizer::OptimOutcome,
    probit::{
        errors::ProbitError,
        model::ProbitModel,
        simulate::{SimulationSpec, simulate_seeded},
    },
    utils::{extract_probit_data, extract_probit_options, extract_vector},
};

/// simulate — draw a synthetic probit sample.
///
/// Parameters
/// ----------
/// - `n`: sample size (default 1000).
/// - `seed`: RNG seed (default 0).
/// - `sigma`: noise scale (default 2.0).
/// - `cutoff`: latent threshold (default 0.5).
///
/// Returns
/// -------
/// `(X, y)` as numpy arrays; `X` is `n × 3` with a leading constant column.
/// The remaining process settings use [`SimulationSpec::default`].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (n = 1000, seed = 0, sigma = 2.0, cutoff = 0.5),
    text_signature = "(n=1000, seed=0, sigma=2.0, cutoff=0.5)"
)]
fn simulate<'py>(
    py: Python<'py>, n: usize, seed: u64, sigma: f64, cutoff: f64,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyArray1<f64>>)> {
    let base = SimulationSpec::default();
    let spec =
        SimulationSpec::new(n, base.mixing, sigma, [base.constant, base.b1, base.b2], cutoff)?;
    let sim = simulate_seeded(&spec, seed)?;
    Ok((sim.data.x.into_pyarray(py), sim.data.y.into_pyarray(py)))
}

/// Probit — Python-facing wrapper for [`ProbitModel`].
///
/// Purpose
/// -------
/// Fit a probit model from Python and expose the estimates, standard errors,
/// and optimizer diagnostics.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Probit(method="nelder-mead", max_iter=None, evaluator="vectorized", clamp=False)`:
/// - `method`: `"nelder-mead" | "bfgs" | "lbfgs"`.
/// - `max_iter`: iteration cap; defaults to 300.
/// - `evaluator`: `"naive" | "vectorized"`.
/// - `clamp`: clamp probabilities away from 0 and 1.
///
/// Notes
/// -----
/// - `fit` runs estimation and inference in one call; the getters raise
///   `ValueError` before a successful fit.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "probit_mle", unsendable)]
pub struct Probit {
    pub inner: ProbitModel,
}

#[cfg(feature = "python-bindings")]
impl Probit {
    fn outcome(&self) -> PyResult<&OptimOutcome> {
        Ok(self.inner.results.as_ref().ok_or(ProbitError::ModelNotFitted)?)
    }

    fn report(&self) -> PyResult<&InferenceReport> {
        Ok(self.inner.inference.as_ref().ok_or(ProbitError::ModelNotFitted)?)
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Probit {
    #[new]
    #[pyo3(
        signature = (method = None, max_iter = None, evaluator = None, clamp = false),
        text_signature = "(method='nelder-mead', max_iter=None, evaluator='vectorized', clamp=False)"
    )]
    pub fn new(
        method: Option<&str>, max_iter: Option<usize>, evaluator: Option<&str>, clamp: bool,
    ) -> PyResult<Self> {
        let options = extract_probit_options(method, max_iter, evaluator, clamp)?;
        Ok(Probit { inner: ProbitModel::new(options) })
    }

    #[pyo3(signature = (x, y, theta0 = None), text_signature = "(self, x, y, /, theta0=None)")]
    pub fn fit<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        theta0: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let data = extract_probit_data(x, y)?;
        match theta0 {
            Some(raw) => self.inner.fit(extract_vector(raw)?, &data)?,
            None => self.inner.fit_from_zero(&data)?,
        }
        self.inner.infer(&data)?;
        Ok(())
    }

    #[getter]
    pub fn params(&self) -> PyResult<Vec<f64>> {
        Ok(self.outcome()?.theta_hat.to_vec())
    }

    #[getter]
    pub fn std_errors(&self) -> PyResult<Vec<f64>> {
        Ok(self.report()?.std_errors.to_vec())
    }

    #[getter]
    pub fn t_stats(&self) -> PyResult<Vec<f64>> {
        Ok(self.report()?.t_stats.to_vec())
    }

    #[getter]
    pub fn p_values(&self) -> PyResult<Vec<f64>> {
        Ok(self.report()?.p_values.to_vec())
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        Ok(self.outcome()?.converged)
    }

    #[getter]
    pub fn loglik(&self) -> PyResult<f64> {
        Ok(self.outcome()?.value)
    }

    #[getter]
    pub fn status(&self) -> PyResult<String> {
        Ok(self.outcome()?.status.clone())
    }

    #[getter]
    pub fn iterations(&self) -> PyResult<usize> {
        Ok(self.outcome()?.iterations)
    }

    #[getter]
    pub fn well_conditioned(&self) -> PyResult<bool> {
        Ok(self.report()?.is_well_conditioned())
    }

    /// Coefficient table as printed by the Rust `Display` impl.
    pub fn summary(&self) -> PyResult<String> {
        Ok(self.report()?.to_string())
    }
}

/// _probit_mle — PyO3 module initializer for the Python extension.
///
/// Registers the `simulate` function and the `Probit` class. Invoked by
/// Python when importing the compiled extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _probit_mle<'py>(m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_class::<Probit>()?;
    Ok(())
}
