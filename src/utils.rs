//! Conversion helpers for the Python bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature. The
//! helpers accept numpy arrays, pandas objects (via `to_numpy`), or plain
//! Python sequences, copy them into owned `ndarray` containers, and translate
//! Python-friendly option arguments into validated Rust option structs.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Method, Tolerances},
    probit::{
        data::ProbitData,
        errors::ProbitError,
        loglik::{Evaluator, Saturation},
        options::{GradientMode, ProbitOptions},
    },
};

/// Copy a 1-D float64 array-like into an owned `Array1`.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro.as_array().to_owned());
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(Array1::from(vec))
}

/// Copy a 2-D float64 array-like into an owned `Array2` (rows = observations).
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyTypeError::new_err("rows of X must all have the same length"));
    }
    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| PyTypeError::new_err(format!("could not shape X: {e}")))
}

/// Build validated probit data from Python `X` and `y`.
#[cfg(feature = "python-bindings")]
pub fn extract_probit_data<'py>(
    x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
) -> PyResult<ProbitData> {
    let x = extract_matrix(x)?;
    let y = extract_vector(y)?;
    Ok(ProbitData::new(x, y)?)
}

/// Translate Python constructor arguments into [`ProbitOptions`].
///
/// `method` and `evaluator` are parsed by name; `clamp` selects
/// `Saturation::Clamp`. The analytic score is always used.
#[cfg(feature = "python-bindings")]
pub fn extract_probit_options(
    method: Option<&str>, max_iter: Option<usize>, evaluator: Option<&str>, clamp: bool,
) -> PyResult<ProbitOptions> {
    use std::str::FromStr;

    // OptResult<_> -> ProbitError -> PyErr
    let method = match method {
        Some(name) => Method::from_str(name).map_err(ProbitError::from)?,
        None => Method::NelderMead,
    };
    let defaults = MLEOptions::default().tols;
    let tols = Tolerances::new(defaults.tol_grad, defaults.tol_cost, max_iter.or(defaults.max_iter))
        .map_err(ProbitError::from)?;
    let mle_opts = MLEOptions::new(tols, method, LineSearcher::MoreThuente, None)
        .map_err(ProbitError::from)?;

    let evaluator = match evaluator {
        Some(name) => Evaluator::from_str(name)?,
        None => Evaluator::Vectorized,
    };
    let saturation = if clamp { Saturation::Clamp } else { Saturation::Propagate };

    Ok(ProbitOptions::new(evaluator, saturation, GradientMode::Analytic, mle_opts))
}
