//! Python adapter for engine port descriptors.

use inference_core::model::Port;
use pyo3::prelude::*;

/// Read-only view of one model connection point.
///
/// Every access through the model adapter wraps a fresh instance; two views
/// of the same engine port compare equal but are distinct objects.
#[pyclass(name = "Port")]
pub struct PyPort {
    port: Port,
}

#[pymethods]
impl PyPort {
    #[getter]
    pub fn name(&self) -> &str {
        self.port.name()
    }

    #[getter]
    pub fn index(&self) -> usize {
        self.port.index()
    }

    #[getter]
    pub fn direction(&self) -> &'static str {
        self.port.direction().as_str()
    }

    #[getter]
    pub fn shape(&self) -> Vec<usize> {
        self.port.shape().to_vec()
    }

    #[getter]
    pub fn dtype(&self) -> &'static str {
        self.port.dtype().as_str()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "Port(name={:?}, index={}, direction={:?}, shape={:?}, dtype={:?})",
            self.port.name(),
            self.port.index(),
            self.port.direction().as_str(),
            self.port.shape(),
            self.port.dtype().as_str(),
        )
    }

    pub fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        match other.downcast::<PyPort>() {
            Ok(other) => other.borrow().port == self.port,
            Err(_) => false,
        }
    }
}

impl PyPort {
    /// Wrap an engine port into a fresh Python object.
    pub fn wrap(py: Python<'_>, port: Port) -> PyResult<Py<PyPort>> {
        Py::new(py, PyPort { port })
    }

    pub fn port(&self) -> &Port {
        &self.port
    }
}

/// Export the port class from the extension module.
pub fn init(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPort>()
}
