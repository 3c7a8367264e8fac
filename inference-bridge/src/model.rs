//! Python adapter for engine model handles.

use std::sync::Arc;

use inference_core::model::{Direction, Model, PortError};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyFloat, PyInt, PyString};

use crate::port::PyPort;
use crate::registry::TypeRegistry;

/// Identity under which the model constructor is registered.
pub const MODEL_TYPE: &str = "Model";

/// Python-visible wrapper around a shared engine model handle.
///
/// Freshly constructed instances hold no handle; [`PyModel::wrap`] is the
/// only supported path to a usable instance. Accessors on an unbound
/// instance raise `RuntimeError`.
#[pyclass(name = "Model")]
#[derive(Default)]
pub struct PyModel {
    model: Option<Arc<Model>>,
}

/// Selector parsed from the optional `input()`/`output()` argument.
#[derive(Debug)]
enum PortKey {
    Sole,
    Name(String),
    Index(i32),
}

impl PortKey {
    /// Decide the lookup mode once, at the binding boundary.
    fn parse(arg: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let Some(obj) = arg else {
            return Ok(PortKey::Sole);
        };
        if obj.is_instance_of::<PyString>() {
            return Ok(PortKey::Name(obj.extract()?));
        }
        // bool is an int subclass in Python, reject it before the int probe
        if obj.is_instance_of::<PyBool>() {
            return Err(invalid_key(obj));
        }
        if obj.is_instance_of::<PyInt>() {
            return obj.extract::<i32>().map(PortKey::Index).map_err(|_| {
                PyTypeError::new_err("port index does not fit in a 32-bit signed integer")
            });
        }
        if obj.is_instance_of::<PyFloat>() {
            let value = obj.extract::<f64>()?;
            if value.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&value) {
                return Ok(PortKey::Index(value as i32));
            }
            return Err(PyTypeError::new_err(format!(
                "port index must be an integer, got {value}"
            )));
        }
        Err(invalid_key(obj))
    }
}

fn invalid_key(obj: &Bound<'_, PyAny>) -> PyErr {
    PyTypeError::new_err(format!(
        "port selector must be a string name or an integer index, got {}",
        obj.get_type()
    ))
}

/// Every failed engine lookup surfaces as the same recoverable error class.
fn port_error(err: PortError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

#[pymethods]
impl PyModel {
    /// Empty constructor invoked by the wrap factory. The instance is not
    /// usable until a handle has been assigned.
    #[new]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine-reported model name, or `"unknown"` when the engine reports an
    /// empty one.
    #[pyo3(name = "getName")]
    pub fn get_name(&self) -> PyResult<String> {
        let model = self.handle()?;
        let name = model.name();
        if name.is_empty() {
            Ok("unknown".to_string())
        } else {
            Ok(name.to_string())
        }
    }

    /// Look up one input port: the sole port when called without arguments,
    /// by tensor name for a string argument, by position for an integer.
    #[pyo3(signature = (key=None))]
    pub fn input(&self, py: Python<'_>, key: Option<&Bound<'_, PyAny>>) -> PyResult<Py<PyPort>> {
        self.select_port(py, Direction::Input, key)
    }

    /// `input()` analog over the output ports.
    #[pyo3(signature = (key=None))]
    pub fn output(&self, py: Python<'_>, key: Option<&Bound<'_, PyAny>>) -> PyResult<Py<PyPort>> {
        self.select_port(py, Direction::Output, key)
    }

    /// All input ports in engine order, each freshly wrapped.
    #[getter]
    pub fn inputs(&self, py: Python<'_>) -> PyResult<Vec<Py<PyPort>>> {
        self.wrap_ports(py, Direction::Input)
    }

    /// All output ports in engine order, each freshly wrapped.
    #[getter]
    pub fn outputs(&self, py: Python<'_>) -> PyResult<Vec<Py<PyPort>>> {
        self.wrap_ports(py, Direction::Output)
    }
}

impl PyModel {
    /// Wrap an engine handle into a host instance through the registered
    /// constructor. The returned instance is immediately safe to query.
    pub fn wrap(py: Python<'_>, registry: &TypeRegistry, model: Arc<Model>) -> PyResult<Py<PyModel>> {
        let constructor = registry.constructor(MODEL_TYPE).ok_or_else(|| {
            PyRuntimeError::new_err("Model type is not registered, module init must run before wrap")
        })?;
        let instance = constructor.bind(py).call0()?;
        let instance = instance.downcast_into::<PyModel>().map_err(|_| {
            PyRuntimeError::new_err("constructor registered for Model does not produce Model instances")
        })?;
        instance.borrow_mut().model = Some(model);
        Ok(instance.unbind())
    }

    fn handle(&self) -> PyResult<&Arc<Model>> {
        self.model.as_ref().ok_or_else(|| {
            PyRuntimeError::new_err("model handle is not set, instances must be created through wrap")
        })
    }

    fn select_port(
        &self,
        py: Python<'_>,
        direction: Direction,
        key: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Py<PyPort>> {
        let model = self.handle()?;
        let key = PortKey::parse(key)?;
        let port = match (direction, key) {
            (Direction::Input, PortKey::Sole) => model.input(),
            (Direction::Input, PortKey::Name(name)) => model.input_by_name(&name),
            (Direction::Input, PortKey::Index(index)) => model.input_by_index(index),
            (Direction::Output, PortKey::Sole) => model.output(),
            (Direction::Output, PortKey::Name(name)) => model.output_by_name(&name),
            (Direction::Output, PortKey::Index(index)) => model.output_by_index(index),
        }
        .map_err(port_error)?;
        PyPort::wrap(py, port.clone())
    }

    fn wrap_ports(&self, py: Python<'_>, direction: Direction) -> PyResult<Vec<Py<PyPort>>> {
        let model = self.handle()?;
        let ports = match direction {
            Direction::Input => model.inputs(),
            Direction::Output => model.outputs(),
        };
        let mut wrapped = Vec::with_capacity(ports.len());
        for port in ports {
            wrapped.push(PyPort::wrap(py, port.clone())?);
        }
        Ok(wrapped)
    }
}

/// Register the model class: store its constructor in `registry` and export
/// it from the module under the name `Model`.
pub fn init(m: &Bound<'_, PyModule>, registry: &mut TypeRegistry) -> PyResult<()> {
    let class = m.py().get_type::<PyModel>();
    registry.register(MODEL_TYPE, class.clone().unbind());
    m.add(MODEL_TYPE, class)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::types::PyDict;
    use pyo3::IntoPyObject;

    #[test]
    fn parse_picks_the_lookup_mode() {
        Python::with_gil(|py| {
            assert!(matches!(PortKey::parse(None).unwrap(), PortKey::Sole));

            let name = PyString::new(py, "pixels");
            let key = PortKey::parse(Some(name.as_any())).unwrap();
            assert!(matches!(key, PortKey::Name(n) if n == "pixels"));

            let index = 7i32.into_pyobject(py).unwrap();
            let key = PortKey::parse(Some(index.as_any())).unwrap();
            assert!(matches!(key, PortKey::Index(7)));

            let whole = 2.0f64.into_pyobject(py).unwrap();
            let key = PortKey::parse(Some(whole.as_any())).unwrap();
            assert!(matches!(key, PortKey::Index(2)));
        });
    }

    #[test]
    fn parse_rejects_unsupported_selectors() {
        Python::with_gil(|py| {
            let fractional = 3.14f64.into_pyobject(py).unwrap();
            let err = PortKey::parse(Some(fractional.as_any())).unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));

            let mapping = PyDict::new(py);
            let err = PortKey::parse(Some(mapping.as_any())).unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));

            let huge = (i64::from(i32::MAX) + 1).into_pyobject(py).unwrap();
            let err = PortKey::parse(Some(huge.as_any())).unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }
}
