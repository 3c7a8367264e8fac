use std::sync::Arc;

use inference_bridge::model::MODEL_TYPE;
use inference_bridge::{PyModel, TypeRegistry};
use inference_core::model::{DType, Model, Port};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

fn sample_model() -> Model {
    Model::new(
        "resnet",
        vec![Port::new("data", vec![1, 3, 224, 224], DType::F32)],
        vec![Port::new("prob", vec![1, 1000], DType::F32)],
    )
}

fn registered(py: Python<'_>) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register(MODEL_TYPE, py.get_type::<PyModel>().unbind());
    registry
}

#[test]
fn wrap_before_registration_raises_initialization_error() {
    Python::with_gil(|py| {
        let registry = TypeRegistry::new();
        let err = PyModel::wrap(py, &registry, Arc::new(sample_model())).unwrap_err();
        assert!(err.is_instance_of::<PyRuntimeError>(py));
    });
}

#[test]
fn register_then_wrap_succeeds() {
    Python::with_gil(|py| {
        let registry = registered(py);
        let model = PyModel::wrap(py, &registry, Arc::new(sample_model())).unwrap();
        let name: String = model
            .bind(py)
            .as_any()
            .call_method0("getName")
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(name, "resnet");
    });
}

#[test]
fn re_registration_overwrites_silently() {
    Python::with_gil(|py| {
        let mut registry = registered(py);
        registry.register(MODEL_TYPE, py.get_type::<PyModel>().unbind());
        let model = PyModel::wrap(py, &registry, Arc::new(sample_model()));
        assert!(model.is_ok());
    });
}

#[test]
fn unbound_instance_accessors_raise() {
    Python::with_gil(|py| {
        let obj = Bound::new(py, PyModel::new()).unwrap();
        for accessor in ["getName", "input", "output"] {
            let err = obj.as_any().call_method0(accessor).unwrap_err();
            assert!(err.is_instance_of::<PyRuntimeError>(py));
        }
        let err = obj.as_any().getattr("inputs").unwrap_err();
        assert!(err.is_instance_of::<PyRuntimeError>(py));
    });
}

#[test]
fn each_wrapped_instance_holds_one_reference() {
    Python::with_gil(|py| {
        let registry = registered(py);
        let handle = Arc::new(sample_model());

        let first = PyModel::wrap(py, &registry, handle.clone())
            .unwrap()
            .into_bound(py);
        let second = PyModel::wrap(py, &registry, handle.clone())
            .unwrap()
            .into_bound(py);
        assert_eq!(Arc::strong_count(&handle), 3);

        // both instances answer from the same underlying model
        let a: String = first.as_any().call_method0("getName").unwrap().extract().unwrap();
        let b: String = second.as_any().call_method0("getName").unwrap().extract().unwrap();
        assert_eq!(a, b);

        drop(first);
        assert_eq!(Arc::strong_count(&handle), 2);
        drop(second);
        assert_eq!(Arc::strong_count(&handle), 1);
    });
}
