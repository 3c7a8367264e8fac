//! Python bindings for the inference-core model representation.
//!
//! All graph engineering lives in the `inference-core` crate; this is a thin
//! adapter layer that wraps engine handles into Python objects and translates
//! query results across the binding boundary.

use pyo3::prelude::*;

pub mod model;
pub mod port;
pub mod registry;

pub use model::PyModel;
pub use port::PyPort;
pub use registry::TypeRegistry;

/// Native extension module entry point.
///
/// Builds the type registry, registers every class into it, and stashes the
/// registry in module state so wrap factories can reach it later.
#[pymodule]
fn inference_bridge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let registry = Bound::new(m.py(), TypeRegistry::new())?;
    model::init(m, &mut registry.borrow_mut())?;
    port::init(m)?;
    m.add("_types", &registry)?;
    Ok(())
}
