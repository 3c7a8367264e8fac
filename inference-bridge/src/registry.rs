//! Type registration shared between module init and the wrap factories.

use std::collections::HashMap;

use pyo3::prelude::*;
use pyo3::types::PyType;

/// Maps a type identity to the Python constructor registered for it.
///
/// One instance is created at module initialization and stored in module
/// state; tests create their own isolated instances instead of sharing a
/// process-wide table. Registering the same identity twice overwrites the
/// earlier constructor.
#[pyclass]
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, Py<PyType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `constructor` under `type_name`, replacing any earlier entry.
    pub fn register(&mut self, type_name: &str, constructor: Py<PyType>) {
        self.types.insert(type_name.to_string(), constructor);
    }

    /// Constructor registered for `type_name`, if any.
    pub fn constructor(&self, type_name: &str) -> Option<&Py<PyType>> {
        self.types.get(type_name)
    }
}
