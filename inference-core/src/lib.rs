//! Engine-side model representation queried by the host bindings.
//!
//! The binding crates never construct, mutate, or execute models; they only
//! read names and port descriptors through the query surface in [`model`].

pub mod model;
