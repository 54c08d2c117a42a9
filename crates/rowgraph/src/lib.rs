//! rowgraph: an object-relational materialization engine.
//!
//! ## Crate layout
//! - `schema`: entity/property/association model, graph registry, the
//!   association resolver, and model validation.
//! - `core`: runtime values and rows, the graph materializer (joined rows
//!   in, deduplicated object graph out), and the graph flattener (instance
//!   in, column assignments out).
//!
//! The `prelude` module mirrors the surface generated mapper code uses.

pub use rowgraph_core as core;
pub use rowgraph_schema as schema;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use rowgraph_core::prelude::*;
    pub use rowgraph_schema::{
        error::SchemaError,
        graph::{EntityGraph, EntityGraphs},
        node::*,
        resolve,
        types::{AssociationKind, Type},
        validate,
    };
}
