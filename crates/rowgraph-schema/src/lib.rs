//! Schema model and association resolution for the rowgraph engine.
//!
//! The model is built once per generation run and is immutable afterwards;
//! the materializer and flattener in `rowgraph-core` treat it as a read-only
//! reference for the lifetime of a single transformation call.

pub mod error;
pub mod graph;
pub mod node;
pub mod resolve;
pub mod types;
pub mod validate;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::SchemaError,
        graph::{EntityGraph, EntityGraphs},
        node::*,
        types::{AssociationKind, Type},
    };
    pub use serde::{Deserialize, Serialize};
}
