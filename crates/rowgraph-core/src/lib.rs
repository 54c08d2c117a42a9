//! Core runtime for the rowgraph engine: values, rows, converters,
//! materialization, and flattening.
//!
//! Both engine components are pure, synchronous, single-threaded
//! transformations over an immutable schema model. `materialize` consumes
//! its entire row sequence eagerly; a call either completes or fails
//! synchronously with no partial result.

pub(crate) mod coerce;

pub mod convert;
pub mod error;
pub mod flatten;
pub mod instance;
pub mod materialize;
pub mod row;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only; no engine internals.
///

pub mod prelude {
    pub use crate::{
        convert::{ConverterRegistry, ValueConverter},
        error::Error,
        flatten::{ColumnAssignment, Flattener, InverseRefs},
        instance::Instance,
        materialize::Materializer,
        row::{ColumnPresence, Row, RowRead},
        value::Value,
    };
}
