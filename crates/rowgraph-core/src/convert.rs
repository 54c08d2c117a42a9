use crate::value::Value;
use indexmap::IndexMap;
use rowgraph_schema::{error::SchemaError, node::ConverterDef};

///
/// ValueConverter
///
/// Runtime counterpart of a `ConverterDef`: transforms between the
/// in-memory (entity) representation and the stored column representation.
/// A property or identifier carrying a converter is always read and written
/// through it; the engine never inspects converter internals.
///

pub trait ValueConverter {
    fn to_entity(&self, stored: &Value) -> Value;
    fn to_stored(&self, entity: &Value) -> Value;
}

///
/// ConverterRegistry
///
/// Name-keyed converter lookup consulted during materialization and
/// flattening. A `ConverterDef` whose name is not registered fails with
/// `ConverterTypeNotFound`.
///

#[derive(Default)]
pub struct ConverterRegistry {
    converters: IndexMap<String, Box<dyn ValueConverter>>,
}

impl ConverterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, converter: impl ValueConverter + 'static) {
        self.converters.insert(name.into(), Box::new(converter));
    }

    pub fn get(&self, def: &ConverterDef) -> Result<&dyn ValueConverter, SchemaError> {
        self.converters
            .get(&def.name)
            .map(Box::as_ref)
            .ok_or_else(|| SchemaError::ConverterTypeNotFound {
                converter: def.name.clone(),
            })
    }
}
