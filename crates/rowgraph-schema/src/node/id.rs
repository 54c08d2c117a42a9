use crate::{node::ConverterDef, types::Type};
use serde::{Deserialize, Serialize};

///
/// IdDef
///
/// Identifier definition for an entity. Exactly one per valid entity.
/// Composite identifiers are a single `IdDef` whose declared type is a
/// composite value type; the engine never special-cases multi-column keys
/// and only requires the runtime value to be equality-comparable and
/// hashable.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdDef {
    pub name: String,
    pub column: String,
    pub ty: Type,
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<ConverterDef>,

    /// True when the persistence target assigns the value; a generated
    /// identifier must not be asserted by the caller on insert.
    pub generated: bool,
}

impl IdDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();

        Self {
            column: name.clone(),
            name,
            ty,
            nullable: false,
            converter: None,
            generated: false,
        }
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub const fn generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }

    #[must_use]
    pub fn converter(mut self, converter: ConverterDef) -> Self {
        self.converter = Some(converter);
        self
    }
}
