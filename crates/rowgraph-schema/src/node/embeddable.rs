use crate::{node::PropertyDef, types::Type};
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

///
/// EmbeddableDef
///
/// Embedded value object on an owning entity. Each sub-property carries its
/// flattened column name: the embeddable's property name concatenated with
/// the capitalized sub-property name. Generated column identifiers derive
/// from this, so the concatenation is a contract, not a convention.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EmbeddableDef {
    pub name: String,
    pub ty: Type,
    pub nullable: bool,
    pub properties: Vec<PropertyDef>,
}

impl EmbeddableDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Add a sub-property, rewriting its column to the flattened name.
    #[must_use]
    pub fn property(mut self, property: PropertyDef) -> Self {
        let column = self.flattened_column(&property.name);
        self.properties.push(property.column(column));
        self
    }

    /// Flattened column name for a sub-property of this embeddable.
    #[must_use]
    pub fn flattened_column(&self, sub_property: &str) -> String {
        format!("{}{}", self.name, sub_property.to_case(Case::Pascal))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}
