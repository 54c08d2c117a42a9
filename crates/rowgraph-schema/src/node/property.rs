use crate::{node::ConverterDef, types::Type};
use serde::{Deserialize, Serialize};

///
/// PropertyDef
///
/// A scalar column on an entity or on an embeddable value object.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PropertyDef {
    pub name: String,
    pub column: String,
    pub ty: Type,
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<ConverterDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerated: Option<EnumMapping>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();

        Self {
            column: name.clone(),
            name,
            ty,
            nullable: false,
            converter: None,
            enumerated: None,
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
    pub fn converter(mut self, converter: ConverterDef) -> Self {
        self.converter = Some(converter);
        self
    }

    #[must_use]
    pub fn enumerated(mut self, mapping: EnumMapping) -> Self {
        self.enumerated = Some(mapping);
        self
    }
}

///
/// EnumMapping
///
/// Declarative enumeration coercion: the ordered variant names plus the
/// stored representation. Carrying the variant list keeps ordinal storage
/// invertible in both engine directions.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumMapping {
    pub variants: Vec<String>,
    pub stored: EnumStorage,
}

impl EnumMapping {
    pub fn new<I, S>(variants: I, stored: EnumStorage) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants.into_iter().map(Into::into).collect(),
            stored,
        }
    }

    /// Variant name for a stored ordinal, if in range.
    #[must_use]
    pub fn name_of(&self, ordinal: usize) -> Option<&str> {
        self.variants.get(ordinal).map(String::as_str)
    }

    /// Stored ordinal for a variant name, if declared.
    #[must_use]
    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v == name)
    }
}

///
/// EnumStorage
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum EnumStorage {
    #[default]
    Name,
    Ordinal,
}
