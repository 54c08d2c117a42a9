use crate::types::Type;
use serde::{Deserialize, Serialize};

///
/// ConverterDef
///
/// Named value converter and the stored type it converts to and from.
/// The engine only ever checks for presence; converter internals stay
/// opaque and are supplied at runtime through the converter registry.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConverterDef {
    pub name: String,
    pub stored: Type,
}

impl ConverterDef {
    pub fn new(name: impl Into<String>, stored: Type) -> Self {
        Self {
            name: name.into(),
            stored,
        }
    }
}
