//! Schema nodes: plain data definitions, one node family per file.

mod association;
mod converter;
mod embeddable;
mod entity;
mod id;
mod property;

pub use association::AssociationDef;
pub use converter::ConverterDef;
pub use embeddable::EmbeddableDef;
pub use entity::EntityDef;
pub use id::IdDef;
pub use property::{EnumMapping, EnumStorage, PropertyDef};
