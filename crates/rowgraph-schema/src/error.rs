use crate::types::Type;
use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Model-integrity and metadata-resolution failures. All variants are
/// deterministic functions of the model; none is recoverable at the point
/// of detection, so callers abort the enclosing transformation unit.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("converter '{converter}' is not registered")]
    ConverterTypeNotFound { converter: String },

    #[error("entity '{entity}' declares duplicate member '{member}'")]
    DuplicateMember { entity: String, member: String },

    #[error("element type '{element}' is not known to the model")]
    ElementTypeNotFound { element: String },

    #[error("entity '{entity}' is not mapped in package '{package}'")]
    EntityNotMapped { entity: String, package: String },

    #[error("entity '{entity}' has no identifier definition")]
    MissingId { entity: String },
}

impl SchemaError {
    /// Construct an `EntityNotMapped` error for an unresolved target type.
    pub fn not_mapped(ty: &Type) -> Self {
        Self::EntityNotMapped {
            entity: ty.name.clone(),
            package: ty.package.clone(),
        }
    }

    /// Construct a `MissingId` error for the named entity.
    pub fn missing_id(entity: impl Into<String>) -> Self {
        Self::MissingId {
            entity: entity.into(),
        }
    }
}
