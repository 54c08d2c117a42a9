use rowgraph_schema::error::SchemaError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Engine-level failure. Model-integrity errors pass through from the
/// schema layer unchanged; coercion errors carry the entity and member
/// they were raised for. No variant is retried: all failures are
/// deterministic functions of the model and its inputs.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("entity '{entity}', member '{member}': {message}")]
    Coercion {
        entity: String,
        member: String,
        message: String,
    },

    #[error("entity '{entity}' has no inverse association named '{association}'")]
    UnknownInverse { entity: String, association: String },
}

impl Error {
    /// Construct a coercion failure for one entity member.
    pub(crate) fn coercion(
        entity: impl Into<String>,
        member: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            entity: entity.into(),
            member: member.into(),
            message: message.into(),
        }
    }
}
