use crate::{
    node::IdDef,
    types::{AssociationKind, Type},
};
use serde::{Deserialize, Serialize};

///
/// AssociationDef
///
/// One association declared on an entity. `mapped = true` means this
/// entity's row owns the foreign key (or, for many-to-many, this side
/// generates the link accessor); `mapped = false` is the inverse side and
/// resolves through the owning side's data, never a local column.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AssociationDef {
    pub name: String,
    pub kind: AssociationKind,
    pub target: Type,

    /// Target identifier as resolved upstream; `None` defers to the target
    /// entity's own identifier definition at resolution time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<IdDef>,

    pub mapped: bool,

    /// Resolved local foreign-key column. Naming-convention resolution
    /// happens upstream, so the model carries the final name; it defaults
    /// to the association name.
    pub column: String,
}

impl AssociationDef {
    pub fn new(name: impl Into<String>, kind: AssociationKind, target: Type) -> Self {
        let name = name.into();

        Self {
            column: name.clone(),
            name,
            kind,
            target,
            target_id: None,
            mapped: true,
        }
    }

    #[must_use]
    pub const fn mapped(mut self, mapped: bool) -> Self {
        self.mapped = mapped;
        self
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    #[must_use]
    pub fn target_id(mut self, id: IdDef) -> Self {
        self.target_id = Some(id);
        self
    }

    /// Owning to-one side: contributes a local foreign-key column.
    #[must_use]
    pub const fn is_owning_to_one(&self) -> bool {
        self.mapped && self.kind.is_to_one()
    }

    /// Inverse side: resolved via the owning side's data.
    #[must_use]
    pub const fn is_inverse(&self) -> bool {
        !self.mapped
    }
}
