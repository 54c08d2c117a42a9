use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Type
///
/// Qualified value-type reference: package/namespace qualifier plus simple
/// name. Immutable; used for graph lookups and code-shape decisions, never
/// for runtime behavior.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Type {
    pub package: String,
    pub name: String,
}

impl Type {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}::{}", self.package, self.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.package, self.name)
    }
}

///
/// AssociationKind
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
#[remain::sorted]
pub enum AssociationKind {
    ManyToMany,
    ManyToOne,
    OneToMany,
    OneToOne,
}

impl AssociationKind {
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::ManyToMany | Self::OneToMany)
    }

    #[must_use]
    pub const fn is_to_one(self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOne)
    }
}
