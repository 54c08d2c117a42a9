use crate::{
    error::SchemaError,
    node::{AssociationDef, EmbeddableDef, IdDef, PropertyDef},
    types::Type,
};
use serde::{Deserialize, Serialize};

///
/// EntityDef
///
/// One entity: identifier, ordered scalar properties, embeddables, and
/// associations. The identifier is optional only so that integrity
/// validation has something to reject; a valid entity has exactly one.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityDef {
    pub name: String,
    pub ty: Type,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdDef>,

    pub properties: Vec<PropertyDef>,
    pub embeddables: Vec<EmbeddableDef>,
    pub associations: Vec<AssociationDef>,
}

impl EntityDef {
    pub fn new(ty: Type) -> Self {
        Self {
            name: ty.name.clone(),
            ty,
            id: None,
            properties: Vec::new(),
            embeddables: Vec::new(),
            associations: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(mut self, id: IdDef) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn embeddable(mut self, embeddable: EmbeddableDef) -> Self {
        self.embeddables.push(embeddable);
        self
    }

    #[must_use]
    pub fn association(mut self, association: AssociationDef) -> Self {
        self.associations.push(association);
        self
    }

    /// The identifier definition, or `MissingId` when the entity has none.
    pub fn identifier(&self) -> Result<&IdDef, SchemaError> {
        self.id
            .as_ref()
            .ok_or_else(|| SchemaError::missing_id(&self.name))
    }

    #[must_use]
    pub fn get_association(&self, name: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// All member names in declaration order (identifier excluded).
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.embeddables.iter().map(|e| e.name.as_str()))
            .chain(self.associations.iter().map(|a| a.name.as_str()))
    }
}
