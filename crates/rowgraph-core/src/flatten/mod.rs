//! Graph flattening: one entity instance in, ordered column assignments
//! out, for single-entity and link-table persistence.
//!
//! Emission order is fixed: identifier, scalar properties, embeddable
//! sub-columns, owned to-one associations. Inverse associations contribute
//! no local column; their related instances arrive through `InverseRefs`
//! so call sites stay explicit about every inverse side.


use crate::{coerce, convert::ConverterRegistry, error::Error, instance::Instance, value::Value};
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use rowgraph_schema::{
    graph::EntityGraphs,
    node::{AssociationDef, EntityDef, IdDef},
    resolve,
};

///
/// ColumnAssignment
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnAssignment {
    pub column: String,
    pub value: Value,
}

impl ColumnAssignment {
    pub fn new(column: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

///
/// InverseRefs
///
/// Externally supplied related instances for inverse associations. Every
/// inverse association of the entity has a slot, defaulting to none; names
/// that do not refer to an inverse association are rejected.
///

#[derive(Default)]
pub struct InverseRefs<'a> {
    refs: IndexMap<String, &'a Instance>,
}

impl<'a> InverseRefs<'a> {
    /// All inverse associations left unsupplied.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, association: &str, instance: &'a Instance) -> Self {
        self.refs.insert(association.to_string(), instance);
        self
    }

    #[must_use]
    pub fn get(&self, association: &str) -> Option<&'a Instance> {
        self.refs.get(association).copied()
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.refs.keys().map(String::as_str)
    }
}

///
/// Flattener
///
/// Per-entity flattening surface. Construction performs the same
/// model-integrity fast-fail as the materializer, scoped to this entity's
/// own declarations.
///

pub struct Flattener<'a> {
    entity: &'a EntityDef,
    graphs: &'a EntityGraphs,
    converters: &'a ConverterRegistry,
}

impl<'a> Flattener<'a> {
    pub fn new(
        entity: &'a EntityDef,
        graphs: &'a EntityGraphs,
        converters: &'a ConverterRegistry,
    ) -> Result<Self, Error> {
        entity.identifier()?;
        for assoc in &entity.associations {
            resolve::resolve_target(assoc, graphs)?;
            if assoc.is_owning_to_one() {
                resolve::target_id(assoc, graphs)?;
            }
        }

        Ok(Self {
            entity,
            graphs,
            converters,
        })
    }

    /// Flatten one instance into column assignments for single-entity
    /// persistence.
    pub fn from_instance(
        &self,
        instance: &Instance,
        inverse: &InverseRefs<'_>,
    ) -> Result<Vec<ColumnAssignment>, Error> {
        self.check_inverse_names(inverse)?;

        let mut out = Vec::new();

        // Identifier: a generated value must not be asserted on insert.
        let id = self.entity.identifier()?;
        if !id.generated {
            out.push(ColumnAssignment::new(
                id.column.clone(),
                self.stored_id(&self.entity.name, id, instance.get(&id.name))?,
            ));
        }

        // Scalar properties.
        for property in &self.entity.properties {
            let value = instance.get(&property.name).unwrap_or(&Value::Null);
            let stored = coerce::stored_value(
                &self.entity.name,
                &property.name,
                value,
                property.converter.as_ref(),
                property.enumerated.as_ref(),
                self.converters,
            )?;
            out.push(ColumnAssignment::new(property.column.clone(), stored));
        }

        // Embeddables: an absent value object omits every sub-assignment.
        for embeddable in &self.entity.embeddables {
            let value = instance.get(&embeddable.name).unwrap_or(&Value::Null);
            if value.is_null() {
                continue;
            }
            if !matches!(value, Value::Composite(_)) {
                return Err(Error::coercion(
                    &self.entity.name,
                    &embeddable.name,
                    format!("embeddable value must be composite, got {value}"),
                ));
            }
            for sub in &embeddable.properties {
                let field = value.field(&sub.name).unwrap_or(&Value::Null);
                let stored = coerce::stored_value(
                    &self.entity.name,
                    &sub.name,
                    field,
                    sub.converter.as_ref(),
                    sub.enumerated.as_ref(),
                    self.converters,
                )?;
                out.push(ColumnAssignment::new(sub.column.clone(), stored));
            }
        }

        // Owned to-one associations: the target's identifier lands in the
        // local foreign-key column. Inverse sides and many-to-many
        // contribute nothing here.
        for assoc in &self.entity.associations {
            if !assoc.is_owning_to_one() {
                continue;
            }
            let target_id = resolve::target_id(assoc, self.graphs)?;
            let value = match instance.one(&assoc.name) {
                Some(related) => {
                    self.stored_id(&self.entity.name, target_id, related.get(&target_id.name))?
                }
                None => Value::Null,
            };
            out.push(ColumnAssignment::new(assoc.column.clone(), value));
        }

        Ok(out)
    }

    /// Column assignments for one many-to-many link row: each side's
    /// identifier into the link row's foreign-key column. A side whose
    /// identifier is nullable and unset is omitted rather than writing a
    /// null key.
    pub fn link(
        &self,
        left: &Instance,
        right: &Instance,
        assoc: &AssociationDef,
    ) -> Result<Vec<ColumnAssignment>, Error> {
        let target = resolve::resolve_target(assoc, self.graphs)?;

        let mut out = Vec::with_capacity(2);
        for (entity, instance) in [(self.entity, left), (target, right)] {
            let id = entity.identifier()?;
            let value = self.stored_id(&entity.name, id, instance.get(&id.name))?;
            if id.nullable && value.is_null() {
                continue;
            }
            out.push(ColumnAssignment::new(link_column(entity, id), value));
        }

        Ok(out)
    }

    fn stored_id(&self, entity: &str, id: &IdDef, value: Option<&Value>) -> Result<Value, Error> {
        let value = value.unwrap_or(&Value::Null);

        coerce::stored_value(
            entity,
            &id.name,
            value,
            id.converter.as_ref(),
            None,
            self.converters,
        )
    }

    fn check_inverse_names(&self, inverse: &InverseRefs<'_>) -> Result<(), Error> {
        for name in inverse.names() {
            let known = self
                .entity
                .get_association(name)
                .is_some_and(AssociationDef::is_inverse);
            if !known {
                return Err(Error::UnknownInverse {
                    entity: self.entity.name.clone(),
                    association: name.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Link-row foreign-key column for one side: camel-cased entity name plus
/// Pascal-cased identifier name (`Customer`/`id` -> `customerId`).
fn link_column(entity: &EntityDef, id: &IdDef) -> String {
    format!(
        "{}{}",
        entity.name.to_case(Case::Camel),
        id.name.to_case(Case::Pascal)
    )
}
