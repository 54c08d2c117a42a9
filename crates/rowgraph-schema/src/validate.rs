//! Model validation in a staged, deterministic order.
//!
//! Phase 1 checks each entity's local invariants; phase 2 checks the
//! association edges that need a full graph view. Both fail fast: a bad
//! model aborts before any materialization or flattening starts.

use crate::{
    error::SchemaError,
    graph::EntityGraphs,
    node::EntityDef,
    resolve::{resolve_target, target_id},
};
use std::collections::BTreeSet;

/// Run full model validation.
pub fn validate(graphs: &EntityGraphs) -> Result<(), SchemaError> {
    for entity in graphs.entities() {
        validate_entity(entity)?;
    }
    for entity in graphs.entities() {
        validate_associations(entity, graphs)?;
    }

    Ok(())
}

/// Local invariants: exactly one identifier, unique member names.
pub fn validate_entity(entity: &EntityDef) -> Result<(), SchemaError> {
    entity.identifier()?;

    let mut seen = BTreeSet::new();
    for name in entity.member_names() {
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateMember {
                entity: entity.name.clone(),
                member: name.to_string(),
            });
        }
    }

    Ok(())
}

// Graph-wide invariants: every target registered, every owned to-one
// association's target identifier known before materialization.
fn validate_associations(entity: &EntityDef, graphs: &EntityGraphs) -> Result<(), SchemaError> {
    for assoc in &entity.associations {
        resolve_target(assoc, graphs)?;

        if assoc.is_owning_to_one() {
            target_id(assoc, graphs)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::EntityGraph,
        node::{AssociationDef, IdDef, PropertyDef},
        types::{AssociationKind, Type},
    };

    fn entity(name: &str) -> EntityDef {
        EntityDef::new(Type::new("shop", name)).id(IdDef::new("id", Type::new("std", "i64")))
    }

    fn graphs_of(entities: Vec<EntityDef>) -> EntityGraphs {
        let mut graph = EntityGraph::new("shop");
        for e in entities {
            graph = graph.entity(e);
        }

        EntityGraphs::new().graph(graph)
    }

    #[test]
    fn entity_without_identifier_is_rejected() {
        let no_id = EntityDef::new(Type::new("shop", "Orphan"));

        assert_eq!(
            validate_entity(&no_id),
            Err(SchemaError::missing_id("Orphan"))
        );
    }

    #[test]
    fn duplicate_member_names_are_rejected() {
        let dup = entity("Customer")
            .property(PropertyDef::new("name", Type::new("std", "String")))
            .association(AssociationDef::new(
                "name",
                AssociationKind::ManyToOne,
                Type::new("shop", "Customer"),
            ));

        assert!(matches!(
            validate_entity(&dup),
            Err(SchemaError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn dangling_association_target_fails_validation() {
        let customer = entity("Customer").association(AssociationDef::new(
            "orders",
            AssociationKind::OneToMany,
            Type::new("shop", "Order"),
        ));

        assert!(matches!(
            validate(&graphs_of(vec![customer])),
            Err(SchemaError::EntityNotMapped { .. })
        ));
    }

    #[test]
    fn owned_to_one_without_target_identifier_fails_validation() {
        let profile = EntityDef::new(Type::new("shop", "Profile"));
        let customer = entity("Customer").association(AssociationDef::new(
            "profile",
            AssociationKind::OneToOne,
            Type::new("shop", "Profile"),
        ));

        // Profile has no identifier, so the owned side cannot join on it.
        let graphs = EntityGraphs::new()
            .graph(EntityGraph::new("shop").entity(customer).entity(profile));

        assert_eq!(
            validate_associations_only(&graphs),
            Err(SchemaError::missing_id("Profile"))
        );
    }

    // Run only the graph-wide phase so the intentionally invalid target
    // entity does not trip the local phase first.
    fn validate_associations_only(graphs: &EntityGraphs) -> Result<(), SchemaError> {
        for entity in graphs.entities() {
            super::validate_associations(entity, graphs)?;
        }

        Ok(())
    }

    #[test]
    fn valid_model_passes() {
        let customer = entity("Customer").association(
            AssociationDef::new("orders", AssociationKind::OneToMany, Type::new("shop", "Order"))
                .mapped(false),
        );
        let order = entity("Order").association(AssociationDef::new(
            "customer",
            AssociationKind::ManyToOne,
            Type::new("shop", "Customer"),
        ));

        assert_eq!(validate(&graphs_of(vec![customer, order])), Ok(()));
    }
}
