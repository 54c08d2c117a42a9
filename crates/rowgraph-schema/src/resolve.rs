//! Association resolution: pure, side-effect-free queries over the graphs.
//!
//! These are called repeatedly during materializer/flattener setup, so every
//! query bottoms out in the O(1)-expected registry lookup of `EntityGraphs`.

use crate::{
    error::SchemaError,
    graph::EntityGraphs,
    node::{AssociationDef, EntityDef, IdDef},
};

/// Resolve an association's target entity.
///
/// Fails with `EntityNotMapped` when the target's package is absent from
/// the graph set or the target type is not registered within it.
pub fn resolve_target<'a>(
    assoc: &AssociationDef,
    graphs: &'a EntityGraphs,
) -> Result<&'a EntityDef, SchemaError> {
    graphs
        .get(&assoc.target)
        .ok_or_else(|| SchemaError::not_mapped(&assoc.target))
}

/// The identifier the association joins on: the association's own target-id
/// override when the upstream builder resolved one, otherwise the target
/// entity's identifier.
pub fn target_id<'a>(
    assoc: &'a AssociationDef,
    graphs: &'a EntityGraphs,
) -> Result<&'a IdDef, SchemaError> {
    if let Some(id) = &assoc.target_id {
        return Ok(id);
    }

    resolve_target(assoc, graphs)?.identifier()
}

/// The target's owning association pointing back at `source`, if any.
///
/// An association is bidirectional iff the target entity declares an
/// association back to the source entity that is itself `mapped = true`.
pub fn back_reference<'a>(
    source: &EntityDef,
    assoc: &AssociationDef,
    graphs: &'a EntityGraphs,
) -> Result<Option<&'a AssociationDef>, SchemaError> {
    let target = resolve_target(assoc, graphs)?;

    Ok(target
        .associations
        .iter()
        .find(|back| back.mapped && back.target == source.ty))
}

/// Whether the association has a mapped back-reference on its target.
pub fn is_bidirectional(
    source: &EntityDef,
    assoc: &AssociationDef,
    graphs: &EntityGraphs,
) -> Result<bool, SchemaError> {
    back_reference(source, assoc, graphs).map(|back| back.is_some())
}
