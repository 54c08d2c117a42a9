//! Graph materialization: a flat, possibly redundant sequence of joined
//! rows in, a deduplicated and internally consistent object graph out.
//!
//! One pass over the rows suffices: per-entity identity maps collapse
//! join-induced duplication, to-many accumulators have set semantics keyed
//! by identifier, and inverse associations consult a memoized full
//! materialization of their target entity over the same row sequence. An
//! explicit visiting set guarantees termination on cyclic bidirectional
//! schemas.

#[cfg(test)]
mod tests;

use crate::{
    coerce,
    convert::ConverterRegistry,
    error::Error,
    instance::Instance,
    row::RowRead,
    value::Value,
};
use indexmap::IndexMap;
use rowgraph_schema::{
    graph::EntityGraphs,
    node::{AssociationDef, EntityDef, IdDef},
    resolve,
};
use std::collections::BTreeSet;

///
/// Materializer
///
/// Per-entity materialization surface: `to_map`, `to_list`, `to_instance`.
/// Construction runs every model-integrity check over the association
/// closure, so a bad model fails before any row is read.
///

pub struct Materializer<'a> {
    root: &'a EntityDef,
    graphs: &'a EntityGraphs,
    converters: &'a ConverterRegistry,
}

impl<'a> Materializer<'a> {
    pub fn new(
        root: &'a EntityDef,
        graphs: &'a EntityGraphs,
        converters: &'a ConverterRegistry,
    ) -> Result<Self, Error> {
        let mut visited = BTreeSet::new();
        check_closure(root, graphs, &mut visited)?;

        Ok(Self {
            root,
            graphs,
            converters,
        })
    }

    /// Materialize the full map: root identifier -> fully-populated root
    /// instance, in first-seen order of root identifiers.
    pub fn to_map<R: RowRead>(&self, rows: &[R]) -> Result<IndexMap<Value, Instance>, Error> {
        let mut pass = Pass::new(self.graphs, self.converters, rows);

        pass.entity_map(self.root)
    }

    /// The map's values in insertion order.
    pub fn to_list<R: RowRead>(&self, rows: &[R]) -> Result<Vec<Instance>, Error> {
        Ok(self.to_map(rows)?.into_values().collect())
    }

    /// Singular-row variant: `None` when the row misses the root
    /// identifier (outer-join miss).
    pub fn to_instance<R: RowRead>(&self, row: &R) -> Result<Option<Instance>, Error> {
        let map = self.to_map(std::slice::from_ref(row))?;

        Ok(map.into_values().next())
    }
}

// Walk the association closure: every reachable entity needs an identifier
// to key its identity map, every target must resolve, and every owned
// to-one association's target identifier must be known.
fn check_closure(
    entity: &EntityDef,
    graphs: &EntityGraphs,
    visited: &mut BTreeSet<String>,
) -> Result<(), Error> {
    if !visited.insert(entity.ty.qualified()) {
        return Ok(());
    }

    entity.identifier()?;
    for assoc in &entity.associations {
        let target = resolve::resolve_target(assoc, graphs)?;
        if assoc.is_owning_to_one() {
            resolve::target_id(assoc, graphs)?;
        }
        check_closure(target, graphs, visited)?;
    }

    Ok(())
}

///
/// AssociationPlan
///
/// One association of the entity being materialized, with its target,
/// join identifier, and to-one back-reference resolved up front.
///

struct AssociationPlan<'a> {
    def: &'a AssociationDef,
    target: &'a EntityDef,
    target_id: &'a IdDef,
    back: Option<&'a AssociationDef>,
}

fn plan_associations<'a>(
    entity: &'a EntityDef,
    graphs: &'a EntityGraphs,
) -> Result<Vec<AssociationPlan<'a>>, Error> {
    entity
        .associations
        .iter()
        .map(|def| {
            let target = resolve::resolve_target(def, graphs)?;
            let target_id = resolve::target_id(def, graphs)?;
            // Back-reference patch-up substitutes a single field, so only
            // a to-one back side qualifies.
            let back =
                resolve::back_reference(entity, def, graphs)?.filter(|b| b.kind.is_to_one());

            Ok(AssociationPlan {
                def,
                target,
                target_id,
                back,
            })
        })
        .collect()
}

///
/// Pass
///
/// State for one materialization call: the memoized per-entity full maps
/// and the visiting set that guards cyclic schemas. Scoped per invocation,
/// never shared.
///

struct Pass<'a, R> {
    graphs: &'a EntityGraphs,
    converters: &'a ConverterRegistry,
    rows: &'a [R],
    memo: IndexMap<String, IndexMap<Value, Instance>>,
    visiting: BTreeSet<String>,
}

impl<'a, R: RowRead> Pass<'a, R> {
    fn new(
        graphs: &'a EntityGraphs,
        converters: &'a ConverterRegistry,
        rows: &'a [R],
    ) -> Self {
        Self {
            graphs,
            converters,
            rows,
            memo: IndexMap::new(),
            visiting: BTreeSet::new(),
        }
    }

    /// The full materialized map for one entity, memoized for the
    /// remainder of the enclosing call.
    fn entity_map(&mut self, entity: &'a EntityDef) -> Result<IndexMap<Value, Instance>, Error> {
        let key = entity.ty.qualified();
        if let Some(done) = self.memo.get(&key) {
            return Ok(done.clone());
        }

        self.visiting.insert(key.clone());
        let result = self.entity_map_inner(entity);
        self.visiting.remove(&key);

        let map = result?;
        self.memo.insert(key, map.clone());

        Ok(map)
    }

    fn entity_map_inner(
        &mut self,
        entity: &'a EntityDef,
    ) -> Result<IndexMap<Value, Instance>, Error> {
        let id = entity.identifier()?;
        let plans = plan_associations(entity, self.graphs)?;

        // Materialize inverse targets first (memoized). A target already
        // on the visiting stack is a cycle; its members fall back to
        // shallow row builds below instead of re-entering.
        for plan in &plans {
            if plan.def.is_inverse() && !self.visiting.contains(&plan.target.ty.qualified()) {
                self.entity_map(plan.target)?;
            }
        }

        let rows = self.rows;
        let mut identity: IndexMap<Value, Instance> = IndexMap::new();
        let mut shallow_cache: IndexMap<String, IndexMap<Value, Instance>> = IndexMap::new();
        let mut to_one_acc: Vec<IndexMap<Value, Instance>> =
            plans.iter().map(|_| IndexMap::new()).collect();
        let mut to_many_acc: Vec<IndexMap<Value, IndexMap<Value, Instance>>> =
            plans.iter().map(|_| IndexMap::new()).collect();

        for row in rows {
            // Rows with no root identifier are outer-join misses.
            let Some(root_id) = self.read_id(entity, id, row)? else {
                continue;
            };

            if !identity.contains_key(&root_id) {
                let base = self.build_base(entity, row)?;
                identity.insert(root_id.clone(), base);
            }

            for (i, plan) in plans.iter().enumerate() {
                let Some(child_id) = self.read_id(plan.target, plan.target_id, row)? else {
                    continue;
                };

                let child = if plan.def.is_inverse() {
                    // Inverse side: consult the target's own full map.
                    match self
                        .memo
                        .get(&plan.target.ty.qualified())
                        .and_then(|map| map.get(&child_id))
                    {
                        Some(full) => full.clone(),
                        None => self.shallow_child(plan.target, &child_id, row, &mut shallow_cache)?,
                    }
                } else {
                    self.shallow_child(plan.target, &child_id, row, &mut shallow_cache)?
                };

                if plan.def.kind.is_to_many() {
                    // Set semantics by identifier: duplicates are no-ops.
                    to_many_acc[i]
                        .entry(root_id.clone())
                        .or_default()
                        .entry(child_id)
                        .or_insert(child);
                } else {
                    // A to-one join cannot legitimately vary per row for
                    // the same root; last writer wins.
                    to_one_acc[i].insert(root_id.clone(), child);
                }
            }
        }

        // Reconstruct each root with its association fields populated.
        let mut result = IndexMap::with_capacity(identity.len());
        for (root_id, base) in identity {
            let back_root = base.shallow();
            let mut instance = base;

            for (i, plan) in plans.iter().enumerate() {
                if plan.def.kind.is_to_many() {
                    let children: Vec<Instance> = to_many_acc[i]
                        .get(&root_id)
                        .map(|set| set.values().cloned().collect())
                        .unwrap_or_default();
                    instance.set_to_many(&plan.def.name, patch_back(children, plan, &back_root));
                } else {
                    let child = to_one_acc[i]
                        .get(&root_id)
                        .cloned()
                        .map(|child| patch_back_one(child, plan, &back_root));
                    instance.set_to_one(&plan.def.name, child);
                }
            }

            result.insert(root_id, instance);
        }

        Ok(result)
    }

    /// Read an entity's identifier off a row; `None` when the column is
    /// absent or null.
    fn read_id(&self, entity: &EntityDef, id: &IdDef, row: &R) -> Result<Option<Value>, Error> {
        let Some(stored) = row.column(&entity.name, &id.column).get() else {
            return Ok(None);
        };
        if stored.is_null() {
            return Ok(None);
        }
        let value = coerce::entity_value(
            &entity.name,
            &id.name,
            stored,
            id.converter.as_ref(),
            None,
            self.converters,
        )?;

        Ok(Some(value))
    }

    /// Build an instance's scalar and embedded fields from one row;
    /// association fields are populated at finalization.
    fn build_base(&self, entity: &EntityDef, row: &R) -> Result<Instance, Error> {
        let mut instance = Instance::new(entity.name.clone());

        let id = entity.identifier()?;
        if let Some(value) = self.read_id(entity, id, row)? {
            instance.set_value(&id.name, value);
        }

        for property in &entity.properties {
            if let Some(stored) = row.column(&entity.name, &property.column).get() {
                let value = coerce::entity_value(
                    &entity.name,
                    &property.name,
                    stored,
                    property.converter.as_ref(),
                    property.enumerated.as_ref(),
                    self.converters,
                )?;
                instance.set_value(&property.name, value);
            }
        }

        for embeddable in &entity.embeddables {
            let mut fields = Vec::with_capacity(embeddable.properties.len());
            let mut any_present = false;

            for sub in &embeddable.properties {
                match row.column(&entity.name, &sub.column).get() {
                    Some(stored) if !stored.is_null() => {
                        any_present = true;
                        let value = coerce::entity_value(
                            &entity.name,
                            &sub.name,
                            stored,
                            sub.converter.as_ref(),
                            sub.enumerated.as_ref(),
                            self.converters,
                        )?;
                        fields.push((sub.name.clone(), value));
                    }
                    _ => fields.push((sub.name.clone(), Value::Null)),
                }
            }

            // An embeddable with no present sub-column materializes as an
            // absent value object, not a composite of nulls.
            let value = if any_present {
                Value::Composite(fields)
            } else {
                Value::Null
            };
            instance.set_value(&embeddable.name, value);
        }

        Ok(instance)
    }

    /// Build (or reuse) a target instance from the current row's columns,
    /// deduplicated by identifier per target entity.
    fn shallow_child(
        &self,
        target: &EntityDef,
        child_id: &Value,
        row: &R,
        cache: &mut IndexMap<String, IndexMap<Value, Instance>>,
    ) -> Result<Instance, Error> {
        let per_entity = cache.entry(target.ty.qualified()).or_default();
        if let Some(existing) = per_entity.get(child_id) {
            return Ok(existing.clone());
        }

        let built = self.build_base(target, row)?;
        per_entity.insert(child_id.clone(), built.clone());

        Ok(built)
    }
}

// Bidirectional patch-up: rewrite each member's back-pointer to reference
// the materialized root. Value substitution only, never a re-entrant
// materialization call.
fn patch_back(
    mut children: Vec<Instance>,
    plan: &AssociationPlan<'_>,
    back_root: &Instance,
) -> Vec<Instance> {
    if let Some(back) = plan.back {
        for child in &mut children {
            child.set_to_one(&back.name, Some(back_root.clone()));
        }
    }

    children
}

fn patch_back_one(
    mut child: Instance,
    plan: &AssociationPlan<'_>,
    back_root: &Instance,
) -> Instance {
    if let Some(back) = plan.back {
        child.set_to_one(&back.name, Some(back_root.clone()));
    }

    child
}
