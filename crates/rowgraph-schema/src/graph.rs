use crate::{node::EntityDef, types::Type};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

///
/// EntityGraph
///
/// All entities of one package/namespace, keyed by simple name in
/// registration order.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntityGraph {
    pub package: String,
    entities: IndexMap<String, EntityDef>,
}

impl EntityGraph {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            entities: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn entity(mut self, def: EntityDef) -> Self {
        self.entities.insert(def.name.clone(), def);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }
}

///
/// EntityGraphs
///
/// Root external input: every entity graph visible to one generation unit,
/// keyed by package. Read-only during materialization and flattening.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityGraphs {
    graphs: IndexMap<String, EntityGraph>,
}

impl EntityGraphs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn graph(mut self, graph: EntityGraph) -> Self {
        self.graphs.insert(graph.package.clone(), graph);
        self
    }

    /// Entity lookup by qualified type. Expected O(1); called repeatedly
    /// during resolution.
    #[must_use]
    pub fn get(&self, ty: &Type) -> Option<&EntityDef> {
        self.graphs.get(&ty.package)?.get(&ty.name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.graphs.values().flat_map(EntityGraph::entities)
    }
}
