//! Shared shop model used by the materializer and flattener suites:
//! Customer 1-n Order (bidirectional), Customer n-m Product.

use crate::{
    convert::{ConverterRegistry, ValueConverter},
    value::Value,
};
use rowgraph_schema::{
    graph::{EntityGraph, EntityGraphs},
    node::{AssociationDef, ConverterDef, EmbeddableDef, EntityDef, EnumMapping, IdDef, PropertyDef},
    types::{AssociationKind, Type},
};

pub(crate) const ORDER_STATUSES: [&str; 3] = ["New", "Paid", "Shipped"];

///
/// Cents
///
/// Test converter: orders store their total as text cents, the entity
/// carries an integer. Bijective, so round-trip laws hold.
///

pub(crate) struct Cents;

impl ValueConverter for Cents {
    fn to_entity(&self, stored: &Value) -> Value {
        match stored {
            Value::Text(s) => s.parse::<i64>().map_or_else(|_| stored.clone(), Value::Int),
            other => other.clone(),
        }
    }

    fn to_stored(&self, entity: &Value) -> Value {
        match entity {
            Value::Int(n) => Value::Text(n.to_string()),
            other => other.clone(),
        }
    }
}

pub(crate) fn registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry.register("cents", Cents);

    registry
}

fn ty(name: &str) -> Type {
    Type::new("shop", name)
}

fn id() -> IdDef {
    IdDef::new("id", Type::new("std", "i64"))
}

fn string_ty() -> Type {
    Type::new("std", "String")
}

pub(crate) fn shop() -> EntityGraphs {
    let customer = EntityDef::new(ty("Customer"))
        .id(id())
        .property(PropertyDef::new("name", string_ty()))
        .embeddable(
            EmbeddableDef::new("address", ty("Address"))
                .nullable(true)
                .property(PropertyDef::new("city", string_ty()))
                .property(PropertyDef::new("street", string_ty())),
        )
        .association(
            AssociationDef::new("orders", AssociationKind::OneToMany, ty("Order")).mapped(false),
        )
        .association(AssociationDef::new(
            "products",
            AssociationKind::ManyToMany,
            ty("Product"),
        ));

    let order = EntityDef::new(ty("Order"))
        .id(id())
        .property(
            PropertyDef::new("total", Type::new("std", "i64"))
                .converter(ConverterDef::new("cents", string_ty())),
        )
        .property(
            PropertyDef::new("status", ty("OrderStatus")).enumerated(EnumMapping::new(
                ORDER_STATUSES,
                rowgraph_schema::node::EnumStorage::Name,
            )),
        )
        .association(AssociationDef::new(
            "customer",
            AssociationKind::ManyToOne,
            ty("Customer"),
        ));

    let product = EntityDef::new(ty("Product"))
        .id(IdDef::new("id", Type::new("std", "i64")).nullable(true))
        .property(PropertyDef::new("name", string_ty()))
        .association(
            AssociationDef::new("customers", AssociationKind::ManyToMany, ty("Customer"))
                .mapped(false),
        );

    EntityGraphs::new().graph(
        EntityGraph::new("shop")
            .entity(customer)
            .entity(order)
            .entity(product),
    )
}

pub(crate) fn entity<'a>(graphs: &'a EntityGraphs, name: &str) -> &'a EntityDef {
    graphs
        .get(&ty(name))
        .unwrap_or_else(|| panic!("fixture entity {name} missing"))
}
