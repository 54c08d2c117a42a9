use crate::{
    error::Error,
    materialize::Materializer,
    row::Row,
    test_fixtures::{entity, registry, shop},
    value::Value,
};
use rowgraph_schema::{
    error::SchemaError,
    graph::{EntityGraph, EntityGraphs},
    node::{AssociationDef, ConverterDef, EntityDef, EnumMapping, EnumStorage, IdDef, PropertyDef},
    types::{AssociationKind, Type},
};

// ---- row helpers -------------------------------------------------------

fn customer_cols(row: Row, id: i64, name: &str, city: &str, street: &str) -> Row {
    row.set("Customer", "id", id)
        .set("Customer", "name", name)
        .set("Customer", "addressCity", city)
        .set("Customer", "addressStreet", street)
}

fn order_cols(row: Row, id: i64, total: &str, status: &str) -> Row {
    row.set("Order", "id", id)
        .set("Order", "total", total)
        .set("Order", "status", status)
}

fn product_cols(row: Row, id: i64, name: &str) -> Row {
    row.set("Product", "id", id).set("Product", "name", name)
}

fn alice_with_order(order_id: i64, total: &str) -> Row {
    order_cols(
        customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak"),
        order_id,
        total,
        "Paid",
    )
}

// ---- deduplication and ordering ----------------------------------------

#[test]
fn duplicate_rows_collapse_to_one_root() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![
        alice_with_order(10, "100"),
        alice_with_order(11, "200"),
        alice_with_order(10, "100"), // same order repeated by the join
    ];

    let map = materializer.to_map(&rows).unwrap();
    assert_eq!(map.len(), 1);

    let alice = &map[&Value::Int(1)];
    assert_eq!(alice.get("name"), Some(&Value::from("Alice")));

    let orders = alice.many("orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].get("id"), Some(&Value::Int(10)));
    assert_eq!(orders[1].get("id"), Some(&Value::Int(11)));
}

#[test]
fn root_order_is_first_seen() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![
        customer_cols(Row::new(), 3, "Carol", "Gdansk", "Dluga"),
        customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak"),
        customer_cols(Row::new(), 2, "Bob", "Krakow", "Rynek"),
        customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak"),
    ];

    let ids: Vec<Value> = materializer.to_map(&rows).unwrap().into_keys().collect();
    assert_eq!(ids, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
}

#[test]
fn to_list_matches_map_order() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![
        customer_cols(Row::new(), 2, "Bob", "Krakow", "Rynek"),
        customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak"),
    ];

    let list = materializer.to_list(&rows).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].get("id"), Some(&Value::Int(2)));
    assert_eq!(list[1].get("id"), Some(&Value::Int(1)));
}

// ---- outer-join misses ---------------------------------------------------

#[test]
fn rows_without_root_identifier_are_skipped() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![
        order_cols(Row::new(), 10, "100", "Paid"), // no customer columns at all
        Row::new().set("Customer", "id", Value::Null), // explicit null id
        customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak"),
    ];

    let map = materializer.to_map(&rows).unwrap();
    assert_eq!(map.len(), 1);
    assert!(map.contains_key(&Value::Int(1)));
}

#[test]
fn missing_to_many_yields_empty_collection() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak")];

    let map = materializer.to_map(&rows).unwrap();
    let alice = &map[&Value::Int(1)];
    assert!(alice.has_many("orders"));
    assert!(alice.many("orders").is_empty());
}

// ---- associations --------------------------------------------------------

#[test]
fn owned_to_one_is_populated_from_row() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Order"), &graphs, &registry).unwrap();

    let rows = vec![alice_with_order(10, "4200")];

    let map = materializer.to_map(&rows).unwrap();
    let order = &map[&Value::Int(10)];
    let customer = order.one("customer").unwrap();
    assert_eq!(customer.get("id"), Some(&Value::Int(1)));
    assert_eq!(customer.get("name"), Some(&Value::from("Alice")));
}

#[test]
fn bidirectional_children_point_back_at_their_root() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![
        alice_with_order(10, "100"),
        order_cols(
            customer_cols(Row::new(), 2, "Bob", "Krakow", "Rynek"),
            11,
            "300",
            "New",
        ),
    ];

    let map = materializer.to_map(&rows).unwrap();
    for (root_id, root) in &map {
        for order in root.many("orders") {
            let back = order.one("customer").unwrap();
            assert_eq!(back.get("id"), Some(root_id));
            assert_eq!(back.get("name"), root.get("name"));
        }
    }
}

#[test]
fn many_to_many_accumulates_in_first_seen_order() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let base = || customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak");
    let rows = vec![
        product_cols(base(), 7, "amp"),
        product_cols(base(), 3, "cable"),
        product_cols(base(), 7, "amp"), // join repeats the first product
    ];

    let map = materializer.to_map(&rows).unwrap();
    let products = map[&Value::Int(1)].many("products");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].get("id"), Some(&Value::Int(7)));
    assert_eq!(products[1].get("id"), Some(&Value::Int(3)));
}

#[test]
fn inverse_children_are_fully_materialized() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    // The order's scalar columns must survive into the customer's
    // collection, because the inverse side consults the Order entity's own
    // materialized map rather than re-reading a foreign key.
    let rows = vec![alice_with_order(10, "4200")];

    let map = materializer.to_map(&rows).unwrap();
    let order = &map[&Value::Int(1)].many("orders")[0];
    assert_eq!(order.get("total"), Some(&Value::Int(4200)));
    assert_eq!(order.get("status"), Some(&Value::Enum("Paid".to_string())));
}

// ---- coercion --------------------------------------------------------------

#[test]
fn converter_is_applied_when_reading() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Order"), &graphs, &registry).unwrap();

    let rows = vec![alice_with_order(10, "4200")];

    let map = materializer.to_map(&rows).unwrap();
    assert_eq!(map[&Value::Int(10)].get("total"), Some(&Value::Int(4200)));
}

#[test]
fn unknown_enum_variant_fails() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Order"), &graphs, &registry).unwrap();

    let rows = vec![order_cols(
        customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak"),
        10,
        "100",
        "Bogus",
    )];

    assert!(matches!(
        materializer.to_map(&rows),
        Err(Error::Coercion { .. })
    ));
}

#[test]
fn ordinal_enum_storage_coerces_to_name() {
    let ty = |name: &str| Type::new("app", name);
    let task = EntityDef::new(ty("Task"))
        .id(IdDef::new("id", Type::new("std", "i64")))
        .property(PropertyDef::new("state", ty("State")).enumerated(EnumMapping::new(
            ["Open", "Done"],
            EnumStorage::Ordinal,
        )));
    let graphs = EntityGraphs::new().graph(EntityGraph::new("app").entity(task));
    let registry = crate::convert::ConverterRegistry::new();
    let task = graphs.get(&ty("Task")).unwrap();
    let materializer = Materializer::new(task, &graphs, &registry).unwrap();

    let rows = vec![Row::new().set("Task", "id", 1_i64).set("Task", "state", 1_i64)];

    let map = materializer.to_map(&rows).unwrap();
    assert_eq!(
        map[&Value::Int(1)].get("state"),
        Some(&Value::Enum("Done".to_string()))
    );
}

#[test]
fn id_converter_is_applied_when_reading() {
    let ticket = EntityDef::new(Type::new("app", "Ticket")).id(
        IdDef::new("id", Type::new("std", "i64"))
            .converter(ConverterDef::new("cents", Type::new("std", "String"))),
    );
    let graphs = EntityGraphs::new().graph(EntityGraph::new("app").entity(ticket.clone()));
    let registry = registry();
    let materializer = Materializer::new(&ticket, &graphs, &registry).unwrap();

    // The identity map is keyed by the entity-side value, not the stored one.
    let rows = vec![Row::new().set("Ticket", "id", "42")];

    let map = materializer.to_map(&rows).unwrap();
    assert_eq!(map[&Value::Int(42)].get("id"), Some(&Value::Int(42)));
}

// ---- embeddables -------------------------------------------------------------

#[test]
fn embeddable_materializes_as_composite() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![customer_cols(Row::new(), 1, "Alice", "Warsaw", "Suwak")];

    let map = materializer.to_map(&rows).unwrap();
    let address = map[&Value::Int(1)].get("address").unwrap();
    assert_eq!(address.field("city"), Some(&Value::from("Warsaw")));
    assert_eq!(address.field("street"), Some(&Value::from("Suwak")));
}

#[test]
fn all_null_embeddable_materializes_as_null() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let rows = vec![Row::new()
        .set("Customer", "id", 1_i64)
        .set("Customer", "name", "Alice")];

    let map = materializer.to_map(&rows).unwrap();
    assert_eq!(map[&Value::Int(1)].get("address"), Some(&Value::Null));
}

// ---- failure modes -------------------------------------------------------------

#[test]
fn missing_identifier_fails_before_rows_are_read() {
    let orphan = EntityDef::new(Type::new("app", "Orphan"));
    let graphs = EntityGraphs::new().graph(EntityGraph::new("app").entity(orphan.clone()));
    let registry = crate::convert::ConverterRegistry::new();

    let err = Materializer::new(&orphan, &graphs, &registry).err();
    assert_eq!(err, Some(Error::Schema(SchemaError::missing_id("Orphan"))));
}

#[test]
fn unresolved_association_target_fails_at_setup() {
    let ty = |name: &str| Type::new("app", name);
    let customer = EntityDef::new(ty("Customer"))
        .id(IdDef::new("id", Type::new("std", "i64")))
        .association(AssociationDef::new(
            "invoices",
            AssociationKind::OneToMany,
            ty("Invoice"),
        ));
    let graphs = EntityGraphs::new().graph(EntityGraph::new("app").entity(customer.clone()));
    let registry = crate::convert::ConverterRegistry::new();

    assert!(matches!(
        Materializer::new(&customer, &graphs, &registry),
        Err(Error::Schema(SchemaError::EntityNotMapped { .. }))
    ));
}

// ---- recursion and cycles ---------------------------------------------------

#[test]
fn mutually_inverse_schema_terminates() {
    let ty = |name: &str| Type::new("app", name);
    let id = || IdDef::new("id", Type::new("std", "i64"));
    let left = EntityDef::new(ty("Left")).id(id()).association(
        AssociationDef::new("rights", AssociationKind::OneToMany, ty("Right")).mapped(false),
    );
    let right = EntityDef::new(ty("Right")).id(id()).association(
        AssociationDef::new("lefts", AssociationKind::OneToMany, ty("Left")).mapped(false),
    );
    let graphs = EntityGraphs::new().graph(EntityGraph::new("app").entity(left).entity(right));
    let registry = crate::convert::ConverterRegistry::new();
    let left = graphs.get(&ty("Left")).unwrap();
    let materializer = Materializer::new(left, &graphs, &registry).unwrap();

    let rows = vec![Row::new()
        .set("Left", "id", 1_i64)
        .set("Right", "id", 2_i64)];

    let map = materializer.to_map(&rows).unwrap();
    let rights = map[&Value::Int(1)].many("rights");
    assert_eq!(rights.len(), 1);
    assert_eq!(rights[0].get("id"), Some(&Value::Int(2)));
}

// ---- singular variant -----------------------------------------------------

#[test]
fn to_instance_materializes_a_single_row() {
    let graphs = shop();
    let registry = registry();
    let materializer = Materializer::new(entity(&graphs, "Customer"), &graphs, &registry).unwrap();

    let row = alice_with_order(10, "100");
    let alice = materializer.to_instance(&row).unwrap().unwrap();
    assert_eq!(alice.get("id"), Some(&Value::Int(1)));
    assert_eq!(alice.many("orders").len(), 1);

    let miss = order_cols(Row::new(), 10, "100", "Paid");
    assert_eq!(materializer.to_instance(&miss).unwrap(), None);
}
