use crate::value::Value;
use indexmap::IndexMap;

///
/// Instance
///
/// A materialized entity instance: scalar and embedded values (embeddables
/// ride as `Value::Composite`), to-one association fields, and to-many
/// collections. Instances are plain values: the materializer hands out
/// copies, and back-reference patch-up substitutes a new value rather than
/// mutating anything shared.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Instance {
    pub entity: String,
    values: IndexMap<String, Value>,
    to_one: IndexMap<String, Option<Box<Instance>>>,
    to_many: IndexMap<String, Vec<Instance>>,
}

impl Instance {
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: IndexMap::new(),
            to_one: IndexMap::new(),
            to_many: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_value(name, value.into());
        self
    }

    pub fn set_value(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set_to_one(&mut self, name: &str, instance: Option<Self>) {
        self.to_one.insert(name.to_string(), instance.map(Box::new));
    }

    /// The associated instance for a to-one field, if set and non-null.
    #[must_use]
    pub fn one(&self, name: &str) -> Option<&Self> {
        self.to_one.get(name)?.as_deref()
    }

    pub fn set_to_many(&mut self, name: &str, instances: Vec<Self>) {
        self.to_many.insert(name.to_string(), instances);
    }

    /// The collection for a to-many field; empty when never populated.
    #[must_use]
    pub fn many(&self, name: &str) -> &[Self] {
        self.to_many.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether a to-many field was populated at all (an empty collection
    /// still counts).
    #[must_use]
    pub fn has_many(&self, name: &str) -> bool {
        self.to_many.contains_key(name)
    }

    /// Shallow copy: values only, association fields left empty.
    #[must_use]
    pub fn shallow(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            values: self.values.clone(),
            to_one: IndexMap::new(),
            to_many: IndexMap::new(),
        }
    }
}
