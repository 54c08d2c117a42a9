use crate::value::Value;
use indexmap::IndexMap;

///
/// ColumnPresence
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColumnPresence {
    /// Column exists on the row and has a value (including `Value::Null`,
    /// which encodes an explicit SQL NULL).
    Present(Value),
    /// Column is not present on the row (outer-join miss).
    Missing,
}

impl ColumnPresence {
    /// The value if present, `None` on a miss.
    #[must_use]
    pub fn get(self) -> Option<Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing => None,
        }
    }
}

///
/// RowRead
///
/// Abstraction over a row-like record from a prior join. Each record
/// exposes, for a fixed known column of a known entity, either a present
/// typed value or "absent". The engine performs only presence checks and
/// typed reads, never raw SQL.
///

pub trait RowRead {
    fn column(&self, entity: &str, column: &str) -> ColumnPresence;
}

///
/// Row
///
/// In-memory row keyed by (entity name, column name). Joined rows carry
/// several entities' columns, so the entity qualifier keeps them from
/// colliding.
///

#[derive(Clone, Debug, Default)]
pub struct Row {
    cells: IndexMap<(String, String), Value>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, entity: &str, column: &str, value: impl Into<Value>) -> Self {
        self.cells
            .insert((entity.to_string(), column.to_string()), value.into());
        self
    }
}

impl RowRead for Row {
    fn column(&self, entity: &str, column: &str) -> ColumnPresence {
        // IndexMap lookups with a borrowed pair key require an owned key;
        // rows are small, so a scan is fine here.
        self.cells
            .iter()
            .find(|((e, c), _)| e == entity && c == column)
            .map_or(ColumnPresence::Missing, |(_, value)| {
                ColumnPresence::Present(value.clone())
            })
    }
}
