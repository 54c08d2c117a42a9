use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

///
/// Float64
///
/// Finite-only float wrapper with bit-level equality and hashing so values
/// containing floats remain lawful identity-map keys.
///

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Float64(f64);

impl Float64 {
    /// Wrap a finite f64; NaN and infinities are rejected.
    #[must_use]
    pub fn try_new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float64 {}

impl Hash for Float64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Float64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// Value
///
/// Runtime column value. Identifiers (composite ones included) are plain
/// `Value`s, so everything here is equality-comparable and hashable.
/// `Composite` carries an ordered field list and doubles as the
/// representation for embeddable value objects and composite identifiers.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Composite(Vec<(String, Value)>),
    Enum(String),
    Float(Float64),
    Int(i64),
    Null,
    Text(String),
    Uint(u64),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Field lookup on a composite value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Composite(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(bytes) => write!(f, "blob[{}]", bytes.len()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Composite(fields) => {
                write!(f, "(")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                write!(f, ")")
            }
            Self::Enum(name) => write!(f, "{name}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
