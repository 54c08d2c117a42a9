//! Stored/entity value coercion shared by the materializer and flattener.
//!
//! A converter and an enumeration mapping are resolved upstream as mutually
//! exclusive; when both are present the converter wins. `Null` passes
//! through untouched in both directions.

use crate::{convert::ConverterRegistry, error::Error, value::Value};
use rowgraph_schema::node::{ConverterDef, EnumMapping, EnumStorage};

/// Stored column value -> in-memory entity value.
pub(crate) fn entity_value(
    entity: &str,
    member: &str,
    stored: Value,
    converter: Option<&ConverterDef>,
    enumerated: Option<&EnumMapping>,
    registry: &ConverterRegistry,
) -> Result<Value, Error> {
    if stored.is_null() {
        return Ok(Value::Null);
    }
    if let Some(def) = converter {
        return Ok(registry.get(def)?.to_entity(&stored));
    }
    if let Some(mapping) = enumerated {
        return enum_from_stored(entity, member, stored, mapping);
    }

    Ok(stored)
}

/// In-memory entity value -> stored column value.
pub(crate) fn stored_value(
    entity: &str,
    member: &str,
    value: &Value,
    converter: Option<&ConverterDef>,
    enumerated: Option<&EnumMapping>,
    registry: &ConverterRegistry,
) -> Result<Value, Error> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if let Some(def) = converter {
        return Ok(registry.get(def)?.to_stored(value));
    }
    if let Some(mapping) = enumerated {
        return enum_to_stored(entity, member, value, mapping);
    }

    Ok(value.clone())
}

fn enum_from_stored(
    entity: &str,
    member: &str,
    stored: Value,
    mapping: &EnumMapping,
) -> Result<Value, Error> {
    match stored {
        Value::Text(name) | Value::Enum(name) => {
            if mapping.ordinal_of(&name).is_some() {
                Ok(Value::Enum(name))
            } else {
                Err(Error::coercion(
                    entity,
                    member,
                    format!("unknown enum variant '{name}'"),
                ))
            }
        }
        Value::Int(n) => usize::try_from(n)
            .ok()
            .and_then(|ordinal| mapping.name_of(ordinal))
            .map(|name| Value::Enum(name.to_string()))
            .ok_or_else(|| Error::coercion(entity, member, format!("enum ordinal {n} out of range"))),
        Value::Uint(n) => usize::try_from(n)
            .ok()
            .and_then(|ordinal| mapping.name_of(ordinal))
            .map(|name| Value::Enum(name.to_string()))
            .ok_or_else(|| Error::coercion(entity, member, format!("enum ordinal {n} out of range"))),
        other => Err(Error::coercion(
            entity,
            member,
            format!("cannot coerce {other} to an enum"),
        )),
    }
}

fn enum_to_stored(
    entity: &str,
    member: &str,
    value: &Value,
    mapping: &EnumMapping,
) -> Result<Value, Error> {
    let name = match value {
        Value::Enum(name) | Value::Text(name) => name,
        other => {
            return Err(Error::coercion(
                entity,
                member,
                format!("cannot store {other} as an enum"),
            ));
        }
    };
    let ordinal = mapping
        .ordinal_of(name)
        .ok_or_else(|| Error::coercion(entity, member, format!("unknown enum variant '{name}'")))?;

    Ok(match mapping.stored {
        EnumStorage::Name => Value::Text(name.clone()),
        EnumStorage::Ordinal => {
            let ordinal = i64::try_from(ordinal)
                .map_err(|_| Error::coercion(entity, member, "enum ordinal overflows i64"))?;
            Value::Int(ordinal)
        }
    })
}
