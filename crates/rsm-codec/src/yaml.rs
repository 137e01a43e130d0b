//! YAML syntax: conversion between `serde_yaml` values and [`Value`] trees.
//!
//! Scalar mapping keys other than strings (`1: x`, `true: y`) are read as
//! their textual form; two keys that collide in that form are rejected.
//! Tagged values, collection keys, and non-finite floats
//! have no place in the document model and are rejected.

use rsm_types::{Format, Value};

use crate::error::{CodecError, CodecResult};

/// Parse YAML text into a value tree. Blank input is an empty mapping.
pub fn parse_value(text: &str, origin: &str) -> CodecResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Mapping(Vec::new()));
    }
    let native: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| CodecError::Syntax {
            origin: origin.to_string(),
            format: Format::Yaml,
            message: e.to_string(),
        })?;
    match native {
        serde_yaml::Value::Null => Ok(Value::Mapping(Vec::new())),
        other => from_native(other, origin),
    }
}

/// Render a value tree as block-style YAML.
pub fn write_value(value: &Value) -> CodecResult<String> {
    serde_yaml::to_string(&to_native(value)).map_err(|e| CodecError::Serialize {
        format: Format::Yaml,
        message: e.to_string(),
    })
}

pub(crate) fn from_native(value: serde_yaml::Value, origin: &str) -> CodecResult<Value> {
    let unsupported = |reason: String| CodecError::UnsupportedValue {
        origin: origin.to_string(),
        reason,
    };

    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => Value::Number(number_from_native(&n).ok_or_else(|| {
            unsupported(format!("non-finite number {n}"))
        })?),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| from_native(item, origin))
                .collect::<CodecResult<_>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => {
                        return Err(unsupported(format!(
                            "mapping key must be a scalar, found {}",
                            native_kind(&other)
                        )))
                    }
                };
                if pairs.iter().any(|(existing, _)| *existing == key) {
                    return Err(unsupported(format!(
                        "duplicate mapping key {key:?} after stringification"
                    )));
                }
                pairs.push((key, from_native(v, origin)?));
            }
            Value::Mapping(pairs)
        }
        serde_yaml::Value::Tagged(tagged) => {
            return Err(unsupported(format!("tagged value {}", tagged.tag)));
        }
    })
}

fn number_from_native(n: &serde_yaml::Number) -> Option<serde_json::Number> {
    if let Some(i) = n.as_i64() {
        Some(i.into())
    } else if let Some(u) = n.as_u64() {
        Some(u.into())
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64)
    }
}

pub(crate) fn to_native(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => {
            let native = if let Some(i) = n.as_i64() {
                serde_yaml::Number::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_yaml::Number::from(u)
            } else {
                serde_yaml::Number::from(n.as_f64().unwrap_or_default())
            };
            serde_yaml::Value::Number(native)
        }
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(to_native).collect())
        }
        Value::Mapping(pairs) => {
            let mut map = serde_yaml::Mapping::with_capacity(pairs.len());
            for (k, v) in pairs {
                map.insert(serde_yaml::Value::String(k.clone()), to_native(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

fn native_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}
