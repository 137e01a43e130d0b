//! JSON syntax: conversion between `serde_json` values and [`Value`] trees.
//!
//! `serde_json` is built with `preserve_order`, so object keys come out in the
//! order they were read.

use rsm_types::{Format, Value};

use crate::error::{CodecError, CodecResult};

/// Parse JSON text into a value tree.
pub fn parse_value(text: &str, origin: &str) -> CodecResult<Value> {
    let native: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CodecError::Syntax {
            origin: origin.to_string(),
            format: Format::Json,
            message: e.to_string(),
        })?;
    Ok(from_native(native))
}

/// Pretty-print a value tree with two-space indentation.
pub fn write_value(value: &Value) -> CodecResult<String> {
    serde_json::to_string_pretty(&to_native(value)).map_err(|e| CodecError::Serialize {
        format: Format::Json,
        message: e.to_string(),
    })
}

pub(crate) fn from_native(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_native).collect())
        }
        serde_json::Value::Object(map) => {
            Value::Mapping(map.into_iter().map(|(k, v)| (k, from_native(v))).collect())
        }
    }
}

pub(crate) fn to_native(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_native).collect()),
        Value::Mapping(pairs) => serde_json::Value::Object(
            pairs.iter().map(|(k, v)| (k.clone(), to_native(v))).collect(),
        ),
    }
}
