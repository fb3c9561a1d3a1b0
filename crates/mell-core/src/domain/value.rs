//! The metadata tree and its recursive merge.
//!
//! Metadata is plain JSON. `serde_json::Value` is built with `preserve_order`
//! so map keys keep document order when the tree is written back out.

pub use serde_json::{Map, Value};

/// Merge `src` into `dst` in place.
///
/// - map over map: keys merge recursively, new keys are appended in source order
/// - sequence over sequence of the same length: element-wise merge
/// - anything else: `src` replaces `dst`
pub fn merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, src_value) in src_map {
                match dst_map.get_mut(&key) {
                    Some(existing) => merge(existing, src_value),
                    None => {
                        dst_map.insert(key, src_value);
                    }
                }
            }
        }
        (Value::Array(dst_items), Value::Array(src_items))
            if dst_items.len() == src_items.len() =>
        {
            for (existing, src_value) in dst_items.iter_mut().zip(src_items) {
                merge(existing, src_value);
            }
        }
        (dst, src) => *dst = src,
    }
}

/// Consuming form of [`merge`].
pub fn merged(mut dst: Value, src: Value) -> Value {
    merge(&mut dst, src);
    dst
}

/// Null, false, zero, and empty strings/maps/sequences are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short tag name used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

/// A fresh empty map.
pub fn empty_map() -> Value {
    Value::Object(Map::new())
}
