//! Flattening of nested values into path-keyed mappings.
//!
//! The walk is depth-first and records only leaves. Containers contribute nothing
//! themselves, so an empty map, record or list leaves no trace in the output.
//!
//! | Shape                | Child path                          |
//! |----------------------|-------------------------------------|
//! | [`Value::Map`]       | `prefix.key` (or `key` at the root) |
//! | [`Value::Record`]    | `prefix.field` (or `field`)         |
//! | [`Value::List`]      | `prefix[i]`                         |
//! | [`Value::Opaque`]    | skipped                             |
//! | any leaf             | recorded under `prefix`             |
//!
//! A leaf with an empty prefix (the whole input is a single scalar or null) has no
//! key to live under and produces an empty result.

use serde::Serialize;
use tracing::debug;

use crate::{
    Result,
    path::{join_index, join_key},
    ser::to_value,
    value::{FlatMap, Value},
};

/// Flattens a value into a new [`FlatMap`].
///
/// ```
/// # use flatnest::{Value, flatten};
/// let flat = flatten(&Value::from(serde_json::json!({"a": ["x", "y"]})));
/// assert_eq!(flat.len(), 2);
/// assert_eq!(flat["a[0]"], "x");
/// assert_eq!(flat["a[1]"], "y");
/// ```
pub fn flatten(value: &Value) -> FlatMap {
    flatten_prefixed(value, "")
}

/// Flattens a value with every key placed under `prefix`.
///
/// ```
/// # use flatnest::{Value, flatten_prefixed};
/// let flat = flatten_prefixed(&Value::from(serde_json::json!({"port": 80})), "server");
/// assert_eq!(flat["server.port"], 80);
/// ```
pub fn flatten_prefixed(value: &Value, prefix: &str) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(value, prefix, &mut out);
    out
}

/// Flattens a value into an existing map.
///
/// Entries already in `out` are kept unless a flattened path overwrites them.
pub fn flatten_into(value: &Value, prefix: &str, out: &mut FlatMap) {
    match value {
        Value::Map(map) => {
            for (key, child) in map {
                flatten_into(child, &join_key(prefix, key), out);
            }
        }
        Value::Record(record) => {
            for (field, child) in record.fields() {
                flatten_into(child, &join_key(prefix, field), out);
            }
        }
        Value::List(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join_index(prefix, index), out);
            }
        }
        Value::Opaque(entries) => {
            debug!(
                path = prefix,
                entries = entries.len(),
                "Skipping map with non-string keys"
            );
        }
        leaf => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), leaf.clone());
            }
        }
    }
}

/// Normalizes any serializable value and flattens it.
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[allow(non_snake_case)]
/// struct Person {
///     Name: String,
///     Age: u32,
/// }
///
/// let flat = flatnest::to_flat_map(&Person { Name: "Bob".into(), Age: 30 })?;
/// assert_eq!(flat["Name"], "Bob");
/// assert_eq!(flat["Age"], 30);
/// # Ok::<(), flatnest::Error>(())
/// ```
///
/// # Errors
/// Fails only when normalization fails; see [`crate::ser::to_value`].
pub fn to_flat_map<T: Serialize + ?Sized>(value: &T) -> Result<FlatMap> {
    to_flat_map_prefixed(value, "")
}

/// Normalizes any serializable value and flattens it under `prefix`.
///
/// # Errors
/// Fails only when normalization fails; see [`crate::ser::to_value`].
pub fn to_flat_map_prefixed<T: Serialize + ?Sized>(value: &T, prefix: &str) -> Result<FlatMap> {
    let value = to_value(value)?;
    Ok(flatten_prefixed(&value, prefix))
}
