//! Expansion tests
//!
//! Covers prefix selection, first-seen-wins handling of conflicting keys, and the
//! treatment of index suffixes as plain keys.

use flatnest::{FlatMap, Map, Value, expand, expand_into, expand_prefixed};

use crate::helpers::*;

// ===== BASIC EXPANSION =====

#[test]
fn test_expand_empty() {
    assert!(expand(&FlatMap::new()).is_empty());
}

#[test]
fn test_expand_nested_paths() {
    let flat = flat_map(&[
        ("db.host", Value::from("localhost")),
        ("db.port", Value::from(5432)),
        ("db.pool.max", Value::from(10)),
        ("debug", Value::from(true)),
    ]);
    let nested = expand(&flat);

    assert_eq!(
        nested,
        json_map(serde_json::json!({
            "db": {"host": "localhost", "port": 5432, "pool": {"max": 10}},
            "debug": true,
        }))
    );
}

#[test]
fn test_expand_keeps_null_leaves() {
    let nested = expand(&flat_map(&[("a.b", Value::Null)]));
    assert_eq!(Value::Map(nested).get_path("a.b"), Some(&Value::Null));
}

// ===== PREFIX SELECTION =====

#[test]
fn test_expand_prefixed_selects_subtree() {
    let flat = flat_map(&[
        ("app.name", "demo"),
        ("app.log.level", "info"),
        ("application.name", "other"),
        ("app", "leaf"),
    ]);
    let nested = expand_prefixed(&flat, "app");

    assert_eq!(
        nested,
        json_map(serde_json::json!({"name": "demo", "log": {"level": "info"}}))
    );
}

#[test]
fn test_expand_prefixed_nested_prefix() {
    let flat = flat_map(&[("a.b.c", 1), ("a.b.d", 2), ("a.x", 3)]);
    let nested = expand_prefixed(&flat, "a.b");
    assert_eq!(nested, json_map(serde_json::json!({"c": 1, "d": 2})));
}

#[test]
fn test_expand_prefixed_missing_prefix() {
    let flat = flat_map(&[("a.b", 1)]);
    assert!(expand_prefixed(&flat, "z").is_empty());
}

// ===== CONFLICTS AND INDEX SUFFIXES =====

#[test]
fn test_expand_duplicate_segment_stability() {
    let flat = flat_map(&[("a.b", 1), ("a.b.c", 2)]);
    assert_eq!(
        expand(&flat),
        json_map(serde_json::json!({"a": {"b": 1}}))
    );
}

#[test]
fn test_expand_index_suffixes_are_map_keys() {
    let flat = flat_map(&[("a[0]", "x"), ("a[1]", "y"), ("b[0].c", "z")]);
    let nested = expand(&flat);

    assert_eq!(
        nested,
        json_map(serde_json::json!({
            "a[0]": "x",
            "a[1]": "y",
            "b[0]": {"c": "z"},
        }))
    );
    assert!(nested.values().all(|value| value.as_list().is_none()));
}

#[test]
fn test_expand_into_existing_result() {
    let flat = flat_map(&[("a.b", 1), ("c", 2)]);
    let mut out = Map::new();
    out.insert("c".to_string(), Value::from("preset"));
    expand_into(&flat, "", &mut out);

    assert_eq!(out["c"], "preset");
    assert_eq!(Value::Map(out).get_path("a.b"), Some(&Value::Int(1)));
}
