//! Flattening tests
//!
//! Covers the shape rules for maps, records and lists, the handling of null and
//! opaque values, and flattening of serializable host types.

use std::collections::{BTreeMap, HashMap};

use flatnest::{FlatMap, Map, Record, Value, flatten, flatten_into, flatten_prefixed, to_flat_map};
use serde::Serialize;

use crate::helpers::*;

// ===== SHAPE RULES =====

#[test]
fn test_flatten_sequence_indexing() {
    let flat = flatten(&Value::from(serde_json::json!({"a": ["x", "y"]})));
    assert_flat_text(&flat, &[("a[0]", "x"), ("a[1]", "y")]);
}

#[test]
fn test_flatten_nested_maps_and_lists() {
    let value = Value::from(serde_json::json!({
        "servers": [
            {"host": "a.example", "ports": [80, 443]},
            {"host": "b.example", "ports": []},
        ],
        "name": "cluster",
    }));
    let flat = flatten(&value);

    assert_eq!(flat.len(), 5);
    assert_eq!(flat["servers[0].host"], "a.example");
    assert_eq!(flat["servers[0].ports[0]"], 80);
    assert_eq!(flat["servers[0].ports[1]"], 443);
    assert_eq!(flat["servers[1].host"], "b.example");
    assert_eq!(flat["name"], "cluster");
    assert!(!flat.keys().any(|key| key.starts_with("servers[1].ports")));
}

#[test]
fn test_flatten_lists_of_lists() {
    let flat = flatten(&Value::from(serde_json::json!({"m": [[1, 2], [3]]})));
    assert_eq!(flat["m[0][0]"], 1);
    assert_eq!(flat["m[0][1]"], 2);
    assert_eq!(flat["m[1][0]"], 3);
}

#[test]
fn test_flatten_empty_inputs() {
    assert!(flatten(&Value::Map(Map::new())).is_empty());
    assert!(flatten(&Value::List(Vec::new())).is_empty());
    assert!(flatten(&Value::from(serde_json::json!({"a": {}, "b": []}))).is_empty());
}

#[test]
fn test_flatten_leaves_are_not_coerced() {
    let value = Value::from(serde_json::json!({
        "int": -7,
        "float": 2.5,
        "flag": false,
        "text": "42",
        "big": 18446744073709551615u64,
    }));
    let flat = flatten(&value);
    assert_eq!(flat["int"], Value::Int(-7));
    assert_eq!(flat["float"], Value::Float(2.5));
    assert_eq!(flat["flag"], Value::Bool(false));
    assert_eq!(flat["text"], Value::Text("42".to_string()));
    assert_eq!(flat["big"], Value::UInt(u64::MAX));
}

// ===== NULL AND PREFIX HANDLING =====

#[test]
fn test_flatten_null_under_prefix() {
    let mut out = FlatMap::new();
    flatten_into(&Value::Null, "a", &mut out);
    assert_eq!(out, flat_map(&[("a", Value::Null)]));
}

#[test]
fn test_flatten_null_without_prefix() {
    assert!(flatten(&Value::Null).is_empty());
    assert!(flatten(&Value::from("scalar")).is_empty());
}

#[test]
fn test_flatten_null_leaves_inside_structures() {
    let flat = flatten(&Value::from(serde_json::json!({"a": null, "b": [null]})));
    assert_eq!(flat.len(), 2);
    assert!(flat["a"].is_null());
    assert!(flat["b[0]"].is_null());
}

#[test]
fn test_flatten_prefixed_lists_and_maps() {
    let flat = flatten_prefixed(&Value::from(serde_json::json!(["x"])), "items");
    assert_flat_text(&flat, &[("items[0]", "x")]);

    let flat = flatten_prefixed(&Value::from(serde_json::json!({"k": "v"})), "root.sub");
    assert_flat_text(&flat, &[("root.sub.k", "v")]);
}

#[test]
fn test_flatten_opaque_map_is_skipped() {
    let mut map = Map::new();
    map.insert(
        "by_id".to_string(),
        Value::Opaque(vec![(Value::Int(1), Value::from("one"))]),
    );
    assert!(flatten(&Value::Map(map)).is_empty());
}

// ===== RECORDS AND HOST TYPES =====

#[test]
fn test_flatten_record_example() {
    let person = Record::new("Person")
        .with_field("Name", "Bob")
        .with_field("Age", 30);
    let flat = flatten(&Value::Record(person));
    assert_eq!(flat.len(), 2);
    assert_eq!(flat["Name"], "Bob");
    assert_eq!(flat["Age"], 30);
}

#[derive(Serialize)]
struct Address {
    city: String,
    zip: Option<String>,
}

#[derive(Serialize)]
enum Role {
    Admin,
    Guest { expires: u64 },
}

#[derive(Serialize)]
struct Account {
    name: String,
    address: Option<Address>,
    previous: Vec<Address>,
    roles: Vec<Role>,
    labels: BTreeMap<String, String>,
    scores: HashMap<u32, u32>,
    #[serde(skip)]
    #[allow(dead_code)]
    secret: String,
}

fn sample_account() -> Account {
    let mut labels = BTreeMap::new();
    labels.insert("team".to_string(), "core".to_string());
    let mut scores = HashMap::new();
    scores.insert(1, 10);

    Account {
        name: "bob".to_string(),
        address: Some(Address {
            city: "Oslo".to_string(),
            zip: None,
        }),
        previous: vec![Address {
            city: "Bergen".to_string(),
            zip: Some("5003".to_string()),
        }],
        roles: vec![Role::Admin, Role::Guest { expires: 99 }],
        labels,
        scores,
        secret: "hidden".to_string(),
    }
}

#[test]
fn test_to_flat_map_struct() {
    let flat = to_flat_map(&sample_account()).unwrap();

    assert_eq!(flat["name"], "bob");
    assert_eq!(flat["address.city"], "Oslo");
    assert!(flat["address.zip"].is_null());
    assert_eq!(flat["previous[0].city"], "Bergen");
    assert_eq!(flat["previous[0].zip"], "5003");
    assert_eq!(flat["roles[0]"], "Admin");
    assert_eq!(flat["roles[1].Guest.expires"], 99);
    assert_eq!(flat["labels.team"], "core");
    assert!(!flat.keys().any(|key| key.starts_with("scores")));
    assert!(!flat.contains_key("secret"));
    assert_eq!(flat.len(), 8);
}

#[test]
fn test_to_flat_map_absent_option() {
    let account = Account {
        address: None,
        ..sample_account()
    };
    let flat = to_flat_map(&account).unwrap();
    assert!(flat["address"].is_null());
    assert!(!flat.contains_key("address.city"));
}

#[test]
fn test_to_flat_map_prefixed() {
    let flat = flatnest::to_flat_map_prefixed(&vec![1, 2], "ids").unwrap();
    assert_eq!(flat["ids[0]"], 1);
    assert_eq!(flat["ids[1]"], 2);
}

#[test]
fn test_to_flat_map_top_level_option() {
    assert!(to_flat_map(&None::<Address>).unwrap().is_empty());
    let flat = flatnest::to_flat_map_prefixed(&None::<Address>, "addr").unwrap();
    assert!(flat["addr"].is_null());
}

#[test]
fn test_to_flat_map_error() {
    let err = to_flat_map(&u128::MAX).unwrap_err();
    assert!(err.is_serialize_error());
    assert_eq!(err.module(), "ser");
    assert_eq!(err.path(), None);
}
