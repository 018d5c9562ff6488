//! Strict checking tests

use flatnest::{Error, PathError, Value, check, expand, expand_strict, expand_strict_prefixed, flatten};

use crate::helpers::*;

#[test]
fn test_strict_accepts_flattened_output() {
    let value = Value::from(serde_json::json!({
        "a": [{"b": 1}, {"b": [2, 3]}],
        "c": {"d": null},
    }));
    let flat = flatten(&value);
    assert!(check(&flat).is_ok());
    assert_eq!(expand_strict(&flat).unwrap(), expand(&flat));
}

#[test]
fn test_strict_accepts_flattened_top_level_list() {
    let flat = flatten(&Value::from(serde_json::json!([{"a": 1}, 2])));
    assert!(check(&flat).is_ok());
}

#[test]
fn test_strict_reports_dropped_branch() {
    let flat = flat_map(&[("a.b", 1), ("a.b.c", 2)]);
    match expand_strict(&flat) {
        Err(Error::Path(PathError::Conflict { leaf, nested })) => {
            assert_eq!(leaf, "a.b");
            assert_eq!(nested, "a.b.c");
        }
        other => panic!("Expected a conflict, got: {other:?}"),
    }
}

#[test]
fn test_strict_reports_malformed_keys() {
    for key in ["a[", "a[b]", "a]", "a..b", ""] {
        let flat = flat_map(&[(key, 1)]);
        let err = check(&flat).unwrap_err();
        assert!(err.is_path_error(), "{key:?} gave {err:?}");
        assert_eq!(err.path(), Some(key));
        assert_eq!(err.module(), "path");
    }
}

#[test]
fn test_strict_rejects_index_after_separator() {
    // Flattening renders list items as `a[0]`, never `a.[0]`
    let flat = flat_map(&[("a.[0]", 1)]);
    let err = check(&flat).unwrap_err();
    assert!(matches!(err, Error::Path(PathError::MalformedIndex { .. })));
    assert_eq!(err.path(), Some("a.[0]"));

    assert!(check(&flat_map(&[("a[0]", 1), ("[0].b", 2)])).is_ok());
}

#[test]
fn test_strict_prefixed_ignores_other_entries() {
    let flat = flat_map(&[("x[", 0), ("svc.a", 1), ("svc.b.c", 2)]);
    let nested = expand_strict_prefixed(&flat, "svc").unwrap();
    assert_eq!(nested, json_map(serde_json::json!({"a": 1, "b": {"c": 2}})));
    assert!(expand_strict(&flat).is_err());
}
