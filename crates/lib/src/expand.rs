//! Expansion of path-keyed mappings back into nested maps.
//!
//! Only the first `.` of each key matters at any one level: the text before it names
//! the child, and everything sharing that child is expanded by a recursive pass over
//! the whole flat map with the child's path as prefix. Every level rescans the input,
//! so cost is `O(depth * entries)`.
//!
//! Two rules keep the result well defined for any input:
//!
//! - **First seen wins.** Once a segment name has been filled in, later keys that
//!   would claim the same name are ignored. Keys are visited in sorted order, so
//!   `a.b` claims `b` before `a.b.c` can turn it into a map.
//! - **Maps only.** Index suffixes are not interpreted. `tags[0]` becomes the key
//!   `"tags[0]"`; expansion never builds a [`Value::List`].
//!
//! Use [`crate::strict`] to find out whether any key was dropped.

use tracing::trace;

use crate::{
    constants::SEPARATOR,
    value::{FlatMap, Map, Value},
};

/// Expands a flat mapping into nested maps.
///
/// ```
/// # use flatnest::{FlatMap, Value, expand};
/// let mut flat = FlatMap::new();
/// flat.insert("a.b".to_string(), Value::from(1));
/// flat.insert("a.b.c".to_string(), Value::from(2));
///
/// let nested = expand(&flat);
/// assert_eq!(Value::Map(nested).get_path("a.b"), Some(&Value::Int(1)));
/// ```
pub fn expand(flat: &FlatMap) -> Map {
    expand_prefixed(flat, "")
}

/// Expands only the entries nested under `prefix`.
///
/// Keys must start with `prefix` followed by `.`; the key equal to `prefix` itself is
/// not part of the result. An empty prefix selects every entry.
///
/// ```
/// # use flatnest::{FlatMap, Value, expand_prefixed};
/// let mut flat = FlatMap::new();
/// flat.insert("db.host".to_string(), Value::from("localhost"));
/// flat.insert("cache.host".to_string(), Value::from("redis"));
///
/// let db = expand_prefixed(&flat, "db");
/// assert_eq!(db.len(), 1);
/// assert_eq!(db["host"], "localhost");
/// ```
pub fn expand_prefixed(flat: &FlatMap, prefix: &str) -> Map {
    let mut out = Map::new();
    expand_into(flat, prefix, &mut out);
    out
}

/// Expands into an existing map.
///
/// Names already present in `out` count as seen, so they are never overwritten.
pub fn expand_into(flat: &FlatMap, prefix: &str, out: &mut Map) {
    let base = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}{SEPARATOR}")
    };

    for (key, value) in flat {
        let Some(rest) = key.strip_prefix(base.as_str()) else {
            continue;
        };
        let (segment, nested) = match rest.find(SEPARATOR) {
            Some(idx) => (&rest[..idx], true),
            None => (rest, false),
        };

        if let Some(existing) = out.get(segment) {
            if matches!(existing, Value::Map(_)) != nested {
                trace!(key = key.as_str(), segment, "Dropping key shadowed by an earlier one");
            }
            continue;
        }

        let child = if nested {
            Value::Map(expand_prefixed(flat, &key[..base.len() + segment.len()]))
        } else {
            value.clone()
        };
        out.insert(segment.to_string(), child);
    }
}
