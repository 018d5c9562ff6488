//! Opt-in validation for flat mappings.
//!
//! [`crate::expand`] accepts any input and quietly drops what it cannot place. This
//! module reports those cases instead:
//!
//! - keys with an empty segment (`a..b`, `.a`, `a.`, the empty key)
//! - keys with unbalanced or non-numeric index suffixes (`a[x]`, `a[1`)
//! - a key that holds a leaf while another key nests beneath it (`a.b` and `a.b.c`),
//!   which expansion would resolve by dropping the deeper key
//!
//! The checks never change what expansion produces; [`expand_strict`] is just
//! [`check`] followed by [`crate::expand`].

use std::ops::Bound;

use tracing::debug;

use crate::{
    Result,
    constants::SEPARATOR,
    expand::expand_prefixed,
    path::{self, PathError},
    value::{FlatMap, Map},
};

/// Validates every key of a flat mapping.
///
/// ```
/// # use flatnest::{FlatMap, Value, check};
/// let mut flat = FlatMap::new();
/// flat.insert("a.b".to_string(), Value::from(1));
/// assert!(check(&flat).is_ok());
///
/// flat.insert("a.b.c".to_string(), Value::from(2));
/// let err = check(&flat).unwrap_err();
/// assert_eq!(err.path(), Some("a.b"));
/// ```
///
/// # Errors
/// Returns the first problem found, visiting keys in sorted order.
pub fn check(flat: &FlatMap) -> Result<()> {
    check_prefixed(flat, "")
}

/// Validates the keys that [`crate::expand_prefixed`] would read for `prefix`.
///
/// # Errors
/// Returns the first problem found, visiting keys in sorted order.
pub fn check_prefixed(flat: &FlatMap, prefix: &str) -> Result<()> {
    let base = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}{SEPARATOR}")
    };

    for key in flat.keys().filter(|key| key.starts_with(base.as_str())) {
        if let Err(err) = check_key(flat, key) {
            debug!(key = key.as_str(), error = %err, "Strict path check failed");
            return Err(err.into());
        }
    }
    Ok(())
}

fn check_key(flat: &FlatMap, key: &str) -> std::result::Result<(), PathError> {
    path::segments(key)?;

    // Keys nested under `key` sort contiguously from `key.` onwards
    let probe = format!("{key}{SEPARATOR}");
    let nested = flat
        .range::<str, _>((Bound::Included(probe.as_str()), Bound::Unbounded))
        .next()
        .filter(|(candidate, _)| candidate.starts_with(probe.as_str()));

    match nested {
        Some((nested, _)) => Err(PathError::Conflict {
            leaf: key.to_string(),
            nested: nested.clone(),
        }),
        None => Ok(()),
    }
}

/// Checks a flat mapping, then expands it.
///
/// # Errors
/// Returns the first problem [`check`] finds; nothing is expanded in that case.
pub fn expand_strict(flat: &FlatMap) -> Result<Map> {
    expand_strict_prefixed(flat, "")
}

/// Checks the entries under `prefix`, then expands them.
///
/// # Errors
/// Returns the first problem [`check_prefixed`] finds.
pub fn expand_strict_prefixed(flat: &FlatMap, prefix: &str) -> Result<Map> {
    check_prefixed(flat, prefix)?;
    Ok(expand_prefixed(flat, prefix))
}
