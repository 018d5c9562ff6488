//!
//! Flatnest: converts between nested data and flat, path-keyed mappings.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: A closed description of structured data. Leaves are
//!   scalars, text, bytes or null; branches are string-keyed maps, records with named
//!   fields, and lists.
//! * **Path strings (`path`)**: Keys such as `servers[0].host`, where `.` separates
//!   names and `[i]` marks a list position appended directly to the previous segment.
//! * **Flattening (`flatten`)**: Walks a nested value depth-first and records every
//!   leaf under its path string in a [`FlatMap`].
//! * **Expanding (`expand`)**: Rebuilds nested maps from a [`FlatMap`]. Expansion only
//!   ever produces maps; bracketed indices stay ordinary keys.
//! * **Normalization (`ser`)**: Any `T: Serialize` can be turned into a [`Value`], so
//!   host structs, maps and collections flatten without manual conversion.
//! * **Strict checking (`strict`)**: The core functions never fail and silently skip
//!   input they cannot represent. The strict layer reports those cases instead.
//!
//! ```
//! use flatnest::{Value, expand, flatten};
//!
//! let nested = Value::from(serde_json::json!({
//!     "server": { "host": "localhost", "port": 8080 },
//!     "tags": ["a", "b"],
//! }));
//!
//! let flat = flatten(&nested);
//! assert_eq!(flat["server.host"], "localhost");
//! assert_eq!(flat["server.port"], 8080);
//! assert_eq!(flat["tags[1]"], "b");
//!
//! let rebuilt = expand(&flat);
//! assert_eq!(rebuilt["server"].as_map().unwrap()["port"], 8080);
//! ```

pub mod constants;
pub mod expand;
pub mod flatten;
pub mod path;
pub mod ser;
pub mod strict;
pub mod value;

pub use expand::{expand, expand_into, expand_prefixed};
pub use flatten::{flatten, flatten_into, flatten_prefixed, to_flat_map, to_flat_map_prefixed};
pub use path::{PathError, Segment};
pub use ser::{SerializeError, to_value};
pub use strict::{check, check_prefixed, expand_strict, expand_strict_prefixed};
pub use value::{FlatMap, Map, Record, Value};

/// Result type used throughout the Flatnest library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Flatnest library.
///
/// Only the additive surfaces can fail: normalizing a host type through serde, and
/// strict path checking. Plain flattening and expansion are infallible.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured path errors from the path and strict modules
    #[error(transparent)]
    Path(PathError),

    /// Structured normalization errors from the ser module
    #[error(transparent)]
    Serialize(SerializeError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) => "path",
            Error::Serialize(_) => "ser",
        }
    }

    /// Check if this error describes a malformed or conflicting path.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this error came from a `Serialize` implementation.
    pub fn is_serialize_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }

    /// Get the offending path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Path(path_err) => Some(path_err.path()),
            Error::Serialize(_) => None,
        }
    }
}
