//! Constants used throughout the Flatnest library.
//!
//! The path encoding is fixed: these are the only characters with meaning inside a
//! path string. There is no escaping, so names containing them cannot round trip.

/// Separator placed between two named segments, as in `server.host`.
pub const SEPARATOR: char = '.';

/// Opens a list index suffix, as in `tags[0]`.
pub const INDEX_OPEN: char = '[';

/// Closes a list index suffix.
pub const INDEX_CLOSE: char = ']';
