//! Path strings for flattened keys.
//!
//! A path string is built from segments joined by `.`. A list position is written as
//! `[i]` directly after the previous segment, with no dot in between:
//!
//! ```text
//! servers[0].host
//! matrix[1][2]
//! [3].name          (a list at the top level)
//! ```
//!
//! There is no escaping. A map key that itself contains `.` or `[` produces a path
//! that decomposes differently from how it was built.
//!
//! # Usage
//!
//! ```rust
//! use flatnest::path::{self, Segment};
//!
//! let key = path::join_key(&path::join_index("servers", 0), "host");
//! assert_eq!(key, "servers[0].host");
//!
//! let segments = path::segments(&key)?;
//! assert_eq!(
//!     segments,
//!     vec![Segment::Key("servers"), Segment::Index(0), Segment::Key("host")]
//! );
//! # Ok::<(), flatnest::PathError>(())
//! ```

use std::fmt;

use thiserror::Error;

use crate::constants::{INDEX_CLOSE, INDEX_OPEN, SEPARATOR};

/// Error type for path validation failures.
///
/// The core flatten and expand functions never produce these; they are raised by
/// [`segments`] and by the strict checking layer.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// A segment between two separators (or at either end) is empty.
    #[error("Empty segment in path '{path}'")]
    EmptySegment { path: String },

    /// A bracketed index is unbalanced or not a decimal number.
    #[error("Malformed index in path '{path}': {reason}")]
    MalformedIndex { path: String, reason: String },

    /// A key holds a leaf while another key nests beneath it.
    #[error("Path '{leaf}' holds a value but '{nested}' nests beneath it")]
    Conflict { leaf: String, nested: String },
}

impl PathError {
    /// Get the path this error is about.
    ///
    /// For conflicts this is the leaf path that would shadow the nested one.
    pub fn path(&self) -> &str {
        match self {
            PathError::EmptySegment { path } | PathError::MalformedIndex { path, .. } => path,
            PathError::Conflict { leaf, .. } => leaf,
        }
    }

    /// Check if this error is a leaf/branch conflict between two keys
    pub fn is_conflict(&self) -> bool {
        matches!(self, PathError::Conflict { .. })
    }
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}

/// One component of a path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    /// A map key or record field name.
    Key(&'a str),
    /// A list position.
    Index(usize),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "{INDEX_OPEN}{index}{INDEX_CLOSE}"),
        }
    }
}

/// Appends a named segment to a prefix.
///
/// An empty prefix yields the key alone.
///
/// ```rust
/// # use flatnest::path::join_key;
/// assert_eq!(join_key("", "user"), "user");
/// assert_eq!(join_key("user", "name"), "user.name");
/// ```
pub fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        return key.to_string();
    }
    let mut joined = String::with_capacity(prefix.len() + 1 + key.len());
    joined.push_str(prefix);
    joined.push(SEPARATOR);
    joined.push_str(key);
    joined
}

/// Appends an index suffix to a prefix. No separator is inserted.
///
/// ```rust
/// # use flatnest::path::join_index;
/// assert_eq!(join_index("tags", 2), "tags[2]");
/// assert_eq!(join_index("", 0), "[0]");
/// ```
pub fn join_index(prefix: &str, index: usize) -> String {
    format!("{prefix}{INDEX_OPEN}{index}{INDEX_CLOSE}")
}

/// Renders segments back into a path string.
pub fn render(segments: &[Segment<'_>]) -> String {
    segments.iter().fold(String::new(), |path, segment| match segment {
        Segment::Key(key) => join_key(&path, key),
        Segment::Index(index) => join_index(&path, *index),
    })
}

/// Decomposes a path string into its segments.
///
/// `.` is the primary delimiter and `[n]` marks an index suffix on the segment it
/// follows. Only the first part may consist of index suffixes alone, which is what
/// flattening a list at the top level produces; `a.[0]` is rejected because no
/// flattened value renders that way.
///
/// # Errors
/// Returns [`PathError::EmptySegment`] for empty parts (including the empty path) and
/// [`PathError::MalformedIndex`] for unbalanced brackets or non-numeric indices.
pub fn segments(path: &str) -> Result<Vec<Segment<'_>>, PathError> {
    let mut out = Vec::new();
    for (position, part) in path.split(SEPARATOR).enumerate() {
        parse_part(path, part, position == 0, &mut out)?;
    }
    Ok(out)
}

fn parse_part<'a>(
    path: &str,
    part: &'a str,
    first: bool,
    out: &mut Vec<Segment<'a>>,
) -> Result<(), PathError> {
    if part.is_empty() {
        return Err(PathError::EmptySegment {
            path: path.to_string(),
        });
    }

    let (name, mut rest) = part.split_at(part.find(INDEX_OPEN).unwrap_or(part.len()));
    if name.contains(INDEX_CLOSE) {
        return Err(malformed(path, format!("unexpected '{INDEX_CLOSE}' in '{name}'")));
    }
    if !name.is_empty() {
        out.push(Segment::Key(name));
    } else if !first {
        return Err(malformed(path, format!("index without a name in '{part}'")));
    }

    while !rest.is_empty() {
        if !rest.starts_with(INDEX_OPEN) {
            return Err(malformed(path, format!("unexpected '{rest}' after index")));
        }
        let close = rest
            .find(INDEX_CLOSE)
            .ok_or_else(|| malformed(path, format!("missing '{INDEX_CLOSE}'")))?;
        let digits = &rest[INDEX_OPEN.len_utf8()..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(path, format!("'{digits}' is not an index")));
        }
        let index = digits
            .parse::<usize>()
            .map_err(|err| malformed(path, err.to_string()))?;
        out.push(Segment::Index(index));
        rest = &rest[close + INDEX_CLOSE.len_utf8()..];
    }

    Ok(())
}

fn malformed(path: &str, reason: String) -> PathError {
    PathError::MalformedIndex {
        path: path.to_string(),
        reason,
    }
}
