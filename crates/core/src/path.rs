//! Paths within a Value
//!
//! A [`ValuePath`] names one node inside a (possibly nested) [`Value`](crate::Value):
//! mapping keys and entity properties are `.key` segments, sequence
//! elements are `[n]` segments. Every unresolved reference and unsupported
//! subtree is reported with the path that led to it.
//!
//! The `Display` form is for logs and messages only. Keys are printed
//! verbatim, so it is not a parseable syntax; the serialized form keeps the
//! segments.
//!
//! | Display | Meaning |
//! |---------|---------|
//! | `body` | Mapping key / entity property at the root |
//! | `[0]` | Sequence index |
//! | `blocks[2].text` | Mixed |
//! | (empty) | Root |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A segment in a value path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Mapping key or entity property: `.foo`
    Key(String),
    /// Sequence index: `[0]`
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A path into a Value
///
/// # Examples
///
/// ```
/// use strata_refs_core::ValuePath;
///
/// let path = ValuePath::root().key("blocks").index(2).key("text");
/// assert_eq!(path.to_string(), "blocks[2].text");
/// assert_eq!(path.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ValuePath {
    segments: SmallVec<[PathSegment; 8]>,
}

impl ValuePath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        ValuePath::default()
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path (empty)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Push a key segment (mutating)
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment (mutating)
    pub fn push_index(&mut self, idx: usize) {
        self.segments.push(PathSegment::Index(idx));
    }

    /// Remove and return the last segment
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Key(k) if i == 0 => f.write_str(k)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}
