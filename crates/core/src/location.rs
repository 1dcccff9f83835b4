//! Location type
//!
//! A Location is the human-facing, mutable half of a content item's identity:
//! a slash-delimited hierarchical path such as `/site/articles/hello-world`.
//! Renames and moves change an item's Location but never its
//! [`StableId`](crate::StableId).
//!
//! ## Validation
//!
//! Locations must:
//! - Start with `/`
//! - Have at least one character after the leading slash
//! - Contain only path characters: `[A-Za-z0-9_.-/]`
//!
//! These are exactly the strings the location scanner recognizes as a whole,
//! so any Location produced by a resolver can be spliced into content and
//! found again unchanged.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hierarchy separator
pub const SEPARATOR: char = '/';

/// Maximum length of a location in bytes
pub const MAX_LOCATION_LENGTH: usize = 4096;

/// Is `b` allowed inside a location (word chars, digits, `-`, `.`, `/`)
#[inline]
pub fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'/')
}

/// Is `b` a word character (`[A-Za-z0-9_]`)
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Error when validating a location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Empty string, or a lone `/`
    #[error("location cannot be empty")]
    Empty,
    /// Does not start with `/`
    #[error("location must start with '/', got '{0}'")]
    NotAbsolute(char),
    /// Exceeds [`MAX_LOCATION_LENGTH`]
    #[error("location too long: {length} bytes (max {max})")]
    TooLong {
        /// Actual length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Character outside the path alphabet
    #[error("invalid character '{char}' at position {position} (only alphanumeric, underscore, dash, dot, slash allowed)")]
    InvalidChar {
        /// The invalid character
        char: char,
        /// Byte position of the invalid character
        position: usize,
    },
    /// A segment passed to [`Location::join`] was empty or contained `/`
    #[error("invalid segment '{0}'")]
    InvalidSegment(String),
}

/// Hierarchical path of a content item
///
/// ## Examples
///
/// ```
/// use strata_refs_core::Location;
///
/// let articles = Location::new("/site/articles").unwrap();
/// let post = articles.join("hello-world").unwrap();
/// assert_eq!(post.as_str(), "/site/articles/hello-world");
/// assert!(articles.is_ancestor_of(&post));
/// assert_eq!(post.parent(), Some(articles));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Create a Location, validating the input
    ///
    /// # Errors
    ///
    /// Returns `LocationError` if the path is not a valid location.
    pub fn new(path: impl Into<String>) -> Result<Self, LocationError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Location(path))
    }

    /// Validate a candidate location string
    pub fn validate(path: &str) -> Result<(), LocationError> {
        let mut chars = path.char_indices();
        match chars.next() {
            None => return Err(LocationError::Empty),
            Some((_, c)) if c != SEPARATOR => return Err(LocationError::NotAbsolute(c)),
            Some(_) => {}
        }
        if path.len() == 1 {
            return Err(LocationError::Empty);
        }
        if path.len() > MAX_LOCATION_LENGTH {
            return Err(LocationError::TooLong {
                length: path.len(),
                max: MAX_LOCATION_LENGTH,
            });
        }
        for (position, c) in chars {
            if !c.is_ascii() || !is_path_byte(c as u8) {
                return Err(LocationError::InvalidChar { char: c, position });
            }
        }
        Ok(())
    }

    /// Get the path string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the path string
    pub fn into_string(self) -> String {
        self.0
    }

    /// Non-empty segments, in order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of non-empty segments
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment (the item's own name)
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Parent location (None for top-level items)
    pub fn parent(&self) -> Option<Location> {
        let trimmed = self.0.trim_end_matches(SEPARATOR);
        let idx = trimmed.rfind(SEPARATOR)?;
        let parent = &trimmed[..idx];
        if parent.trim_matches(SEPARATOR).is_empty() {
            None
        } else {
            Some(Location(parent.to_string()))
        }
    }

    /// Append one child segment
    pub fn join(&self, segment: &str) -> Result<Location, LocationError> {
        if segment.is_empty() || segment.contains(SEPARATOR) {
            return Err(LocationError::InvalidSegment(segment.to_string()));
        }
        let base = self.0.trim_end_matches(SEPARATOR);
        Location::new(format!("{}{}{}", base, SEPARATOR, segment))
    }

    /// Is `other` strictly below this location
    pub fn is_ancestor_of(&self, other: &Location) -> bool {
        let base = self.0.trim_end_matches(SEPARATOR);
        other.0.len() > base.len() + 1
            && other.0.starts_with(base)
            && other.0.as_bytes()[base.len()] == b'/'
    }

    /// Is `other` this location or below it
    pub fn contains(&self, other: &Location) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// Re-root a location from `from` onto `to`
    ///
    /// Returns None if this location is not `from` or one of its descendants.
    pub fn rebase(&self, from: &Location, to: &Location) -> Option<Location> {
        if self == from {
            return Some(to.clone());
        }
        if !from.is_ancestor_of(self) {
            return None;
        }
        let suffix = &self.0[from.0.trim_end_matches(SEPARATOR).len()..];
        Some(Location(format!(
            "{}{}",
            to.0.trim_end_matches(SEPARATOR),
            suffix
        )))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::new(s)
    }
}

impl TryFrom<String> for Location {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Location::new(value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Ordered maps keyed by Location can be range-scanned by string prefix
impl Borrow<str> for Location {
    fn borrow(&self) -> &str {
        &self.0
    }
}
