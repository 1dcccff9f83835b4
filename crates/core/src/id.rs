//! Stable identifier type
//!
//! Content items have dual identity:
//! - **StableId**: immutable, location-independent token assigned once
//! - **Location**: where the item currently lives (see [`crate::location`])
//!
//! A StableId never changes when its item is renamed or moved, which is what
//! lets stored content survive restructuring of the namespace.
//!
//! ## Canonical Encoding
//!
//! Exactly [`STABLE_ID_LENGTH`] ASCII alphanumeric characters. Freshly
//! generated ids use the simple (hyphen-less) lowercase UUID v4 encoding,
//! e.g. `a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Length of a StableId's canonical textual encoding
pub const STABLE_ID_LENGTH: usize = 32;

/// Error when validating a stable id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StableIdError {
    /// Wrong number of characters
    #[error("stable id must be {expected} characters, got {length}")]
    InvalidLength {
        /// Actual length in bytes
        length: usize,
        /// Required length
        expected: usize,
    },
    /// Non-alphanumeric character
    #[error("invalid character '{char}' at position {position} in stable id (only ASCII alphanumeric allowed)")]
    InvalidChar {
        /// The invalid character
        char: char,
        /// Byte position of the invalid character
        position: usize,
    },
}

/// Location-independent identifier of one content item
///
/// ## Examples
///
/// ```
/// use strata_refs_core::StableId;
///
/// let id = StableId::new("a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4").unwrap();
/// assert_eq!(id.as_str().len(), 32);
///
/// let fresh = StableId::generate();
/// assert_ne!(fresh, id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StableId(String);

impl StableId {
    /// Create a StableId, validating the encoding
    ///
    /// # Errors
    ///
    /// Returns `StableIdError` if the input is not exactly 32 ASCII
    /// alphanumeric characters.
    pub fn new(id: impl Into<String>) -> Result<Self, StableIdError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(StableId(id))
    }

    /// Generate a fresh random id (UUID v4, simple encoding)
    pub fn generate() -> Self {
        StableId(Uuid::new_v4().simple().to_string())
    }

    /// Derive the id for a UUID (simple lowercase encoding)
    pub fn from_uuid(uuid: Uuid) -> Self {
        StableId(uuid.simple().to_string())
    }

    /// Validate a candidate id string
    pub fn validate(id: &str) -> Result<(), StableIdError> {
        if id.len() != STABLE_ID_LENGTH {
            return Err(StableIdError::InvalidLength {
                length: id.len(),
                expected: STABLE_ID_LENGTH,
            });
        }
        if let Some((position, char)) = id.char_indices().find(|(_, c)| !c.is_ascii_alphanumeric())
        {
            return Err(StableIdError::InvalidChar { char, position });
        }
        Ok(())
    }

    /// Get the canonical encoding
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the canonical encoding
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StableId {
    type Err = StableIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StableId::new(s)
    }
}

impl TryFrom<String> for StableId {
    type Error = StableIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StableId::new(value)
    }
}

impl From<StableId> for String {
    fn from(id: StableId) -> Self {
        id.0
    }
}

impl AsRef<str> for StableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
