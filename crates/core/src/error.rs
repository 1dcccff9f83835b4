//! Error types for entity introspection
//!
//! Validation errors for the identity types live next to their types
//! ([`StableIdError`](crate::StableIdError), [`LocationError`](crate::LocationError)).
//! This module holds the errors an [`Entity`](crate::Entity) reports when a
//! property cannot be read or written.

use thiserror::Error;

/// Result type alias for entity property access
pub type IntrospectResult<T> = std::result::Result<T, IntrospectError>;

/// Failure to read or write an entity property
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    /// The entity does not declare this property
    #[error("{entity} has no property '{property}'")]
    UnknownProperty {
        /// Entity type name
        entity: String,
        /// Requested property
        property: String,
    },

    /// The supplied value has the wrong shape for the property
    #[error("property '{property}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// Property name
        property: String,
        /// Expected value type
        expected: &'static str,
        /// Actual value type
        actual: &'static str,
    },

    /// The property can be read but not written
    #[error("property '{0}' is read-only")]
    ReadOnly(String),

    /// Any other collaborator failure
    #[error("introspection failed: {0}")]
    Failed(String),
}
