//! Core types and traits for symbolic reference resolution
//!
//! This crate defines the foundational types used throughout the system:
//! - StableId: Location-independent identifier of a content item
//! - Location: Mutable hierarchical path of a content item
//! - Value: Payload passed through conversion (scalars, sequences, mappings, entities)
//! - Entity / EntityHandle: Introspection capability for domain objects
//! - ValuePath: Path to a node inside a Value, used in reports
//! - LocationIndex: Lookup collaborator trait
//! - Limits: MAX_NESTING_DEPTH

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod id;
pub mod limits;
pub mod location;
pub mod path;
pub mod traits;
pub mod value;

// Re-export commonly used types and traits
pub use entity::{Entity, EntityHandle, PropertyDescriptor};
pub use error::{IntrospectError, IntrospectResult};
pub use id::{StableId, StableIdError, STABLE_ID_LENGTH};
pub use limits::{LimitError, MAX_NESTING_DEPTH};
pub use location::{is_path_byte, is_word_byte, Location, LocationError, MAX_LOCATION_LENGTH};
pub use path::{PathSegment, ValuePath};
pub use traits::LocationIndex;
pub use value::{Mapping, Value};
