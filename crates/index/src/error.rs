//! Error types for the location index

use strata_refs_core::{Location, StableId};
use thiserror::Error;

/// Result type alias for index operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Error types for location index mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// No item at this location
    #[error("no item at {0}")]
    NotFound(Location),

    /// Another item already occupies this location
    #[error("location {location} is occupied by {occupant}")]
    LocationOccupied {
        /// The contested location
        location: Location,
        /// Id of the item already there
        occupant: StableId,
    },

    /// Id is assigned to a live item
    #[error("stable id {0} is already in use")]
    IdInUse(StableId),

    /// Id belonged to a deleted item in the current epoch
    #[error("stable id {0} was retired in this epoch and cannot be reused")]
    IdRetired(StableId),

    /// Target lies inside the subtree being moved
    #[error("cannot move {from} into its own subtree at {to}")]
    MoveIntoOwnSubtree {
        /// Source location
        from: Location,
        /// Requested target
        to: Location,
    },
}
