//! Core traits for location lookup
//!
//! This module defines the LocationIndex trait that lets the resolver run
//! against any backing store (an in-memory tree, a content repository, a
//! cache in front of a remote service) without changing upper layers.

use crate::id::StableId;
use crate::location::Location;
use std::sync::Arc;

/// Bidirectional lookup between stable ids and current locations
///
/// The index is read-only from the point of view of conversion: lookups
/// never mutate it. A missing or deleted item is reported as `None`, never
/// substituted.
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait LocationIndex: Send + Sync {
    /// Current location of the item with this id
    fn location_of(&self, id: &StableId) -> Option<Location>;

    /// Id of the item currently at this location
    fn id_at(&self, location: &Location) -> Option<StableId>;
}

impl<T: LocationIndex + ?Sized> LocationIndex for Arc<T> {
    fn location_of(&self, id: &StableId) -> Option<Location> {
        (**self).location_of(id)
    }

    fn id_at(&self, location: &Location) -> Option<StableId> {
        (**self).id_at(location)
    }
}

impl<T: LocationIndex + ?Sized> LocationIndex for &T {
    fn location_of(&self, id: &StableId) -> Option<Location> {
        (**self).location_of(id)
    }

    fn id_at(&self, location: &Location) -> Option<StableId> {
        (**self).id_at(location)
    }
}
