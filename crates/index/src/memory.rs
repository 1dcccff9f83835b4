//! InMemoryLocationIndex: thread-safe location index
//!
//! This module implements the LocationIndex trait using:
//! - [`NamespaceState`] for the two-way id/location mapping
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for the namespace epoch counter
//!
//! # Design Notes
//!
//! - **Renames move subtrees**: relocating an item relocates every
//!   descendant with it; ids never change
//! - **Ids are not reused**: a deleted item's id stays retired until
//!   [`begin_epoch`](InMemoryLocationIndex::begin_epoch)
//! - **All-or-nothing mutations**: conflicts are detected before either map
//!   is touched

use crate::error::{IndexError, IndexResult};
use crate::state::NamespaceState;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use strata_refs_core::{Location, LocationIndex, StableId};
use tracing::{debug, info};

/// In-memory [`LocationIndex`] with rename/move/delete support
///
/// # Examples
///
/// ```
/// use strata_refs_core::{Location, LocationIndex};
/// use strata_refs_index::InMemoryLocationIndex;
///
/// let index = InMemoryLocationIndex::new();
/// let post = Location::new("/site/articles/hello-world").unwrap();
/// let id = index.register(post.clone()).unwrap();
///
/// // Moving the item keeps its id
/// let moved = Location::new("/site/posts/hello-world").unwrap();
/// index.relocate(&post, moved.clone()).unwrap();
/// assert_eq!(index.location_of(&id), Some(moved));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLocationIndex {
    state: RwLock<NamespaceState>,
    epoch: AtomicU64,
}

impl InMemoryLocationIndex {
    /// Create an empty index at epoch 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from existing (id, location) pairs
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate id or location.
    pub fn with_entries<I>(entries: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = (StableId, Location)>,
    {
        let index = Self::new();
        {
            let mut state = index.state.write();
            for (id, location) in entries {
                state.insert(id, location)?;
            }
        }
        Ok(index)
    }

    /// Add a new item at `location` with a freshly generated id
    pub fn register(&self, location: Location) -> IndexResult<StableId> {
        let mut state = self.state.write();
        let mut id = StableId::generate();
        while !state.is_available(&id) {
            id = StableId::generate();
        }
        state.insert(id.clone(), location.clone())?;
        debug!(target: "strata::refs::index", %id, %location, "Registered item");
        Ok(id)
    }

    /// Add an item with a caller-chosen id
    ///
    /// # Errors
    ///
    /// Rejects ids that are live or retired this epoch, and occupied locations.
    pub fn insert(&self, id: StableId, location: Location) -> IndexResult<()> {
        self.state.write().insert(id.clone(), location.clone())?;
        debug!(target: "strata::refs::index", %id, %location, "Inserted item");
        Ok(())
    }

    /// Rename or move the item at `from` (and its subtree) to `to`
    ///
    /// Returns the number of items whose location changed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing lives at `from`
    /// - `MoveIntoOwnSubtree` if `to` is below `from`
    /// - `LocationOccupied` if any target slot holds an item outside the subtree
    pub fn relocate(&self, from: &Location, to: Location) -> IndexResult<usize> {
        let mut state = self.state.write();
        let moves = state.plan_relocation(from, &to)?;
        state.apply_moves(&moves);
        info!(
            target: "strata::refs::index",
            %from,
            %to,
            moved = moves.len(),
            "Relocated subtree"
        );
        Ok(moves.len())
    }

    /// Delete the item at `location` and everything below it
    ///
    /// Returns the ids that were retired.
    pub fn remove(&self, location: &Location) -> IndexResult<Vec<StableId>> {
        let removed = self.state.write().remove(location)?;
        info!(
            target: "strata::refs::index",
            %location,
            removed = removed.len(),
            "Removed subtree"
        );
        Ok(removed)
    }

    /// Start a new namespace epoch, releasing retired ids
    ///
    /// Returns the new epoch number.
    pub fn begin_epoch(&self) -> u64 {
        let released = self.state.write().clear_retired();
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        info!(target: "strata::refs::index", epoch, released, "Began namespace epoch");
        epoch
    }

    /// Current namespace epoch
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Was this id deleted in the current epoch
    pub fn is_retired(&self, id: &StableId) -> bool {
        self.state.read().is_retired(id)
    }

    /// Number of live items
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Items directly below `parent`
    pub fn children(&self, parent: &Location) -> Vec<(Location, StableId)> {
        self.state.read().children(parent)
    }

    /// All items in location order
    pub fn entries(&self) -> Vec<(Location, StableId)> {
        self.state.read().entries()
    }

    /// Look up the id at `location`, reporting absence as an error
    pub fn require_id(&self, location: &Location) -> IndexResult<StableId> {
        self.state
            .read()
            .id_at(location)
            .cloned()
            .ok_or_else(|| IndexError::NotFound(location.clone()))
    }
}

impl LocationIndex for InMemoryLocationIndex {
    fn location_of(&self, id: &StableId) -> Option<Location> {
        self.state.read().location_of(id).cloned()
    }

    fn id_at(&self, location: &Location) -> Option<StableId> {
        self.state.read().id_at(location).cloned()
    }
}
