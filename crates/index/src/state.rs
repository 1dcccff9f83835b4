//! Namespace state: the two-way mapping behind the index
//!
//! - `by_location`: ordered Location → StableId, so a subtree is one
//!   contiguous range scan
//! - `by_id`: StableId → Location for O(1) reverse lookup
//! - `retired`: ids of deleted items, never handed out again this epoch
//!
//! This type is not synchronized; [`InMemoryLocationIndex`](crate::InMemoryLocationIndex)
//! wraps it in a lock. Every mutation keeps both maps consistent or leaves
//! them untouched on error.

use crate::error::{IndexError, IndexResult};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::ops::Bound;
use strata_refs_core::{Location, StableId};

/// Planned move of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Item being moved
    pub id: StableId,
    /// Location before the move
    pub from: Location,
    /// Location after the move
    pub to: Location,
}

/// Two-way id/location mapping with id retirement
#[derive(Debug, Default)]
pub struct NamespaceState {
    by_location: BTreeMap<Location, StableId>,
    by_id: FxHashMap<StableId, Location>,
    retired: FxHashSet<StableId>,
}

impl NamespaceState {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live items
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the namespace has no live items
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Current location of an id
    pub fn location_of(&self, id: &StableId) -> Option<&Location> {
        self.by_id.get(id)
    }

    /// Id at a location
    pub fn id_at(&self, location: &Location) -> Option<&StableId> {
        self.by_location.get(location)
    }

    /// Was this id deleted in the current epoch
    pub fn is_retired(&self, id: &StableId) -> bool {
        self.retired.contains(id)
    }

    /// Can this id be assigned to a new item
    pub fn is_available(&self, id: &StableId) -> bool {
        !self.by_id.contains_key(id) && !self.retired.contains(id)
    }

    /// Add an item
    ///
    /// # Errors
    ///
    /// - `IdRetired` if the id was deleted this epoch
    /// - `IdInUse` if the id names a live item
    /// - `LocationOccupied` if another item lives at `location`
    pub fn insert(&mut self, id: StableId, location: Location) -> IndexResult<()> {
        if self.retired.contains(&id) {
            return Err(IndexError::IdRetired(id));
        }
        if self.by_id.contains_key(&id) {
            return Err(IndexError::IdInUse(id));
        }
        if let Some(occupant) = self.by_location.get(&location) {
            return Err(IndexError::LocationOccupied {
                location,
                occupant: occupant.clone(),
            });
        }
        self.by_location.insert(location.clone(), id.clone());
        self.by_id.insert(id, location);
        Ok(())
    }

    /// Items strictly below `root`, in location order
    pub fn descendants(&self, root: &Location) -> Vec<(Location, StableId)> {
        let prefix = format!("{}/", root.as_str().trim_end_matches('/'));
        self.by_location
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(loc, _)| loc.as_str().starts_with(&prefix))
            .filter(|(loc, _)| root.is_ancestor_of(loc))
            .map(|(loc, id)| (loc.clone(), id.clone()))
            .collect()
    }

    /// Items exactly one level below `parent`, in location order
    pub fn children(&self, parent: &Location) -> Vec<(Location, StableId)> {
        self.descendants(parent)
            .into_iter()
            .filter(|(loc, _)| loc.parent().as_ref() == Some(parent))
            .collect()
    }

    /// All items in location order
    pub fn entries(&self) -> Vec<(Location, StableId)> {
        self.by_location
            .iter()
            .map(|(loc, id)| (loc.clone(), id.clone()))
            .collect()
    }

    /// Work out the moves for relocating `from` (and its subtree) to `to`
    ///
    /// Does not mutate; [`apply_moves`](Self::apply_moves) performs them.
    pub fn plan_relocation(&self, from: &Location, to: &Location) -> IndexResult<Vec<Move>> {
        let root_id = self
            .by_location
            .get(from)
            .ok_or_else(|| IndexError::NotFound(from.clone()))?;
        if from == to {
            return Ok(Vec::new());
        }
        if from.is_ancestor_of(to) {
            return Err(IndexError::MoveIntoOwnSubtree {
                from: from.clone(),
                to: to.clone(),
            });
        }

        let mut moves = vec![Move {
            id: root_id.clone(),
            from: from.clone(),
            to: to.clone(),
        }];
        for (loc, id) in self.descendants(from) {
            if let Some(target) = loc.rebase(from, to) {
                moves.push(Move {
                    id,
                    from: loc,
                    to: target,
                });
            }
        }

        let moving: FxHashSet<&StableId> = moves.iter().map(|m| &m.id).collect();
        for m in &moves {
            if let Some(occupant) = self.by_location.get(&m.to) {
                if !moving.contains(occupant) {
                    return Err(IndexError::LocationOccupied {
                        location: m.to.clone(),
                        occupant: occupant.clone(),
                    });
                }
            }
        }
        Ok(moves)
    }

    /// Apply planned moves; ids are unchanged
    pub fn apply_moves(&mut self, moves: &[Move]) {
        for m in moves {
            self.by_location.remove(&m.from);
        }
        for m in moves {
            self.by_location.insert(m.to.clone(), m.id.clone());
            self.by_id.insert(m.id.clone(), m.to.clone());
        }
    }

    /// Delete the item at `location` and its subtree, retiring their ids
    ///
    /// Returns the retired ids, root first.
    pub fn remove(&mut self, location: &Location) -> IndexResult<Vec<StableId>> {
        let root_id = self
            .by_location
            .get(location)
            .cloned()
            .ok_or_else(|| IndexError::NotFound(location.clone()))?;

        let mut removed = vec![root_id];
        removed.extend(self.descendants(location).into_iter().map(|(_, id)| id));

        for id in &removed {
            if let Some(loc) = self.by_id.remove(id) {
                self.by_location.remove(&loc);
            }
            self.retired.insert(id.clone());
        }
        Ok(removed)
    }

    /// Forget retired ids; returns how many were released
    pub fn clear_retired(&mut self) -> usize {
        let count = self.retired.len();
        self.retired.clear();
        count
    }
}
