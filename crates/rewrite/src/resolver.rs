//! Identifier resolver
//!
//! Translates between the two halves of an item's identity by asking the
//! [`LocationIndex`]. Lookups are pure: nothing is cached, and a missing
//! item is always reported as [`NotFound`] rather than substituted.

use crate::matcher::ReferenceForm;
use std::fmt;
use std::sync::Arc;
use strata_refs_core::{Location, LocationIndex, StableId};
use thiserror::Error;

/// The index has no item for this reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no item for {form} reference '{reference}'")]
pub struct NotFound {
    /// The reference text as it appeared in content
    pub reference: String,
    /// Form it was looked up as
    pub form: ReferenceForm,
}

impl NotFound {
    fn location(reference: impl Into<String>) -> Self {
        NotFound {
            reference: reference.into(),
            form: ReferenceForm::Location,
        }
    }

    fn symbolic(reference: impl Into<String>) -> Self {
        NotFound {
            reference: reference.into(),
            form: ReferenceForm::Symbolic,
        }
    }
}

/// Two-way lookup over a shared [`LocationIndex`]
#[derive(Clone)]
pub struct Resolver {
    index: Arc<dyn LocationIndex>,
}

impl Resolver {
    /// Resolve against `index`
    pub fn new(index: Arc<dyn LocationIndex>) -> Self {
        Resolver { index }
    }

    /// Stable id of the item currently at `location`
    pub fn location_to_id(&self, location: &Location) -> Result<StableId, NotFound> {
        self.index
            .id_at(location)
            .ok_or_else(|| NotFound::location(location.as_str()))
    }

    /// Current location of the item with `id`
    pub fn id_to_location(&self, id: &StableId) -> Result<Location, NotFound> {
        self.index
            .location_of(id)
            .ok_or_else(|| NotFound::symbolic(id.as_str()))
    }

    /// Translate reference text of the given form into the other form
    ///
    /// Text that is not a well-formed location or id cannot name an item and
    /// is reported as `NotFound`.
    pub fn resolve(&self, reference: &str, form: ReferenceForm) -> Result<String, NotFound> {
        match form {
            ReferenceForm::Location => {
                let location =
                    Location::new(reference).map_err(|_| NotFound::location(reference))?;
                self.location_to_id(&location).map(StableId::into_string)
            }
            ReferenceForm::Symbolic => {
                let id = StableId::new(reference).map_err(|_| NotFound::symbolic(reference))?;
                self.id_to_location(&id).map(Location::into_string)
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
