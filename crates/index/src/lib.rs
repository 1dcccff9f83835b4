//! Location index for symbolic reference resolution
//!
//! Provides an in-memory implementation of [`LocationIndex`](strata_refs_core::LocationIndex):
//! - NamespaceState: unsynchronized two-way id/location mapping
//! - InMemoryLocationIndex: lock-protected index with rename, move,
//!   delete and id retirement
//!
//! Hosts with their own content repository implement the trait directly;
//! this crate backs tests, tools and small embedded deployments.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod memory;
pub mod state;

pub use error::{IndexError, IndexResult};
pub use memory::InMemoryLocationIndex;
pub use state::{Move, NamespaceState};
