//! strata-refs - symbolic reference resolution for content payloads
//!
//! Content items have two names: a mutable [`Location`] such as
//! `/site/articles/hello-world`, and a [`StableId`] that never changes.
//! Content that links to other items should be stored with stable ids, so
//! renames and moves never break it, and shown with locations.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use strata_refs::{InMemoryLocationIndex, Location, ReferenceConverter, Value};
//!
//! let index = Arc::new(InMemoryLocationIndex::new());
//! let id = index.register(Location::new("/site/x").unwrap()).unwrap();
//! let converter = ReferenceConverter::new(index);
//!
//! let content = Value::mapping([
//!     ("body", Value::from("see /site/x for details")),
//!     ("title", Value::from("Hello")),
//! ]);
//! let stored = converter.to_symbolic(content.clone()).unwrap();
//! assert_eq!(
//!     stored.value.as_object().unwrap()["body"],
//!     Value::from(format!("see {} for details", id))
//! );
//!
//! let shown = converter.to_location(stored.into_value()).unwrap();
//! assert_eq!(shown.value, content);
//! ```
//!
//! # Architecture
//!
//! - `strata-refs-core`: identity types, the [`Value`] model, the [`Entity`]
//!   capability and the [`LocationIndex`] trait
//! - `strata-refs-index`: [`InMemoryLocationIndex`]
//! - `strata-refs-rewrite`: matcher, resolver, rewriter and the
//!   [`ReferenceConverter`] facade

pub use strata_refs_core::{
    Entity, EntityHandle, IntrospectError, IntrospectResult, LimitError, Location, LocationError,
    LocationIndex, Mapping, PathSegment, PropertyDescriptor, StableId, StableIdError, Value,
    ValuePath, MAX_LOCATION_LENGTH, MAX_NESTING_DEPTH, STABLE_ID_LENGTH,
};
pub use strata_refs_index::{IndexError, IndexResult, InMemoryLocationIndex};
pub use strata_refs_rewrite::{
    AmbiguousMatch, CancelToken, ConfigError, Conversion, ConvertError, ConvertResult, Direction,
    LocationScanner, Matcher, NotFound, ReferenceConverter, ReferenceForm, ReferenceMatch,
    RefsConfig, Resolver, RewriteReport, Scanner, ShapeFailure, SymbolicScanner,
    UnresolvedReference, UnsupportedShape, CONFIG_FILE_NAME,
};
