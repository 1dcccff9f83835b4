//! Conversion facade
//!
//! [`ReferenceConverter`] is the entry point callers use: `to_symbolic`
//! before persisting content, `to_location` after reading it back. Each call
//! takes ownership of the value and hands back a [`Conversion`]. A failed or
//! cancelled call drops the partly converted value and writes nothing to
//! entities, so no intermediate state escapes.

use crate::cancel::CancelToken;
use crate::config::{ConfigError, RefsConfig};
use crate::error::ConvertResult;
use crate::matcher::Matcher;
use crate::report::Conversion;
use crate::resolver::Resolver;
use crate::rewriter::{Direction, Rewriter};
use std::sync::Arc;
use strata_refs_core::{LocationIndex, Value};

/// Converts references in values between location and symbolic form
///
/// Cheap to clone; clones share the rewriter. Independent calls may run on
/// different threads at once.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use strata_refs_core::{Location, Value};
/// use strata_refs_index::InMemoryLocationIndex;
/// use strata_refs_rewrite::ReferenceConverter;
///
/// let index = Arc::new(InMemoryLocationIndex::new());
/// let id = index.register(Location::new("/site/x").unwrap()).unwrap();
/// let converter = ReferenceConverter::new(index.clone());
///
/// let stored = converter
///     .to_symbolic(Value::from("see /site/x for details"))
///     .unwrap();
/// assert!(stored.is_clean());
/// assert_eq!(stored.value, Value::from(format!("see {} for details", id)));
///
/// // After a rename the stored content resolves to the new location
/// index
///     .relocate(&Location::new("/site/x").unwrap(), Location::new("/site/y").unwrap())
///     .unwrap();
/// let shown = converter.to_location(stored.into_value()).unwrap();
/// assert_eq!(shown.value, Value::from("see /site/y for details"));
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceConverter {
    rewriter: Arc<Rewriter>,
}

impl ReferenceConverter {
    /// Converter over `index` with the standard matcher and default settings
    pub fn new(index: Arc<dyn LocationIndex>) -> Self {
        ReferenceConverter {
            rewriter: Arc::new(Rewriter::with_defaults(
                Matcher::standard(),
                Resolver::new(index),
            )),
        }
    }

    /// Converter over `index` with the standard matcher
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` does not validate.
    pub fn with_config(
        index: Arc<dyn LocationIndex>,
        config: &RefsConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_matcher(index, Matcher::standard(), config)
    }

    /// Converter over `index` with a custom scanner set
    pub fn with_matcher(
        index: Arc<dyn LocationIndex>,
        matcher: Arc<Matcher>,
        config: &RefsConfig,
    ) -> Result<Self, ConfigError> {
        let rewriter = Rewriter::new(matcher, Resolver::new(index), config)?;
        Ok(ReferenceConverter {
            rewriter: Arc::new(rewriter),
        })
    }

    /// Replace location references with stable ids
    pub fn to_symbolic(&self, value: Value) -> ConvertResult<Conversion> {
        self.run(value, Direction::ToSymbolic, None)
    }

    /// Replace stable-id references with current locations
    pub fn to_location(&self, value: Value) -> ConvertResult<Conversion> {
        self.run(value, Direction::ToLocation, None)
    }

    /// Convert in the given direction
    pub fn convert(&self, value: Value, direction: Direction) -> ConvertResult<Conversion> {
        self.run(value, direction, None)
    }

    /// [`to_symbolic`](Self::to_symbolic), stopping early if `cancel` fires
    pub fn to_symbolic_with(&self, value: Value, cancel: &CancelToken) -> ConvertResult<Conversion> {
        self.run(value, Direction::ToSymbolic, Some(cancel))
    }

    /// [`to_location`](Self::to_location), stopping early if `cancel` fires
    pub fn to_location_with(&self, value: Value, cancel: &CancelToken) -> ConvertResult<Conversion> {
        self.run(value, Direction::ToLocation, Some(cancel))
    }

    /// [`convert`](Self::convert), stopping early if `cancel` fires
    pub fn convert_with(
        &self,
        value: Value,
        direction: Direction,
        cancel: &CancelToken,
    ) -> ConvertResult<Conversion> {
        self.run(value, direction, Some(cancel))
    }

    /// The rewriter behind this converter
    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    fn run(
        &self,
        mut value: Value,
        direction: Direction,
        cancel: Option<&CancelToken>,
    ) -> ConvertResult<Conversion> {
        let report = self.rewriter.rewrite(&mut value, direction, cancel)?;
        Ok(Conversion::new(value, report))
    }
}
