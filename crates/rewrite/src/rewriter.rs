//! Deep value rewriter
//!
//! Walks a [`Value`] in place and replaces every reference of the source
//! form with its counterpart from the [`Resolver`]. Everything else is left
//! byte-for-byte: sequence lengths and order, mapping keys and order,
//! non-string scalars, text around references, references of the other form.
//!
//! # Traversal
//!
//! - Strings are scanned with the [`Matcher`]; a string is replaced only
//!   after every match in it has been handled
//! - Sequences and mappings are visited in order; mapping keys are never
//!   rewritten
//! - Entities are visited once per call, keyed by handle identity, so shared
//!   and cyclic graphs terminate. Each rewritable property is read and
//!   rewritten with no entity lock held; changed properties are queued
//! - Containers nested past `max_depth` are skipped and reported
//!
//! Queued entity writes are applied only once the whole walk has succeeded,
//! so a cancelled or failed call leaves every entity as it found it.
//! Cancellation is polled between sequence elements, mapping entries and
//! entity properties.

use crate::cancel::CancelToken;
use crate::config::{ConfigError, RefsConfig};
use crate::error::{ConvertError, ConvertResult};
use crate::matcher::{Matcher, ReferenceForm};
use crate::report::{RewriteReport, ShapeFailure, UnresolvedReference, UnsupportedShape};
use crate::resolver::Resolver;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;
use strata_refs_core::limits::check_depth;
use strata_refs_core::{EntityHandle, Location, Value, ValuePath, MAX_NESTING_DEPTH};
use tracing::{debug, warn};

/// Which way references are converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Locations become stable ids (before persisting)
    ToSymbolic,
    /// Stable ids become locations (after reading)
    ToLocation,
}

impl Direction {
    /// Form of the references this direction replaces
    pub fn source_form(self) -> ReferenceForm {
        match self {
            Direction::ToSymbolic => ReferenceForm::Location,
            Direction::ToLocation => ReferenceForm::Symbolic,
        }
    }

    /// Form the replacements are written in
    pub fn target_form(self) -> ReferenceForm {
        self.reverse().source_form()
    }

    /// The opposite direction
    pub fn reverse(self) -> Direction {
        match self {
            Direction::ToSymbolic => Direction::ToLocation,
            Direction::ToLocation => Direction::ToSymbolic,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToSymbolic => write!(f, "to_symbolic"),
            Direction::ToLocation => write!(f, "to_location"),
        }
    }
}

/// Matcher, resolver and settings for in-place rewriting
#[derive(Debug)]
pub struct Rewriter {
    matcher: Arc<Matcher>,
    resolver: Resolver,
    roots: Vec<Location>,
    max_depth: usize,
    warn_unresolved: bool,
}

impl Rewriter {
    /// Build a rewriter from a validated config
    pub fn new(
        matcher: Arc<Matcher>,
        resolver: Resolver,
        config: &RefsConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Rewriter {
            roots: config.root_locations()?,
            matcher,
            resolver,
            max_depth: config.max_depth,
            warn_unresolved: config.warn_unresolved,
        })
    }

    /// Build a rewriter with the default settings
    pub fn with_defaults(matcher: Arc<Matcher>, resolver: Resolver) -> Self {
        Rewriter {
            matcher,
            resolver,
            roots: Vec::new(),
            max_depth: MAX_NESTING_DEPTH,
            warn_unresolved: true,
        }
    }

    /// The matcher used to find references
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The resolver used to translate references
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Rewrite `value` in place
    ///
    /// # Errors
    ///
    /// - `AmbiguousMatch` as soon as a string holds an ambiguous span
    /// - `Cancelled` if `cancel` fires
    ///
    /// On error `value` may be partly converted; entities are never written.
    pub fn rewrite(
        &self,
        value: &mut Value,
        direction: Direction,
        cancel: Option<&CancelToken>,
    ) -> ConvertResult<RewriteReport> {
        let mut walk = Walk {
            rewriter: self,
            direction,
            cancel,
            path: ValuePath::root(),
            visited: FxHashSet::default(),
            pending: Vec::new(),
            report: RewriteReport::default(),
        };
        walk.visit(value, 0)?;
        let writes = walk.commit();
        debug!(
            target: "strata::refs",
            %direction,
            entities = walk.visited.len(),
            writes,
            unresolved = walk.report.unresolved.len(),
            unsupported = walk.report.unsupported.len(),
            "Rewrite complete"
        );
        Ok(walk.report)
    }

    /// Locations outside the configured roots are plain text
    fn in_scope(&self, location: &str) -> bool {
        if self.roots.is_empty() {
            return true;
        }
        match Location::new(location) {
            Ok(location) => self.roots.iter().any(|root| root.contains(&location)),
            Err(_) => true,
        }
    }

    /// What to splice in for one matched span
    ///
    /// Roots apply in both directions: an id whose location lies outside
    /// them stays an id, so the next write sees it unchanged.
    fn replacement(&self, original: &str, form: ReferenceForm) -> Lookup {
        if form == ReferenceForm::Location && !self.in_scope(original) {
            return Lookup::Skip;
        }
        match self.resolver.resolve(original, form) {
            Ok(text) if form == ReferenceForm::Symbolic && !self.in_scope(&text) => Lookup::Skip,
            Ok(text) => Lookup::Found(text),
            Err(_) => Lookup::Missing,
        }
    }
}

enum Lookup {
    Found(String),
    Missing,
    Skip,
}

/// A changed entity property waiting for the walk to finish
struct PendingWrite {
    handle: EntityHandle,
    name: String,
    value: Value,
    path: ValuePath,
}

/// State of one rewrite call
struct Walk<'r, 'c> {
    rewriter: &'r Rewriter,
    direction: Direction,
    cancel: Option<&'c CancelToken>,
    path: ValuePath,
    visited: FxHashSet<usize>,
    pending: Vec<PendingWrite>,
    report: RewriteReport,
}

impl<'r, 'c> Walk<'r, 'c> {
    /// Rewrite one node; returns whether anything changed
    fn visit(&mut self, value: &mut Value, depth: usize) -> ConvertResult<bool> {
        match value {
            Value::String(text) => self.rewrite_text(text),
            Value::Array(items) => {
                if !self.within_depth(depth) {
                    return Ok(false);
                }
                let mut changed = false;
                for (i, item) in items.iter_mut().enumerate() {
                    self.checkpoint()?;
                    self.path.push_index(i);
                    let outcome = self.visit(item, depth + 1);
                    self.path.pop();
                    changed |= outcome?;
                }
                Ok(changed)
            }
            Value::Object(map) => {
                if !self.within_depth(depth) {
                    return Ok(false);
                }
                let mut changed = false;
                for (key, item) in map.iter_mut() {
                    self.checkpoint()?;
                    self.path.push_key(key.as_str());
                    let outcome = self.visit(item, depth + 1);
                    self.path.pop();
                    changed |= outcome?;
                }
                Ok(changed)
            }
            Value::Entity(handle) => {
                self.visit_entity(handle, depth)?;
                // Entities change through their setters at commit
                Ok(false)
            }
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Bytes(_) => {
                Ok(false)
            }
        }
    }

    fn visit_entity(&mut self, handle: &EntityHandle, depth: usize) -> ConvertResult<()> {
        if !self.within_depth(depth) {
            return Ok(());
        }
        if !self.visited.insert(handle.identity()) {
            return Ok(());
        }
        let descriptors = handle.read().properties();
        for descriptor in descriptors {
            self.checkpoint()?;
            if !descriptor.rewritable {
                continue;
            }
            self.path.push_key(descriptor.name.as_str());
            let outcome = self.visit_property(handle, &descriptor.name, depth);
            self.path.pop();
            outcome?;
        }
        Ok(())
    }

    fn visit_property(
        &mut self,
        handle: &EntityHandle,
        name: &str,
        depth: usize,
    ) -> ConvertResult<()> {
        let current = handle.read().get(name);
        let mut value = match current {
            Ok(value) => value,
            Err(err) => {
                self.unsupported(err.into());
                return Ok(());
            }
        };
        if self.visit(&mut value, depth + 1)? {
            self.pending.push(PendingWrite {
                handle: handle.clone(),
                name: name.to_string(),
                value,
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    /// Apply queued entity writes in visit order; returns how many were queued
    fn commit(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for write in pending {
            let written = write.handle.write().set(&write.name, write.value);
            if let Err(err) = written {
                self.unsupported_at(write.path, err.into());
            }
        }
        count
    }

    /// Splice replacements into one string
    fn rewrite_text(&mut self, text: &mut String) -> ConvertResult<bool> {
        let rewriter = self.rewriter;
        let wanted = self.direction.source_form();
        let mut output: Option<String> = None;
        let mut copied = 0;

        for found in rewriter.matcher.find_iter(text) {
            let m = found.map_err(|source| ConvertError::AmbiguousMatch {
                path: self.path.clone(),
                source,
            })?;
            if m.form != wanted {
                continue;
            }
            let original = m.as_str(text);
            match rewriter.replacement(original, m.form) {
                Lookup::Found(replacement) => {
                    let out = output.get_or_insert_with(|| String::with_capacity(text.len()));
                    out.push_str(&text[copied..m.start]);
                    out.push_str(&replacement);
                    copied = m.end;
                }
                Lookup::Missing => self.unresolved(original, m.form),
                Lookup::Skip => {}
            }
        }

        match output {
            Some(mut out) => {
                out.push_str(&text[copied..]);
                *text = out;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn within_depth(&mut self, depth: usize) -> bool {
        match check_depth(depth, self.rewriter.max_depth) {
            Ok(()) => true,
            Err(err) => {
                self.unsupported(ShapeFailure::from(err));
                false
            }
        }
    }

    fn checkpoint(&self) -> ConvertResult<()> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(ConvertError::Cancelled {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn unresolved(&mut self, original: &str, form: ReferenceForm) {
        if self.rewriter.warn_unresolved {
            warn!(
                target: "strata::refs",
                path = %self.path,
                reference = original,
                direction = %self.direction,
                "Unresolved reference left unchanged"
            );
        }
        self.report.unresolved.push(UnresolvedReference {
            path: self.path.clone(),
            original: original.to_string(),
            form,
        });
    }

    fn unsupported(&mut self, reason: ShapeFailure) {
        self.unsupported_at(self.path.clone(), reason);
    }

    fn unsupported_at(&mut self, path: ValuePath, reason: ShapeFailure) {
        warn!(
            target: "strata::refs",
            %path,
            %reason,
            "Skipping unsupported subtree"
        );
        self.report.unsupported.push(UnsupportedShape { path, reason });
    }
}
