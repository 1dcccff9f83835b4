//! Conversion results and non-fatal findings
//!
//! A conversion always returns a value. Problems that only affect part of
//! it are listed next to the value:
//!
//! - [`UnresolvedReference`]: the resolver had no answer; the substring was
//!   left as it was
//! - [`UnsupportedShape`]: a subtree could not be walked (entity
//!   introspection failed, or nesting went past the depth limit); the
//!   subtree was left as it was and its siblings were still converted

use crate::matcher::ReferenceForm;
use serde::Serialize;
use strata_refs_core::{IntrospectError, LimitError, Value, ValuePath};
use thiserror::Error;

/// A reference the resolver could not translate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// Path of the string containing the reference
    pub path: ValuePath,
    /// The reference text, unchanged in the output
    pub original: String,
    /// Form the reference was recognized as
    pub form: ReferenceForm,
}

/// Why a subtree was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeFailure {
    /// Entity getter or setter failed
    #[error("introspection failed: {0}")]
    Introspection(#[from] IntrospectError),

    /// Container nested past the configured depth
    #[error("nesting depth {depth} exceeds maximum {max}")]
    DepthExceeded {
        /// Depth of the skipped container
        depth: usize,
        /// Configured limit
        max: usize,
    },
}

impl From<LimitError> for ShapeFailure {
    fn from(err: LimitError) -> Self {
        match err {
            LimitError::NestingTooDeep { depth, max } => ShapeFailure::DepthExceeded { depth, max },
        }
    }
}

/// A subtree left untouched because it could not be walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedShape {
    /// Path of the skipped subtree
    pub path: ValuePath,
    /// What went wrong
    pub reason: ShapeFailure,
}

/// Findings collected during one rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// References left unchanged, in traversal order
    pub unresolved: Vec<UnresolvedReference>,
    /// Subtrees left unchanged, in traversal order
    pub unsupported: Vec<UnsupportedShape>,
}

impl RewriteReport {
    /// No findings at all
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.unsupported.is_empty()
    }
}

/// Converted value plus everything that could not be converted
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The converted value, same shape as the input
    pub value: Value,
    /// References left unchanged, in traversal order
    pub unresolved: Vec<UnresolvedReference>,
    /// Subtrees left unchanged, in traversal order
    pub unsupported: Vec<UnsupportedShape>,
}

impl Conversion {
    /// Pair a rewritten value with its findings
    pub fn new(value: Value, report: RewriteReport) -> Self {
        Conversion {
            value,
            unresolved: report.unresolved,
            unsupported: report.unsupported,
        }
    }

    /// Every reference resolved and every subtree walked
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.unsupported.is_empty()
    }

    /// Discard the findings
    pub fn into_value(self) -> Value {
        self.value
    }
}
