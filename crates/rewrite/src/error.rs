//! Error types for conversion
//!
//! Only two things stop a conversion: an ambiguous match and cancellation.
//! Unresolved references and unsupported subtrees are collected in the
//! [`Conversion`](crate::Conversion) report instead.

use crate::matcher::AmbiguousMatch;
use strata_refs_core::ValuePath;
use thiserror::Error;

/// Result type alias for conversion operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Fatal conversion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Two scanners claimed the same span of a string
    #[error("ambiguous reference at '{path}': {source}")]
    AmbiguousMatch {
        /// Path of the string holding the span
        path: ValuePath,
        /// Offending offset and forms
        #[source]
        source: AmbiguousMatch,
    },

    /// The caller's cancel token fired
    #[error("conversion cancelled at '{path}'")]
    Cancelled {
        /// Last traversal boundary reached
        path: ValuePath,
    },
}

impl ConvertError {
    /// Path inside the value where conversion stopped
    pub fn path(&self) -> &ValuePath {
        match self {
            ConvertError::AmbiguousMatch { path, .. } | ConvertError::Cancelled { path } => path,
        }
    }

    /// Was this a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConvertError::Cancelled { .. })
    }
}
