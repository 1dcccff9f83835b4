//! Traversal limits
//!
//! Deeply nested values are rejected subtree-by-subtree rather than
//! recursed into without bound.

use thiserror::Error;

/// Maximum nesting depth of containers below the root (100 levels)
///
/// Prevents stack overflow during recursive rewriting.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Limit validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// Value nesting exceeds maximum depth
    #[error("Nesting too deep: {depth} levels exceeds maximum {max}")]
    NestingTooDeep {
        /// Depth at which the limit was hit
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },
}

/// Check a container depth against a limit
///
/// # Errors
///
/// Returns `LimitError::NestingTooDeep` if `depth > max`.
pub fn check_depth(depth: usize, max: usize) -> Result<(), LimitError> {
    if depth > max {
        Err(LimitError::NestingTooDeep { depth, max })
    } else {
        Ok(())
    }
}
