//! Reference matching, resolution and rewriting
//!
//! This crate turns references embedded in content into stable ids and
//! back:
//! - Matcher: finds location-form and symbolic-form spans in strings
//! - Resolver: translates between the two via a `LocationIndex`
//! - Rewriter: walks values (including entity graphs) and splices
//!   replacements in place
//! - ReferenceConverter: the public `to_symbolic` / `to_location` facade
//! - RefsConfig: `refs.toml` settings
//! - CancelToken: cooperative cancellation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod facade;
pub mod matcher;
pub mod report;
pub mod resolver;
pub mod rewriter;

pub use cancel::CancelToken;
pub use config::{ConfigError, RefsConfig, CONFIG_FILE_NAME};
pub use error::{ConvertError, ConvertResult};
pub use facade::ReferenceConverter;
pub use matcher::{
    AmbiguousMatch, LocationScanner, Matcher, Matches, ReferenceForm, ReferenceMatch, Scanner,
    SymbolicScanner,
};
pub use report::{Conversion, RewriteReport, ShapeFailure, UnresolvedReference, UnsupportedShape};
pub use resolver::{NotFound, Resolver};
pub use rewriter::{Direction, Rewriter};
