//! Conversion configuration via `refs.toml`
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Invalid values are rejected by [`RefsConfig::validate`]
//! before a converter is built.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use strata_refs_core::{Location, LocationError, MAX_NESTING_DEPTH};
use thiserror::Error;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "refs.toml";

/// Errors loading, saving or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file '{}': {}", .path.display(), .source)]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The content is not valid TOML for this config
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `max_depth` outside `1..=MAX_NESTING_DEPTH`
    #[error("max_depth must be between 1 and {max}, got {value}")]
    InvalidDepth {
        /// Configured value
        value: usize,
        /// Upper bound
        max: usize,
    },

    /// An entry of `roots` is not a location
    #[error("invalid root '{root}': {source}")]
    InvalidRoot {
        /// Configured entry
        root: String,
        /// Why it was rejected
        #[source]
        source: LocationError,
    },
}

/// Conversion settings loaded from `refs.toml`
///
/// # Example
///
/// ```toml
/// max_depth = 100
/// roots = ["/site", "/media"]
/// warn_unresolved = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefsConfig {
    /// Deepest container the rewriter descends into.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Location prefixes treated as references, in both directions.
    /// Empty means every location is a candidate.
    #[serde(default)]
    pub roots: Vec<String>,
    /// Log a warning for every unresolved reference.
    #[serde(default = "default_warn_unresolved")]
    pub warn_unresolved: bool,
}

fn default_max_depth() -> usize {
    MAX_NESTING_DEPTH
}

fn default_warn_unresolved() -> bool {
    true
}

impl Default for RefsConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            roots: Vec::new(),
            warn_unresolved: default_warn_unresolved(),
        }
    }
}

impl RefsConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RefsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check field values
    ///
    /// # Errors
    ///
    /// - `InvalidDepth` if `max_depth` is 0 or above [`MAX_NESTING_DEPTH`]
    /// - `InvalidRoot` for the first root that is not a valid location
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.root_locations().map(|_| ())
    }

    /// Validated `roots`, parsed
    pub fn root_locations(&self) -> Result<Vec<Location>, ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_NESTING_DEPTH {
            return Err(ConfigError::InvalidDepth {
                value: self.max_depth,
                max: MAX_NESTING_DEPTH,
            });
        }
        self.roots
            .iter()
            .map(|root| {
                Location::new(root.as_str()).map_err(|source| ConfigError::InvalidRoot {
                    root: root.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Reference conversion configuration
#
# Deepest container (sequence, mapping or entity) the rewriter descends into.
# Anything nested deeper is reported as unsupported and left unchanged.
max_depth = 100

# Location prefixes that count as references. Locations outside them, and
# ids that resolve outside them, are left as they are in both directions.
# Empty (default) treats every location-shaped span as a reference.
# roots = ["/site", "/media"]
roots = []

# Log a warning for each reference that could not be resolved.
warn_unresolved = true
"#
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
