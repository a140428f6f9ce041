//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for docsift glue code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the tool and binary layers.
pub type Result<T> = anyhow::Result<T>;

/// Why a raw record could not become an [`Entry`](crate::entry::Entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// `location` was missing, empty, or not a string.
    #[error("missing location")]
    MissingLocation,
    /// The record was not a key/value object.
    #[error("record is not an object")]
    NotAnObject,
}

/// A single raw record that cannot be normalized.
///
/// The loader never propagates this; it counts the record as skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed entry: {reason}")]
pub struct MalformedEntry {
    pub reason: MalformedReason,
}

impl MalformedEntry {
    pub const fn missing_location() -> Self {
        Self {
            reason: MalformedReason::MissingLocation,
        }
    }

    pub const fn not_an_object() -> Self {
        Self {
            reason: MalformedReason::NotAnObject,
        }
    }
}

/// Errors surfaced by query operations. These indicate caller misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The result limit was not an integer-like value.
    #[error("invalid result limit: {0}")]
    InvalidLimit(String),
}

/// Error returned when reading or decoding a corpus fails.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The corpus file could not be read.
    #[error("failed to read corpus at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The corpus payload is not valid JSON.
    #[error("corpus is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Valid JSON, but neither a record array nor an object with a `docs` array.
    #[error("unrecognized corpus format: {0}")]
    UnrecognizedFormat(String),
}

/// Error returned when a configuration file cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn malformed_entry_messages_name_the_reason() {
        check!(MalformedEntry::missing_location().to_string() == "malformed entry: missing location");
        check!(
            MalformedEntry::not_an_object().to_string() == "malformed entry: record is not an object"
        );
    }
}
