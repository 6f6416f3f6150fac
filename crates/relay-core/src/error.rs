//! Error types for settings handling.
//!
//! Settings are read from and written to a JSON document on disk. Every
//! failure along that path is a [`SettingsError`]; callers decide whether
//! to fail open (keep defaults or the last good snapshot) or surface it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, validating or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The settings document is not valid JSON or has the wrong shape.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range.
    #[error("Invalid value for '{field}': {message}")]
    Invalid {
        /// Dotted path of the offending field
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl SettingsError {
    /// Creates an Io error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an Invalid error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if the file simply does not exist yet.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Returns true if this is a validation error.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
