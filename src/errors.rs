//! Error types for the synchronization core
//!
//! Only `WriteBackFailed` is meant to reach the end user unconditionally.
//! The remaining variants are either recovered by the controller (skipped
//! sync passes, silent no-ops) or surfaced inside explicit user edits.

use thiserror::Error;

/// Top-level synchronization error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Text is not syntactically valid JSON (or not the shape an edit needs)
    #[error("Invalid JSON: {0}")]
    MalformedDocument(String),

    /// Document has no usable `features` array
    #[error("No feature data: {0}")]
    MissingOrEmptyFeatureData(String),

    /// Offset or id could not be resolved to a feature in the text
    #[error("Nothing found at {0}")]
    LocatorMiss(String),

    /// An edit referenced a feature id that is not in the document
    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    /// The text buffer rejected a full-text replace
    #[error("Failed to write document: {0}")]
    WriteBackFailed(String),

    /// The host's reformat pass failed after the canonical text was written
    #[error("Reformat failed: {0}")]
    SecondaryFormattingFailed(String),
}

impl SyncError {
    /// Whether the controller recovers from this error without telling anyone
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            SyncError::MalformedDocument(_)
                | SyncError::MissingOrEmptyFeatureData(_)
                | SyncError::LocatorMiss(_)
                | SyncError::SecondaryFormattingFailed(_)
        )
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::MalformedDocument(err.to_string())
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML could not be parsed into a configuration
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value outside its allowed range
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
