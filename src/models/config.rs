//! Synchronization settings
//!
//! Settings come from the host as a JS object or as YAML. Every field has a
//! default, so an empty object (or an empty YAML document) is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::ConfigError;

/// Quiet window before a text edit is pushed to the visual surface
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Indent width of the canonical pretty-printed form
pub const DEFAULT_INDENT: usize = 2;

const MAX_INDENT: usize = 16;

/// How `locate_feature_by_id` treats id literals outside a feature's own key
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdLookup {
    /// Only accept matches that resolve to an element of the `features` array
    #[default]
    Strict,
    /// First textual match wins, resolved to its nearest enclosing object
    Loose,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    pub debounce_ms: u64,
    pub indent: usize,
    /// Ask the host to run its own formatter after each write-back
    pub reformat_after_write_back: bool,
    pub id_lookup: IdLookup,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            indent: DEFAULT_INDENT,
            reformat_after_write_back: true,
            id_lookup: IdLookup::Strict,
        }
    }
}

impl SyncConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SyncConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent > MAX_INDENT {
            return Err(ConfigError::InvalidValue {
                field: "indent",
                reason: format!("{} exceeds the maximum of {}", self.indent, MAX_INDENT),
            });
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
