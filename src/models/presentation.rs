//! Presentation parameters handed to the visual surface on reload

use serde::{Deserialize, Serialize};

/// Appearance-derived settings for the renderer
///
/// The core only compares these for equality; their meaning belongs to the
/// renderer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PresentationParams {
    /// Theme name reported by the host ("light", "dark", ...)
    pub theme: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub accent: Option<String>,
}
