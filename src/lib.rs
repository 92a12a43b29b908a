//! GeoJSON Editor WASM Module
//!
//! Keeps a GeoJSON document's text and its map rendering in step: debounced
//! text → map pushes, canonical map → text write-backs, and cursor/selection
//! correlation between the two panes.

pub mod api;
pub mod errors;
pub mod models;
pub mod sync;
pub mod text;
pub mod utils;

// Re-export commonly used types
pub use errors::{ConfigError, SyncError};
pub use models::*;
pub use sync::{Collaborators, SyncController, SyncStats};
pub use text::{canonicalize, locate_feature_by_id, locate_feature_containing, validate_json};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();
    log::info!("GeoJSON editor WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("Logger already initialized: {}", e).into());
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
