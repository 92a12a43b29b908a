//! GeoJSON sync WASM API
//!
//! The JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: conversions between Rust values/errors and `JsValue`
//! - `bindings`: imported JS collaborator types and their port bridges
//! - `timer`: `window.setTimeout` scheduler for the debounce
//! - `session`: the exported `GeoJsonSync` class
//! - `locate`: stateless locator and canonicalization functions

pub mod bindings;
pub mod helpers;
pub mod locate;
pub mod session;
pub mod timer;

// Re-export the public JS surface
pub use bindings::{
    HostBridge, JsHost, JsTextBuffer, JsVisualSurface, TextBufferBridge, VisualSurfaceBridge,
};
pub use locate::{
    canonicalize_geojson, is_valid_json, locate_feature_by_id_js, locate_feature_containing_js,
};
pub use session::GeoJsonSync;
pub use timer::WindowScheduler;
