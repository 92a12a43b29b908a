//! Data models for the GeoJSON synchronization core
//!
//! The GeoJSON model, host-supplied presentation parameters, and the
//! synchronization settings.

pub mod config;
pub mod geojson;
pub mod presentation;

// Re-export commonly used types
pub use config::{IdLookup, SyncConfig};
pub use geojson::{Feature, FeatureCollection, FeatureId, GeoJsonDocument, Geometry};
pub use presentation::PresentationParams;
