//! Utility modules for the GeoJSON synchronization core

pub mod offsets;

// Re-export commonly used functions
pub use offsets::*;
