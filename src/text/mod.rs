//! Document text analysis
//!
//! Everything that reads the GeoJSON document as raw text: syntactic
//! validation, canonical pretty-printing, and locating features by cursor
//! offset or by id without a position-preserving parse.
//!
//! ## Modules
//!
//! - `scanner`: string-aware scan for the `features` array and its elements
//! - `locator`: offset → feature index and id → offset lookups
//! - `canonical`: validation and the canonical pretty-printed form

pub mod canonical;
pub mod locator;
pub mod scanner;

// Re-exports for convenience
pub use canonical::{canonicalize, to_canonical_string, validate_json};
pub use locator::{
    locate_feature_by_id, locate_feature_by_id_with, locate_feature_containing,
    locate_feature_span,
};
pub use scanner::{
    depth_at, feature_spans, find_features_array, is_feature_collection, FeatureLocation,
    FeatureSpans,
};
