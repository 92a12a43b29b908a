//! GeoJSON data structures
//!
//! A structured view of the document, derived from its text on demand and
//! never kept between sync passes. Members the model does not name are kept
//! in `foreign_members` so a parse/serialize cycle does not lose data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::SyncError;

/// Feature identifier as assigned by the visual surface
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(Number),
}

impl FeatureId {
    /// Compare against an id received from the visual surface
    pub fn matches(&self, id: &str) -> bool {
        match self {
            FeatureId::Text(s) => s == id,
            FeatureId::Number(n) => n.to_string() == id,
        }
    }
}

/// A GeoJSON geometry object
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Geometry {
    /// Geometry type ("Point", "LineString", "Polygon", ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Coordinates; absent for GeometryCollection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Value>,

    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

/// A GeoJSON feature
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_ref().is_some_and(|fid| fid.matches(id))
    }
}

/// A GeoJSON feature collection
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,

    pub features: Vec<Feature>,

    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
    /// Parse document text into a feature collection
    ///
    /// Text that is not JSON is `MalformedDocument`; JSON that is not a
    /// `FeatureCollection` with a `features` array is `MissingOrEmptyFeatureData`.
    pub fn from_text(text: &str) -> Result<Self, SyncError> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(SyncError::MissingOrEmptyFeatureData(
                "document is not a FeatureCollection".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| SyncError::MissingOrEmptyFeatureData(e.to_string()))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.has_id(id))
    }

    /// Remove the feature with the given id, returning it
    pub fn remove(&mut self, id: &str) -> Option<Feature> {
        let index = self.features.iter().position(|f| f.has_id(id))?;
        Some(self.features.remove(index))
    }
}

/// What kind of GeoJSON value a document holds
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeoJsonDocument {
    FeatureCollection { feature_count: usize },
    Feature,
    Geometry(String),
    /// Valid JSON without a recognizable `type`
    Untyped,
}

impl GeoJsonDocument {
    /// Classify document text without building the full model
    pub fn classify(text: &str) -> Result<Self, SyncError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::classify_value(&value))
    }

    pub fn classify_value(value: &Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => GeoJsonDocument::FeatureCollection {
                feature_count: value
                    .get("features")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len),
            },
            Some("Feature") => GeoJsonDocument::Feature,
            Some(other) => GeoJsonDocument::Geometry(other.to_string()),
            None => GeoJsonDocument::Untyped,
        }
    }

    /// Whether there is at least one feature to display
    pub fn has_features(&self) -> bool {
        matches!(self, GeoJsonDocument::FeatureCollection { feature_count } if *feature_count > 0)
    }
}
