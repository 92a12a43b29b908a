//! Stateless text functions
//!
//! Locator and canonicalization helpers usable without a session, e.g.
//! from a worker or a test page. Offsets are UTF-16 code units.

use wasm_bindgen::prelude::*;

use super::helpers::to_js_error;
use crate::models::config::DEFAULT_INDENT;
use crate::models::IdLookup;
use crate::text::{
    canonicalize, locate_feature_by_id_with, locate_feature_containing, validate_json,
};
use crate::utils::{byte_to_utf16_offset, utf16_to_byte_offset};

/// Index of the feature in `features` whose braces enclose the offset
#[wasm_bindgen(js_name = locateFeatureContaining)]
pub fn locate_feature_containing_js(text: &str, utf16_offset: u32) -> Option<u32> {
    let offset = utf16_to_byte_offset(text, utf16_offset as usize);
    locate_feature_containing(text, offset).map(|index| index as u32)
}

/// Offset of the opening brace of the feature with the given string id
///
/// `loose` accepts the first textual id match even when it does not belong
/// to an element of the `features` array.
#[wasm_bindgen(js_name = locateFeatureById)]
pub fn locate_feature_by_id_js(text: &str, feature_id: &str, loose: Option<bool>) -> Option<u32> {
    let mode = if loose.unwrap_or(false) { IdLookup::Loose } else { IdLookup::Strict };
    locate_feature_by_id_with(text, feature_id, mode)
        .map(|offset| byte_to_utf16_offset(text, offset) as u32)
}

/// Pretty-print a JSON object in the canonical document form
#[wasm_bindgen(js_name = canonicalizeGeoJson)]
pub fn canonicalize_geojson(payload: &str, indent: Option<u32>) -> Result<String, JsValue> {
    let indent = indent.map_or(DEFAULT_INDENT, |n| n as usize);
    canonicalize(payload, indent).map_err(to_js_error)
}

#[wasm_bindgen(js_name = isValidJson)]
pub fn is_valid_json(text: &str) -> bool {
    validate_json(text).is_ok()
}
