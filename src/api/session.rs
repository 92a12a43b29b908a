//! Exported synchronization session
//!
//! `GeoJsonSync` wires one text pane, one map surface and the host page
//! to a [`SyncController`]. Offsets crossing this boundary are UTF-16 code
//! units, the unit JS strings are indexed in.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::bindings::{
    HostBridge, JsHost, JsTextBuffer, JsVisualSurface, TextBufferBridge, VisualSurfaceBridge,
};
use super::helpers::{deserialize_or_default, json_text, serialize, to_js_error};
use super::timer::WindowScheduler;
use crate::models::SyncConfig;
use crate::sync::{Collaborators, SyncController};

#[wasm_bindgen]
pub struct GeoJsonSync {
    controller: Rc<SyncController>,
    text: Rc<TextBufferBridge>,
}

#[wasm_bindgen]
impl GeoJsonSync {
    /// Create a session; `config` may be `undefined` for defaults
    ///
    /// Nothing is subscribed until `attach` is called.
    #[wasm_bindgen(constructor)]
    pub fn new(
        text_buffer: JsTextBuffer,
        visual_surface: JsVisualSurface,
        host: JsHost,
        config: JsValue,
    ) -> Result<GeoJsonSync, JsValue> {
        let config: SyncConfig = deserialize_or_default(config, "Failed to read sync config")?;
        config.validate().map_err(to_js_error)?;

        let text = Rc::new(TextBufferBridge::new(text_buffer));
        let collaborators = Collaborators {
            text: text.clone(),
            visual: Rc::new(VisualSurfaceBridge::new(visual_surface)),
            host: Rc::new(HostBridge::new(host)),
            scheduler: Rc::new(WindowScheduler::new()),
        };

        log::debug!("Creating GeoJSON sync session: {:?}", config);
        Ok(GeoJsonSync {
            controller: SyncController::new(collaborators, config),
            text,
        })
    }

    pub fn attach(&self) {
        self.controller.attach();
    }

    /// Cancel the pending sync and release the map; safe to call repeatedly
    pub fn dispose(&self) {
        self.controller.dispose();
    }

    #[wasm_bindgen(js_name = isDisposed)]
    pub fn is_disposed(&self) -> bool {
        self.controller.is_disposed()
    }

    #[wasm_bindgen(js_name = isSyncPending)]
    pub fn is_sync_pending(&self) -> bool {
        self.controller.is_sync_pending()
    }

    /// Schedule a debounced push of the current text
    #[wasm_bindgen(js_name = onTextChanged)]
    pub fn on_text_changed(&self) {
        self.controller.on_text_changed();
    }

    /// Push the current text immediately, bypassing the debounce window
    #[wasm_bindgen(js_name = pushTextToVisual)]
    pub fn push_text_to_visual(&self) -> bool {
        self.controller.push_text_to_visual()
    }

    /// Write a feature collection from the map back into the text
    ///
    /// Accepts a JSON string or a plain object.
    #[wasm_bindgen(js_name = onVisualChanged)]
    pub fn on_visual_changed(&self, payload: JsValue) -> Result<(), JsValue> {
        let payload = json_text(&payload).map_err(to_js_error)?;
        self.controller.on_visual_changed(&payload).map_err(to_js_error)
    }

    /// Pan the map to the feature under a caret offset; returns its index
    #[wasm_bindgen(js_name = onCursorMoved)]
    pub fn on_cursor_moved(&self, utf16_offset: u32) -> Option<u32> {
        let offset = self.text.to_byte_offset(utf16_offset);
        self.controller.on_cursor_moved(offset).map(|index| index as u32)
    }

    /// Move the caret to a feature selected on the map; returns the caret offset
    #[wasm_bindgen(js_name = onFeatureSelected)]
    pub fn on_feature_selected(&self, feature_id: &str) -> Option<u32> {
        self.controller
            .on_feature_selected_in_visual(feature_id)
            .map(|offset| self.text.to_utf16_offset(offset))
    }

    #[wasm_bindgen(js_name = onAppearanceChanged)]
    pub fn on_appearance_changed(&self) {
        self.controller.on_appearance_changed();
    }

    /// Replace one feature's properties with a JSON object (or `null`)
    #[wasm_bindgen(js_name = updateFeatureProperties)]
    pub fn update_feature_properties(
        &self,
        feature_id: &str,
        properties_json: &str,
    ) -> Result<(), JsValue> {
        self.controller
            .update_feature_properties(feature_id, properties_json)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = deleteFeature)]
    pub fn delete_feature(&self, feature_id: &str) -> Result<(), JsValue> {
        self.controller.delete_feature(feature_id).map_err(to_js_error)
    }

    /// Sync counters as a plain object
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        serialize(&self.controller.stats(), "Failed to serialize sync stats")
    }

    /// Effective configuration as a plain object
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serialize(self.controller.config(), "Failed to serialize sync config")
    }
}
