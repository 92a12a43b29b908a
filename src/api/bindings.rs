//! JavaScript collaborators
//!
//! Imported JS object types for the text pane, the map surface and the
//! host, plus bridges implementing the core's port traits on top of them.
//! The bridges own the `Closure`s handed to JS, so listeners are freed with
//! the bridge. JS speaks UTF-16 offsets; the bridges convert to and from
//! byte offsets against the current document text.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::helpers::{js_error_message, json_text};
use crate::models::PresentationParams;
use crate::sync::ports::{
    ChangeCallback, HostEnvironment, OffsetCallback, PayloadCallback, TextBuffer, VisualSurface,
};
use crate::utils::{byte_to_utf16_offset, utf16_to_byte_offset};

#[wasm_bindgen]
extern "C" {
    /// Text pane object supplied by the host page
    #[derive(Clone, Debug)]
    pub type JsTextBuffer;

    #[wasm_bindgen(method, js_name = getText)]
    fn get_text(this: &JsTextBuffer) -> String;

    #[wasm_bindgen(method, catch, js_name = replaceAllText)]
    fn replace_all_text(this: &JsTextBuffer, text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = subscribeToChanges)]
    fn subscribe_to_changes(this: &JsTextBuffer, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getCaretOffset)]
    fn get_caret_offset(this: &JsTextBuffer) -> u32;

    #[wasm_bindgen(method, js_name = setCaretOffset)]
    fn set_caret_offset(this: &JsTextBuffer, offset: u32);

    #[wasm_bindgen(method, js_name = scrollToCaret)]
    fn scroll_to_caret(this: &JsTextBuffer);

    #[wasm_bindgen(method, js_name = subscribeToCaretMoves)]
    fn subscribe_to_caret_moves(this: &JsTextBuffer, callback: &js_sys::Function);

    /// Map renderer object (draw tools included)
    #[derive(Clone, Debug)]
    pub type JsVisualSurface;

    #[wasm_bindgen(method, js_name = loadFeatureCollection)]
    fn load_feature_collection(this: &JsVisualSurface, json_text: &str);

    #[wasm_bindgen(method, js_name = subscribeToFeatureSetChanges)]
    fn subscribe_to_feature_set_changes(this: &JsVisualSurface, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = subscribeToFeatureSelection)]
    fn subscribe_to_feature_selection(this: &JsVisualSurface, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = panOrFitToFeatureIndex)]
    fn pan_or_fit_to_feature_index(this: &JsVisualSurface, index: u32);

    #[wasm_bindgen(method)]
    fn reload(this: &JsVisualSurface, params: JsValue);

    #[wasm_bindgen(method)]
    fn release(this: &JsVisualSurface);

    /// Host page services
    #[derive(Clone, Debug)]
    pub type JsHost;

    #[wasm_bindgen(method, js_name = subscribeToAppearanceChange)]
    fn subscribe_to_appearance_change(this: &JsHost, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getAppearanceParams)]
    fn get_appearance_params(this: &JsHost) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = reformatDocument)]
    fn reformat_document(this: &JsHost) -> Result<(), JsValue>;
}

// ============================================================================
// Text Buffer
// ============================================================================

pub struct TextBufferBridge {
    js: JsTextBuffer,
    change_listeners: RefCell<Vec<Closure<dyn Fn()>>>,
    caret_listeners: RefCell<Vec<Closure<dyn Fn(u32)>>>,
}

impl TextBufferBridge {
    pub fn new(js: JsTextBuffer) -> Self {
        Self {
            js,
            change_listeners: RefCell::new(Vec::new()),
            caret_listeners: RefCell::new(Vec::new()),
        }
    }

    /// Byte offset in the current text for a JS offset
    pub fn to_byte_offset(&self, utf16_offset: u32) -> usize {
        utf16_to_byte_offset(&self.js.get_text(), utf16_offset as usize)
    }

    /// JS offset for a byte offset in the current text
    pub fn to_utf16_offset(&self, byte_offset: usize) -> u32 {
        byte_to_utf16_offset(&self.js.get_text(), byte_offset) as u32
    }
}

impl TextBuffer for TextBufferBridge {
    fn text(&self) -> String {
        self.js.get_text()
    }

    fn replace_all_text(&self, text: &str) -> Result<(), String> {
        self.js.replace_all_text(text).map_err(|e| js_error_message(&e))
    }

    fn subscribe_to_changes(&self, callback: ChangeCallback) {
        let closure = Closure::<dyn Fn()>::new(move || callback());
        self.js.subscribe_to_changes(closure.as_ref().unchecked_ref());
        self.change_listeners.borrow_mut().push(closure);
    }

    fn caret_offset(&self) -> usize {
        self.to_byte_offset(self.js.get_caret_offset())
    }

    fn set_caret_offset(&self, offset: usize) {
        self.js.set_caret_offset(self.to_utf16_offset(offset));
    }

    fn scroll_to_caret(&self) {
        self.js.scroll_to_caret();
    }

    fn subscribe_to_caret_moves(&self, callback: OffsetCallback) {
        let js = self.js.clone();
        let closure = Closure::<dyn Fn(u32)>::new(move |utf16_offset: u32| {
            callback(utf16_to_byte_offset(&js.get_text(), utf16_offset as usize));
        });
        self.js.subscribe_to_caret_moves(closure.as_ref().unchecked_ref());
        self.caret_listeners.borrow_mut().push(closure);
    }
}

// ============================================================================
// Visual Surface
// ============================================================================

pub struct VisualSurfaceBridge {
    js: JsVisualSurface,
    listeners: RefCell<Vec<Closure<dyn Fn(JsValue)>>>,
}

impl VisualSurfaceBridge {
    pub fn new(js: JsVisualSurface) -> Self {
        Self {
            js,
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn listen(
        &self,
        subscribe: fn(&JsVisualSurface, &js_sys::Function),
        callback: PayloadCallback,
        what: &'static str,
    ) {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            match json_text(&value) {
                Ok(text) => callback(&text),
                Err(e) => log::error!("Unreadable {} from visual surface: {}", what, e),
            }
        });
        subscribe(&self.js, closure.as_ref().unchecked_ref());
        self.listeners.borrow_mut().push(closure);
    }
}

impl VisualSurface for VisualSurfaceBridge {
    fn load_feature_collection(&self, json_text: &str) {
        self.js.load_feature_collection(json_text);
    }

    fn subscribe_to_feature_set_changes(&self, callback: PayloadCallback) {
        self.listen(JsVisualSurface::subscribe_to_feature_set_changes, callback, "feature set");
    }

    fn subscribe_to_feature_selection(&self, callback: PayloadCallback) {
        // Ids arrive as plain strings; anything else is serialized as JSON
        self.listen(JsVisualSurface::subscribe_to_feature_selection, callback, "feature id");
    }

    fn pan_or_fit_to_feature_index(&self, index: usize) {
        self.js.pan_or_fit_to_feature_index(index as u32);
    }

    fn reload(&self, params: &PresentationParams) {
        match serde_wasm_bindgen::to_value(params) {
            Ok(value) => self.js.reload(value),
            Err(e) => log::error!("Cannot pass presentation params to visual surface: {}", e),
        }
    }

    fn release(&self) {
        self.js.release();
    }
}

// ============================================================================
// Host
// ============================================================================

pub struct HostBridge {
    js: JsHost,
    listeners: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl HostBridge {
    pub fn new(js: JsHost) -> Self {
        Self {
            js,
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl HostEnvironment for HostBridge {
    fn subscribe_to_appearance_change(&self, callback: ChangeCallback) {
        let closure = Closure::<dyn Fn()>::new(move || callback());
        self.js.subscribe_to_appearance_change(closure.as_ref().unchecked_ref());
        self.listeners.borrow_mut().push(closure);
    }

    fn appearance_params(&self) -> PresentationParams {
        let value = self.js.get_appearance_params();
        if value.is_undefined() || value.is_null() {
            return PresentationParams::default();
        }
        serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable appearance params: {}", e);
            PresentationParams::default()
        })
    }

    fn reformat_document(&self) -> Result<(), String> {
        self.js.reformat_document().map_err(|e| js_error_message(&e))
    }
}
