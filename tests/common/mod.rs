// In-memory collaborators for driving a SyncController without a browser

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use geojson_editor_wasm::models::{PresentationParams, SyncConfig};
use geojson_editor_wasm::sync::ports::{ChangeCallback, OffsetCallback, PayloadCallback};
use geojson_editor_wasm::sync::{
    Collaborators, HostEnvironment, ManualScheduler, SyncController, TextBuffer, VisualSurface,
};

pub const TWO_FEATURES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "a",
      "geometry": {"type": "Point", "coordinates": [0, 0]},
      "properties": {"name": "first"}
    },
    {
      "type": "Feature",
      "id": "b",
      "geometry": {"type": "Point", "coordinates": [1, 1]},
      "properties": {"name": "second"}
    }
  ]
}"#;

// ============================================================================
// Text Buffer
// ============================================================================

/// Text pane that notifies listeners synchronously, like an editor widget
#[derive(Default)]
pub struct MockText {
    text: RefCell<String>,
    caret: Cell<usize>,
    scrolls: Cell<usize>,
    replaces: Cell<usize>,
    replace_error: RefCell<Option<String>>,
    change_listeners: RefCell<Vec<ChangeCallback>>,
    caret_listeners: RefCell<Vec<OffsetCallback>>,
}

impl MockText {
    pub fn new(text: &str) -> Self {
        let buffer = Self::default();
        *buffer.text.borrow_mut() = text.to_string();
        buffer
    }

    pub fn current(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn caret(&self) -> usize {
        self.caret.get()
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.get()
    }

    pub fn replaces(&self) -> usize {
        self.replaces.get()
    }

    pub fn fail_replace(&self, reason: &str) {
        *self.replace_error.borrow_mut() = Some(reason.to_string());
    }

    /// Simulate the user typing a new document
    pub fn user_edit(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.notify_change();
    }

    /// Change the text without notifying listeners
    pub fn set_text_silently(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    /// Simulate the user clicking at a byte offset
    pub fn user_move_caret(&self, offset: usize) {
        self.caret.set(offset);
        self.notify_caret();
    }

    fn notify_change(&self) {
        for listener in self.change_listeners.borrow().iter() {
            listener();
        }
    }

    fn notify_caret(&self) {
        let offset = self.caret.get();
        for listener in self.caret_listeners.borrow().iter() {
            listener(offset);
        }
    }
}

impl TextBuffer for MockText {
    fn text(&self) -> String {
        self.current()
    }

    fn replace_all_text(&self, text: &str) -> Result<(), String> {
        if let Some(reason) = self.replace_error.borrow().clone() {
            return Err(reason);
        }
        *self.text.borrow_mut() = text.to_string();
        self.replaces.set(self.replaces.get() + 1);
        self.notify_change();
        Ok(())
    }

    fn subscribe_to_changes(&self, callback: ChangeCallback) {
        self.change_listeners.borrow_mut().push(callback);
    }

    fn caret_offset(&self) -> usize {
        self.caret.get()
    }

    fn set_caret_offset(&self, offset: usize) {
        self.caret.set(offset);
        self.notify_caret();
    }

    fn scroll_to_caret(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }

    fn subscribe_to_caret_moves(&self, callback: OffsetCallback) {
        self.caret_listeners.borrow_mut().push(callback);
    }
}

// ============================================================================
// Visual Surface
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum VisualCall {
    Load(String),
    Pan(usize),
    Reload(String),
    Release,
}

/// Map surface recording every call in order
#[derive(Default)]
pub struct MockVisual {
    calls: RefCell<Vec<VisualCall>>,
    echo_loads: Cell<bool>,
    set_listeners: RefCell<Vec<PayloadCallback>>,
    select_listeners: RefCell<Vec<PayloadCallback>>,
}

impl MockVisual {
    pub fn calls(&self) -> Vec<VisualCall> {
        self.calls.borrow().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                VisualCall::Load(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn pans(&self) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                VisualCall::Pan(index) => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn releases(&self) -> usize {
        self.calls.borrow().iter().filter(|call| **call == VisualCall::Release).count()
    }

    /// Fire a feature-set change for every load, like draw plugins that
    /// report programmatic additions
    pub fn echo_loads(&self, on: bool) {
        self.echo_loads.set(on);
    }

    /// Simulate the user finishing a draw or edit on the map
    pub fn user_draw(&self, payload: &str) {
        for listener in self.set_listeners.borrow().iter() {
            listener(payload);
        }
    }

    pub fn user_select(&self, feature_id: &str) {
        for listener in self.select_listeners.borrow().iter() {
            listener(feature_id);
        }
    }
}

impl VisualSurface for MockVisual {
    fn load_feature_collection(&self, json_text: &str) {
        self.calls.borrow_mut().push(VisualCall::Load(json_text.to_string()));
        if self.echo_loads.get() {
            self.user_draw(json_text);
        }
    }

    fn subscribe_to_feature_set_changes(&self, callback: PayloadCallback) {
        self.set_listeners.borrow_mut().push(callback);
    }

    fn subscribe_to_feature_selection(&self, callback: PayloadCallback) {
        self.select_listeners.borrow_mut().push(callback);
    }

    fn pan_or_fit_to_feature_index(&self, index: usize) {
        self.calls.borrow_mut().push(VisualCall::Pan(index));
    }

    fn reload(&self, params: &PresentationParams) {
        self.calls.borrow_mut().push(VisualCall::Reload(params.theme.clone()));
    }

    fn release(&self) {
        self.calls.borrow_mut().push(VisualCall::Release);
    }
}

// ============================================================================
// Host
// ============================================================================

#[derive(Default)]
pub struct MockHost {
    params: RefCell<PresentationParams>,
    reformats: Cell<usize>,
    reformat_error: RefCell<Option<String>>,
    listeners: RefCell<Vec<ChangeCallback>>,
}

impl MockHost {
    pub fn reformats(&self) -> usize {
        self.reformats.get()
    }

    pub fn fail_reformat(&self, reason: &str) {
        *self.reformat_error.borrow_mut() = Some(reason.to_string());
    }

    /// Switch the host theme and notify listeners
    pub fn set_theme(&self, theme: &str) {
        self.params.borrow_mut().theme = theme.to_string();
        for listener in self.listeners.borrow().iter() {
            listener();
        }
    }
}

impl HostEnvironment for MockHost {
    fn subscribe_to_appearance_change(&self, callback: ChangeCallback) {
        self.listeners.borrow_mut().push(callback);
    }

    fn appearance_params(&self) -> PresentationParams {
        self.params.borrow().clone()
    }

    fn reformat_document(&self) -> Result<(), String> {
        self.reformats.set(self.reformats.get() + 1);
        match self.reformat_error.borrow().clone() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub text: Rc<MockText>,
    pub visual: Rc<MockVisual>,
    pub host: Rc<MockHost>,
    pub scheduler: Rc<ManualScheduler>,
    pub controller: Rc<SyncController>,
}

impl Harness {
    pub fn new(initial_text: &str) -> Self {
        Self::with_config(initial_text, SyncConfig::default())
    }

    pub fn with_config(initial_text: &str, config: SyncConfig) -> Self {
        let text = Rc::new(MockText::new(initial_text));
        let visual = Rc::new(MockVisual::default());
        let host = Rc::new(MockHost::default());
        let scheduler = Rc::new(ManualScheduler::new());

        let controller = SyncController::new(
            Collaborators {
                text: text.clone(),
                visual: visual.clone(),
                host: host.clone(),
                scheduler: scheduler.clone(),
            },
            config,
        );

        Self { text, visual, host, scheduler, controller }
    }

    /// Harness with the controller attached
    pub fn attached(initial_text: &str) -> Self {
        let harness = Self::new(initial_text);
        harness.controller.attach();
        harness
    }

    pub fn advance_ms(&self, ms: u64) -> usize {
        self.scheduler.advance(Duration::from_millis(ms))
    }
}

/// Pretty-print with two-space indent, independently of the crate
pub fn pretty(json: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(json).expect("test JSON should parse");
    serde_json::to_string_pretty(&value).expect("test JSON should serialize")
}
