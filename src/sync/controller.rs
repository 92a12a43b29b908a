//! Sync controller
//!
//! Keeps one document's text and its visual surface in step:
//!
//! ```text
//! text edit    → debounce (500ms) → validate → visual.load_feature_collection
//! visual edit  → canonicalize     → text.replace_all_text → host reformat
//! caret move   → locate feature   → visual.pan_or_fit_to_feature_index
//! map select   → locate by id     → text caret + scroll
//! theme change → reload surface   → re-push document
//! ```
//!
//! All entry points run on the main context. Reentrancy flags in
//! [`SyncState`] drop the notifications each direction causes on the other.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::debounce::Debouncer;
use super::guard::{SyncFlag, SyncState};
use super::ports::{HostEnvironment, TextBuffer, VisualSurface};
use super::scheduler::Scheduler;
use super::theme::{ThemeAdapter, ThemeDecision};
use crate::errors::SyncError;
use crate::models::{FeatureCollection, GeoJsonDocument, PresentationParams, SyncConfig};
use crate::text::{
    canonicalize, is_feature_collection, locate_feature_by_id_with, locate_feature_containing,
    to_canonical_string,
};

/// The external parts one controller is wired to
pub struct Collaborators {
    pub text: Rc<dyn TextBuffer>,
    pub visual: Rc<dyn VisualSurface>,
    pub host: Rc<dyn HostEnvironment>,
    pub scheduler: Rc<dyn Scheduler>,
}

/// Counters for diagnostics and tests
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Document loads sent to the visual surface
    pub pushes: u64,
    /// Sync passes skipped because the text was not valid JSON
    pub skipped_invalid: u64,
    /// Canonical texts written into the text buffer
    pub write_backs: u64,
    /// Visual surface reloads for appearance changes
    pub reloads: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Attached,
    Disposed,
}

pub struct SyncController {
    text: Rc<dyn TextBuffer>,
    visual: Rc<dyn VisualSurface>,
    host: Rc<dyn HostEnvironment>,
    config: SyncConfig,
    state: SyncState,
    debouncer: Debouncer,
    theme: ThemeAdapter,
    stats: Cell<SyncStats>,
    lifecycle: Cell<Lifecycle>,
    this: Weak<SyncController>,
}

impl SyncController {
    pub fn new(collaborators: Collaborators, config: SyncConfig) -> Rc<Self> {
        let Collaborators { text, visual, host, scheduler } = collaborators;
        Rc::new_cyclic(|this| Self {
            text,
            visual,
            host,
            config,
            state: SyncState::new(),
            debouncer: Debouncer::new(scheduler),
            theme: ThemeAdapter::new(),
            stats: Cell::new(SyncStats::default()),
            lifecycle: Cell::new(Lifecycle::Created),
            this: this.clone(),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn stats(&self) -> SyncStats {
        self.stats.get()
    }

    pub fn is_sync_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Disposed
    }

    /// Subscribe to every collaborator and load the current document
    ///
    /// Callbacks hold weak references: once the controller is dropped they
    /// do nothing. Calling this twice, or after `dispose`, is a no-op.
    pub fn attach(&self) {
        if self.lifecycle.get() != Lifecycle::Created {
            return;
        }
        self.lifecycle.set(Lifecycle::Attached);

        let this = self.this.clone();
        self.text.subscribe_to_changes(Box::new(move || {
            if let Some(controller) = this.upgrade() {
                controller.on_text_changed();
            }
        }));

        let this = self.this.clone();
        self.text.subscribe_to_caret_moves(Box::new(move |offset| {
            if let Some(controller) = this.upgrade() {
                controller.on_cursor_moved(offset);
            }
        }));

        let this = self.this.clone();
        self.visual.subscribe_to_feature_set_changes(Box::new(move |payload| {
            if let Some(controller) = this.upgrade() {
                match controller.on_visual_changed(payload) {
                    Ok(()) => {}
                    Err(e) if e.is_silent() => log::debug!("Visual change ignored: {}", e),
                    Err(e) => log::error!("Visual change not written back: {}", e),
                }
            }
        }));

        let this = self.this.clone();
        self.visual.subscribe_to_feature_selection(Box::new(move |feature_id| {
            if let Some(controller) = this.upgrade() {
                controller.on_feature_selected_in_visual(feature_id);
            }
        }));

        let this = self.this.clone();
        self.host.subscribe_to_appearance_change(Box::new(move || {
            if let Some(controller) = this.upgrade() {
                controller.on_appearance_changed();
            }
        }));

        self.theme.seed(self.host.appearance_params());
        log::info!("GeoJSON sync attached");
        self.push_text_to_visual();

        // Show the feature the caret already sits in
        self.on_cursor_moved(self.text.caret_offset());
    }

    /// Cancel pending work and release the visual surface
    ///
    /// Safe to call any number of times, before or after `attach`.
    pub fn dispose(&self) {
        if self.is_disposed() {
            return;
        }
        self.lifecycle.set(Lifecycle::Disposed);
        self.debouncer.cancel();
        self.theme.clear();
        self.visual.release();
        log::info!("GeoJSON sync disposed");
    }

    /// Text buffer change notification
    pub fn on_text_changed(&self) {
        if self.is_disposed() || self.state.is_updating_from_visual() {
            return;
        }

        let this = self.this.clone();
        self.debouncer.schedule(self.config.debounce(), move || {
            if let Some(controller) = this.upgrade() {
                controller.run_pending_sync();
            }
        });
    }

    /// Load the current document text into the visual surface
    ///
    /// Returns whether the text was pushed. Invalid JSON is skipped silently
    /// and the surface keeps showing its last good state.
    pub fn push_text_to_visual(&self) -> bool {
        if self.is_disposed() {
            return false;
        }

        let text = self.text.text();
        let document = match GeoJsonDocument::classify(&text) {
            Ok(document) => document,
            Err(e) => {
                log::debug!("Skipping sync of invalid document: {}", e);
                self.bump(|s| s.skipped_invalid += 1);
                return false;
            }
        };

        let pushed = self
            .state
            .run_exclusive(SyncFlag::UpdatingFromText, || {
                if !document.has_features() {
                    // Still loaded so the surface clears
                    log::debug!("Nothing to display in {:?}", document);
                }
                self.visual.load_feature_collection(&text);
            })
            .is_some();

        if pushed {
            self.bump(|s| s.pushes += 1);
        } else {
            log::debug!("Sync already in progress, push dropped");
        }
        pushed
    }

    /// Visual surface feature-set change
    ///
    /// `payload` is the renderer's full feature collection. It is written to
    /// the text buffer in canonical form.
    pub fn on_visual_changed(&self, payload: &str) -> Result<(), SyncError> {
        if self.is_disposed() || self.state.is_updating_from_text() {
            return Ok(());
        }

        let canonical = canonicalize(payload, self.config.indent)?;
        self.state
            .run_exclusive(SyncFlag::UpdatingFromVisual, || self.write_back(&canonical))
            .unwrap_or(Ok(()))
    }

    /// Caret moved in the text buffer; pans the map to the feature under it
    ///
    /// Works on the raw text, so a document that is briefly invalid while
    /// being typed still correlates. Returns the feature index panned to.
    pub fn on_cursor_moved(&self, offset: usize) -> Option<usize> {
        if self.is_disposed() || self.state.is_updating_from_visual() {
            return None;
        }

        let text = self.text.text();
        if !is_feature_collection(&text) {
            log::debug!("Cursor sync skipped: document is not a FeatureCollection");
            return None;
        }

        let index = locate_feature_containing(&text, offset)?;
        self.visual.pan_or_fit_to_feature_index(index);
        Some(index)
    }

    /// Feature selected on the map; moves the caret to its opening brace
    ///
    /// Returns the caret offset set.
    pub fn on_feature_selected_in_visual(&self, feature_id: &str) -> Option<usize> {
        if self.is_disposed() {
            return None;
        }

        let text = self.text.text();
        let found = locate_feature_by_id_with(&text, feature_id, self.config.id_lookup);
        let Some(offset) = found else {
            log::debug!("{}", SyncError::LocatorMiss(format!("feature id {:?}", feature_id)));
            return None;
        };

        // Raised flag keeps the caret-move notification from panning the map back
        self.state.run_exclusive(SyncFlag::UpdatingFromVisual, || {
            self.text.set_caret_offset(offset);
            self.text.scroll_to_caret();
        })?;
        Some(offset)
    }

    /// Host appearance changed
    pub fn on_appearance_changed(&self) {
        if self.is_disposed() {
            return;
        }

        let params = self.host.appearance_params();
        match self.theme.on_appearance_changed(params, self.debouncer.is_pending()) {
            ThemeDecision::Unchanged => {}
            ThemeDecision::ReloadNow(params) => self.reload_visual(&params),
            ThemeDecision::Deferred => log::debug!("Reload held until pending sync runs"),
        }
    }

    /// Replace a feature's properties from user-edited JSON text
    ///
    /// Unlike automatic sync passes, invalid input is reported back so it
    /// can be shown next to the edit.
    pub fn update_feature_properties(
        &self,
        feature_id: &str,
        properties_text: &str,
    ) -> Result<(), SyncError> {
        let properties = match serde_json::from_str::<Value>(properties_text)? {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => {
                return Err(SyncError::MalformedDocument(
                    "properties must be a JSON object".to_string(),
                ))
            }
        };

        self.edit_collection(|collection| {
            let feature = collection
                .find_mut(feature_id)
                .ok_or_else(|| SyncError::FeatureNotFound(feature_id.to_string()))?;
            feature.properties = properties;
            Ok(())
        })
    }

    pub fn delete_feature(&self, feature_id: &str) -> Result<(), SyncError> {
        self.edit_collection(|collection| {
            collection
                .remove(feature_id)
                .map(|_| ())
                .ok_or_else(|| SyncError::FeatureNotFound(feature_id.to_string()))
        })
    }

    fn edit_collection(
        &self,
        edit: impl FnOnce(&mut FeatureCollection) -> Result<(), SyncError>,
    ) -> Result<(), SyncError> {
        if self.is_disposed() {
            return Err(SyncError::WriteBackFailed("session disposed".to_string()));
        }

        let mut collection = FeatureCollection::from_text(&self.text.text())?;
        edit(&mut collection)?;
        let canonical = to_canonical_string(&collection, self.config.indent)?;

        self.state
            .run_exclusive(SyncFlag::UpdatingFromVisual, || self.write_back(&canonical))
            .ok_or_else(|| SyncError::WriteBackFailed("synchronization in progress".to_string()))??;

        self.push_text_to_visual();
        Ok(())
    }

    /// Write canonical text into the buffer, then ask the host to format it
    fn write_back(&self, canonical: &str) -> Result<(), SyncError> {
        if self.text.text() == canonical {
            log::debug!("Document already canonical, write-back skipped");
            return Ok(());
        }

        self.text
            .replace_all_text(canonical)
            .map_err(SyncError::WriteBackFailed)?;
        self.bump(|s| s.write_backs += 1);

        if self.config.reformat_after_write_back {
            if let Err(e) = self
                .host
                .reformat_document()
                .map_err(SyncError::SecondaryFormattingFailed)
            {
                log::warn!("{}", e);
            }
        }
        Ok(())
    }

    fn run_pending_sync(&self) {
        self.push_text_to_visual();
        if let Some(params) = self.theme.take_deferred() {
            self.reload_visual(&params);
        }
    }

    fn reload_visual(&self, params: &PresentationParams) {
        log::info!("Reloading visual surface for theme {:?}", params.theme);
        self.visual.reload(params);
        self.bump(|s| s.reloads += 1);
        self.push_text_to_visual();
    }

    fn bump(&self, update: impl FnOnce(&mut SyncStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.dispose();
    }
}
