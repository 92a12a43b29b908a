//! Appearance-driven reloads
//!
//! Decides what an "appearance changed" signal means for the visual
//! surface. Equal parameters are ignored. A change that arrives while a text
//! sync is pending is held back so the pending sync always runs first.

use std::cell::RefCell;

use crate::models::PresentationParams;

/// What the controller should do with an appearance change
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThemeDecision {
    Unchanged,
    /// Reload the surface with these parameters, then re-push the document
    ReloadNow(PresentationParams),
    /// Held until the pending sync has run
    Deferred,
}

#[derive(Default, Debug)]
pub struct ThemeAdapter {
    applied: RefCell<Option<PresentationParams>>,
    deferred: RefCell<Option<PresentationParams>>,
}

impl ThemeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the parameters the surface was created with, without reloading
    pub fn seed(&self, params: PresentationParams) {
        *self.applied.borrow_mut() = Some(params);
    }

    pub fn applied(&self) -> Option<PresentationParams> {
        self.applied.borrow().clone()
    }

    pub fn on_appearance_changed(
        &self,
        params: PresentationParams,
        sync_pending: bool,
    ) -> ThemeDecision {
        if self.applied.borrow().as_ref() == Some(&params) {
            // Back to what is on screen: any held reload is moot
            self.deferred.borrow_mut().take();
            return ThemeDecision::Unchanged;
        }
        if self.deferred.borrow().as_ref() == Some(&params) {
            return ThemeDecision::Unchanged;
        }

        if sync_pending {
            *self.deferred.borrow_mut() = Some(params);
            return ThemeDecision::Deferred;
        }

        self.deferred.borrow_mut().take();
        *self.applied.borrow_mut() = Some(params.clone());
        ThemeDecision::ReloadNow(params)
    }

    /// Release a held reload, marking its parameters as applied
    pub fn take_deferred(&self) -> Option<PresentationParams> {
        let params = self.deferred.borrow_mut().take()?;
        *self.applied.borrow_mut() = Some(params.clone());
        Some(params)
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.borrow().is_some()
    }

    pub fn clear(&self) {
        self.deferred.borrow_mut().take();
    }
}
