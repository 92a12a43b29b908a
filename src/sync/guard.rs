//! Reentrancy guard
//!
//! Two flags record which side is currently propagating an edit. While one
//! is raised, notifications caused by that propagation are ignored, which is
//! what stops text → map → text cycles. At most one flag is raised at a time.

use std::cell::Cell;

/// Which propagation direction is in progress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncFlag {
    /// Writing a visual-surface change into the text buffer
    UpdatingFromVisual,
    /// Loading the document text into the visual surface
    UpdatingFromText,
}

#[derive(Default, Debug)]
pub struct SyncState {
    updating_from_visual: Cell<bool>,
    updating_from_text: Cell<bool>,
}

/// Lowers a flag when dropped, so early returns and panics still clear it
struct FlagReset<'a>(&'a Cell<bool>);

impl Drop for FlagReset<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_updating_from_visual(&self) -> bool {
        self.updating_from_visual.get()
    }

    pub fn is_updating_from_text(&self) -> bool {
        self.updating_from_text.get()
    }

    pub fn is_set(&self, flag: SyncFlag) -> bool {
        self.cell(flag).get()
    }

    /// Whether either direction is propagating
    pub fn is_busy(&self) -> bool {
        self.is_updating_from_visual() || self.is_updating_from_text()
    }

    /// Run `action` with `flag` raised
    ///
    /// Returns `None` without running `action` if any flag is already
    /// raised: the other direction is mid-propagation, or this direction is
    /// being re-entered by its own side effects. The flag is lowered on every
    /// exit path; errors returned by `action` are passed through untouched.
    pub fn run_exclusive<R>(&self, flag: SyncFlag, action: impl FnOnce() -> R) -> Option<R> {
        if self.is_busy() {
            return None;
        }

        let cell = self.cell(flag);
        cell.set(true);
        let _reset = FlagReset(cell);
        Some(action())
    }

    fn cell(&self, flag: SyncFlag) -> &Cell<bool> {
        match flag {
            SyncFlag::UpdatingFromVisual => &self.updating_from_visual,
            SyncFlag::UpdatingFromText => &self.updating_from_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_flag_raised_only_during_action() {
        let state = SyncState::new();
        let seen = state.run_exclusive(SyncFlag::UpdatingFromText, || {
            (state.is_updating_from_text(), state.is_updating_from_visual())
        });
        assert_eq!(seen, Some((true, false)));
        assert!(!state.is_busy());
    }

    #[test]
    fn test_other_flag_blocks() {
        let state = SyncState::new();
        let inner = state.run_exclusive(SyncFlag::UpdatingFromVisual, || {
            state.run_exclusive(SyncFlag::UpdatingFromText, || "ran")
        });
        assert_eq!(inner, Some(None));
    }

    #[test]
    fn test_same_flag_reentry_is_dropped() {
        let state = SyncState::new();
        let inner = state.run_exclusive(SyncFlag::UpdatingFromVisual, || {
            let nested = state.run_exclusive(SyncFlag::UpdatingFromVisual, || ());
            // The outer flag must survive the refused nested call
            (nested, state.is_set(SyncFlag::UpdatingFromVisual))
        });
        assert_eq!(inner, Some((None, true)));
    }

    #[test]
    fn test_error_passes_through_and_clears() {
        let state = SyncState::new();
        let result: Option<Result<(), String>> =
            state.run_exclusive(SyncFlag::UpdatingFromVisual, || Err("rejected".to_string()));
        assert_eq!(result, Some(Err("rejected".to_string())));
        assert!(!state.is_updating_from_visual());
    }

    #[test]
    fn test_panic_clears_flag() {
        let state = SyncState::new();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            state.run_exclusive(SyncFlag::UpdatingFromText, || panic!("renderer crashed"))
        }));
        assert!(outcome.is_err());
        assert!(!state.is_updating_from_text());
    }
}
