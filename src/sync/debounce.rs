//! Debounce scheduler
//!
//! Holds at most one pending action. Each `schedule` call replaces the
//! previous action and restarts the quiet window, so a burst of edits
//! results in a single run once the burst stops. Only timing is debounced:
//! the action reads whatever state it needs when it fires.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::scheduler::{Scheduler, TaskId};

pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    pending: Rc<Cell<Option<TaskId>>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Cancel any pending action and arm `action` to run after `delay`
    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + 'static) {
        self.cancel();

        let pending = Rc::clone(&self.pending);
        let id = self.scheduler.schedule_after(
            delay,
            Box::new(move || {
                pending.set(None);
                action();
            }),
        );
        self.pending.set(Some(id));
    }

    /// Drop the pending action without running it; returns whether one existed
    pub fn cancel(&self) -> bool {
        match self.pending.take() {
            Some(id) => {
                self.scheduler.cancel(id);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
