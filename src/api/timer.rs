//! Browser scheduler backed by `window.setTimeout`
//!
//! Each task's `Closure` is kept until the timer fires or is cancelled.
//! A closure cannot be dropped while it runs, so fired entries are only
//! collected on the next `schedule_after`/`cancel` call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::helpers::js_error_message;
use crate::sync::scheduler::{Scheduler, Task, TaskId};

struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

#[derive(Default)]
pub struct WindowScheduler {
    next_id: Cell<u64>,
    timeouts: RefCell<HashMap<u64, Timeout>>,
    fired: Rc<RefCell<Vec<u64>>>,
}

impl WindowScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_fired(&self) {
        let fired: Vec<u64> = self.fired.borrow_mut().drain(..).collect();
        let mut timeouts = self.timeouts.borrow_mut();
        for id in fired {
            timeouts.remove(&id);
        }
    }
}

impl Scheduler for WindowScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskId {
        self.collect_fired();

        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let Some(window) = web_sys::window() else {
            log::error!("No window available; deferred task {} dropped", id);
            return TaskId(id);
        };

        let fired = Rc::clone(&self.fired);
        let mut task = Some(task);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(task) = task.take() {
                task();
            }
            // Recorded last so a schedule from inside the task keeps this closure alive
            fired.borrow_mut().push(id);
        });

        let millis = delay.as_millis().min(i32::MAX as u128) as i32;
        let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, millis) {
            Ok(handle) => {
                self.timeouts
                    .borrow_mut()
                    .insert(id, Timeout { handle, _closure: closure });
            }
            Err(e) => log::error!("setTimeout failed: {}", js_error_message(&e)),
        }
        TaskId(id)
    }

    fn cancel(&self, id: TaskId) {
        self.collect_fired();

        if let Some(timeout) = self.timeouts.borrow_mut().remove(&id.0) {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(timeout.handle);
            }
        }
    }
}
