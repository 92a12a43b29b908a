//! Deferred task scheduling
//!
//! `Scheduler` is the one place time enters the core. The browser build uses
//! `window.setTimeout` (see `api::timer`); tests use [`ManualScheduler`], a
//! virtual clock that only moves when told to.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `task` once on the main context after `delay`
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskId;

    /// Drop a task that has not run yet; unknown ids are ignored
    fn cancel(&self, id: TaskId);
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, id) so equal deadlines run in scheduling order
    queue: BTreeMap<(Duration, u64), Task>,
    deadlines: HashMap<u64, Duration>,
}

/// Virtual-clock scheduler
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Move the clock forward, running every task that comes due in order
    ///
    /// Tasks may schedule or cancel other tasks; a task scheduled inside the
    /// window runs in the same call if its deadline is reached.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;

        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let Some((&(deadline, id), _)) = state.queue.first_key_value() else {
                    break;
                };
                if deadline > target {
                    break;
                }
                state.now = deadline;
                state.deadlines.remove(&id);
                state.queue.remove(&(deadline, id))
            };
            // The borrow is released before the task runs
            if let Some(task) = task {
                task();
                ran += 1;
            }
        }

        self.state.borrow_mut().now = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.now + delay;
        state.queue.insert((deadline, id), task);
        state.deadlines.insert(id, deadline);
        TaskId(id)
    }

    fn cancel(&self, id: TaskId) {
        let mut state = self.state.borrow_mut();
        if let Some(deadline) = state.deadlines.remove(&id.0) {
            state.queue.remove(&(deadline, id.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_runs_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, ms) in [("late", 30), ("early", 10), ("mid", 20)] {
            let log = Rc::clone(&log);
            scheduler.schedule_after(
                Duration::from_millis(ms),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }

        assert_eq!(scheduler.advance(Duration::from_millis(15)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(100)), 2);
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(scheduler.now(), Duration::from_millis(115));
    }

    #[test]
    fn test_cancel() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        let id = scheduler.schedule_after(
            Duration::from_millis(5),
            Box::new(move || *flag.borrow_mut() = true),
        );

        scheduler.cancel(id);
        scheduler.cancel(id);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(Duration::from_secs(1));
        assert!(!*ran.borrow());
    }

    #[test]
    fn test_task_can_schedule_more_work() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(RefCell::new(0));

        let inner_scheduler = Rc::clone(&scheduler);
        let inner_count = Rc::clone(&count);
        scheduler.schedule_after(
            Duration::from_millis(10),
            Box::new(move || {
                *inner_count.borrow_mut() += 1;
                let count = Rc::clone(&inner_count);
                inner_scheduler.schedule_after(
                    Duration::from_millis(10),
                    Box::new(move || *count.borrow_mut() += 1),
                );
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(25)), 2);
        assert_eq!(*count.borrow(), 2);
    }
}
