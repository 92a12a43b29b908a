//! Text ⇄ map synchronization
//!
//! ## Modules
//!
//! - `ports`: traits for the text buffer, visual surface and host
//! - `guard`: reentrancy flags shared by both propagation directions
//! - `scheduler`: deferred task scheduling and the virtual clock
//! - `debounce`: single-slot debounce on top of a scheduler
//! - `theme`: appearance-change reload decisions
//! - `controller`: the controller tying them together

pub mod controller;
pub mod debounce;
pub mod guard;
pub mod ports;
pub mod scheduler;
pub mod theme;

pub use controller::{Collaborators, SyncController, SyncStats};
pub use debounce::Debouncer;
pub use guard::{SyncFlag, SyncState};
pub use ports::{HostEnvironment, TextBuffer, VisualSurface};
pub use scheduler::{ManualScheduler, Scheduler, TaskId};
pub use theme::{ThemeAdapter, ThemeDecision};
