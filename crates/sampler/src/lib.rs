//! Sample acquisition and retention.
//!
//! - [`Window`] — bounded, most-recent-N ring of samples
//! - [`WindowWriter`] / [`SnapshotReader`] — the single-writer / many-reader
//!   halves of a shared window
//! - [`Scheduler`] — background probe → window → history loop
//! - [`Monitor`] — load history, seed the window, spawn the scheduler

pub mod monitor;
pub mod reader;
pub mod scheduler;
pub mod window;

#[cfg(test)]
mod testing;

pub use monitor::Monitor;
pub use reader::{SnapshotReader, WindowWriter};
pub use scheduler::{CycleOutcome, Scheduler, SchedulerHandle, SchedulerState};
pub use window::Window;
