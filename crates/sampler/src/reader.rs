use crate::window::Window;
use speedmon_core::Sample;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lock ignoring poison: every mutation behind these locks leaves the value
/// valid, so a panic elsewhere never makes it unusable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The only handle that can mutate a shared window.  Not `Clone`: the
/// scheduler is the single writer.
#[derive(Debug)]
pub struct WindowWriter {
    window: Arc<Mutex<Window>>,
}

impl WindowWriter {
    pub(crate) fn new(window: Window) -> (Self, SnapshotReader) {
        let window = Arc::new(Mutex::new(window));
        let reader = SnapshotReader {
            window: Arc::clone(&window),
        };
        (Self { window }, reader)
    }

    pub fn push(&self, sample: Sample) {
        lock(&self.window).push(sample);
    }

    /// A new reader onto the same window.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            window: Arc::clone(&self.window),
        }
    }
}

/// Thread-safe read accessor for a consumer such as a display timer.
///
/// The lock is held only for the copy, so a reader never waits on a probe
/// or on disk I/O.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    window: Arc<Mutex<Window>>,
}

impl SnapshotReader {
    /// Point-in-time copy of the window, oldest first.  Empty until the
    /// first sample is accepted (or seeded).
    pub fn read(&self) -> Vec<Sample> {
        lock(&self.window).snapshot()
    }
}
