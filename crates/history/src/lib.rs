//! File-backed, size-capped history of accepted samples.
//!
//! The log is a pretty-printed JSON array, oldest first.  Every append
//! rewrites the whole file: the new content goes to a sibling `.tmp` file
//! which is then renamed over the log, so a crash or a failed write leaves
//! the previous log intact and readers only ever see complete content.

use speedmon_core::{MonitorError, Result, Sample};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable, capped, append-ordered record of accepted samples.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path:        PathBuf,
    max_history: usize,
}

impl HistoryStore {
    /// `max_history` below 1 is treated as 1.
    pub fn new(path: impl Into<PathBuf>, max_history: usize) -> Self {
        Self {
            path:        path.into(),
            max_history: max_history.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Read the full log.  A missing, unreadable or malformed log is
    /// recovered as an empty history.
    pub fn load(&self) -> Vec<Sample> {
        match self.try_load() {
            Ok(samples) => samples,
            Err(e) => {
                warn!("{e}; starting with an empty history");
                Vec::new()
            }
        }
    }

    /// Read the full log, reporting why it could not be used.
    ///
    /// A log that does not exist yet is not an error.  One bad record makes
    /// the whole log invalid.
    pub fn try_load(&self) -> Result<Vec<Sample>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MonitorError::StoreRead(format!(
                    "cannot read '{}': {e}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            MonitorError::StoreRead(format!("malformed history '{}': {e}", self.path.display()))
        })
    }

    /// Append `sample`, drop the oldest records beyond `max_history` and
    /// atomically replace the log.
    ///
    /// A corrupt log is discarded and a fresh one started.  Timestamps are
    /// not checked for monotonicity; callers append in time order.
    pub fn append(&self, sample: Sample) -> Result<()> {
        let mut samples = self.try_load().unwrap_or_else(|e| {
            warn!("{e}; starting a fresh history log");
            Vec::new()
        });

        samples.push(sample);
        let excess = samples.len().saturating_sub(self.max_history);
        samples.drain(..excess);

        self.replace(&samples)?;
        debug!(
            "History now holds {} record(s) at '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(())
    }

    fn replace(&self, samples: &[Sample]) -> Result<()> {
        let write_err = |what: &str, e: &dyn std::fmt::Display| {
            MonitorError::StoreWrite(format!("{what} '{}': {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_err("cannot create directory for", &e))?;
        }

        let json = serde_json::to_vec_pretty(samples).map_err(|e| write_err("cannot encode", &e))?;

        let tmp = temp_path(&self.path);
        let written = write_synced(&tmp, &json).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(write_err("cannot write", &e));
        }
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// `speed_history.json` → `speed_history.json.tmp`, in the same directory so
/// the final rename never crosses filesystems.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
