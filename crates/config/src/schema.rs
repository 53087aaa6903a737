use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure parsed from `speedmon.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Capacity of the in-memory window (most recent samples kept live).
    pub max_data_points: usize,
    /// Seconds between the end of one sampling cycle and the start of the next.
    pub test_interval: u64,
    /// Cap on the number of persisted history records.
    pub max_history: usize,
    /// Location of the JSON history log.
    pub history_file: PathBuf,
    /// How often the consumer reads a window snapshot (milliseconds).
    pub snapshot_interval_ms: u64,
    /// Speed probe settings.
    pub probe: ProbeConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_data_points:      100,
            test_interval:        60,
            max_history:          1_000,
            history_file:         crate::default_history_path(),
            snapshot_interval_ms: 5_000,
            probe:                ProbeConfig::default(),
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn test_interval(&self) -> Duration {
        Duration::from_secs(self.test_interval)
    }

    #[must_use]
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms)
    }
}

/// Settings for the throughput probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// How long a single measurement observes traffic (milliseconds).
    pub measure_window_ms: u64,
    /// Re-attempts with a fresh probe instance before a cycle counts as failed.
    pub retries: u32,
    /// Restrict measurement to one interface; `None` sums all non-loopback ones.
    pub interface: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            measure_window_ms: 5_000,
            retries:           1,
            interface:         None,
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn measure_window(&self) -> Duration {
        Duration::from_millis(self.measure_window_ms)
    }
}
