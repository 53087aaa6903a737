pub mod schema;
pub mod watcher;

pub use schema::{MonitorConfig, ProbeConfig};
pub use watcher::ConfigWatcher;

use speedmon_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()`
/// if the file doesn't exist so the monitor always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: MonitorConfig =
        toml::from_str(&raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject values the sampler cannot run with.
pub fn validate(config: &MonitorConfig) -> Result<()> {
    let checks = [
        (config.max_data_points == 0, "max_data_points must be greater than 0"),
        (config.max_history == 0, "max_history must be greater than 0"),
        (config.snapshot_interval_ms == 0, "snapshot_interval_ms must be greater than 0"),
        (config.probe.measure_window_ms == 0, "probe.measure_window_ms must be greater than 0"),
    ];

    match checks.iter().find(|(failed, _)| *failed) {
        Some((_, reason)) => Err(MonitorError::Config((*reason).to_string())),
        None => Ok(()),
    }
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join("speedmon")
        .join("speedmon.toml")
}

/// Return the default history log path, honouring `$XDG_DATA_HOME`.
pub fn default_history_path() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
        .join("speedmon")
        .join("speed_history.json")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(home_fallback)
        })
}
