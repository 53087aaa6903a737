//! Process wiring for `speedmon`.
//!
//! Owns the top-level loop and wires together:
//! - the sampling [`Monitor`] (probe → window → history log)
//! - the snapshot consumer (status report on its own timer)
//! - the config file watcher (restart with a re-seeded window on change)
//! - Ctrl-C (cooperative shutdown)

pub mod report;

use speedmon_config::{load as load_config, ConfigWatcher, MonitorConfig, ProbeConfig};
use speedmon_core::Result;
use speedmon_probe::{InterfaceProbe, RetryingProbe, SpeedProbe};
use speedmon_sampler::Monitor;
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Why the consumer loop for one monitor ended.
enum Next {
    Exit(std::io::Result<()>),
    Restart(MonitorConfig),
}

/// Run until Ctrl-C.  Returns an error only if Ctrl-C cannot be listened for.
pub async fn run(config_path: PathBuf) -> Result<()> {
    let mut config = load_config(&config_path).unwrap_or_else(|e| {
        error!("{e}; using defaults");
        MonitorConfig::default()
    });

    let (watcher, mut changes) = ConfigWatcher::spawn(&config_path);
    let mut watching = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut monitor = Monitor::start(&config, build_probe(&config.probe)).await;

    loop {
        let reader = monitor.reader();

        let mut ticker = tokio::time::interval(config.snapshot_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let next = loop {
            tokio::select! {
                res = &mut ctrl_c => break Next::Exit(res),
                change = changes.recv(), if watching => match change {
                    Some(()) => {
                        if let Some(new) = on_config_change(&config, load_config(watcher.path())) {
                            break Next::Restart(new);
                        }
                    }
                    None => {
                        warn!("Config watcher stopped; live reload disabled");
                        watching = false;
                    }
                },
                _ = ticker.tick() => info!("{}", report::status_line(&reader.read())),
            }
        };

        match next {
            Next::Exit(res) => {
                info!("Stopping monitor…");
                monitor.stop().await;
                return res.map_err(Into::into);
            }
            Next::Restart(new) => {
                info!("Config reloaded from '{}'; restarting monitor", watcher.path().display());
                monitor = restart(monitor, &new, build_probe(&new.probe)).await;
                config = new;
            }
        }
    }
}

/// The configuration to switch to after the file changed, if any.
///
/// Unchanged and invalid files keep the running monitor.
fn on_config_change(current: &MonitorConfig, loaded: Result<MonitorConfig>) -> Option<MonitorConfig> {
    match loaded {
        Ok(new) if new == *current => {
            debug!("Config rewritten without changes");
            None
        }
        Ok(new) => Some(new),
        Err(e) => {
            warn!("{e}; keeping the current configuration");
            None
        }
    }
}

/// Stop `old` and start a monitor for `config`, seeded again from its history log.
async fn restart<P: SpeedProbe>(old: Monitor, config: &MonitorConfig, probe: P) -> Monitor {
    info!("Stopping monitor…");
    old.stop().await;
    Monitor::start(config, probe).await
}

/// The production probe: interface throughput with the configured retry budget.
fn build_probe(config: &ProbeConfig) -> impl SpeedProbe {
    let window = config.measure_window();
    let interface = config.interface.clone();
    RetryingProbe::new(
        move || InterfaceProbe::new(window, interface.clone()),
        config.retries,
    )
}
