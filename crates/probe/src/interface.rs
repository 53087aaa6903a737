use crate::{SpeedProbe, Throughput};
use speedmon_core::{MonitorError, Result};
use std::time::{Duration, Instant};
use sysinfo::Networks;
use tracing::debug;

/// Measures the throughput actually flowing through the host's network
/// interfaces over a fixed observation window.
///
/// This is observed traffic, not available capacity: an idle link reports
/// roughly 0 Mbps no matter how fast it is.
pub struct InterfaceProbe {
    networks:  Networks,
    window:    Duration,
    interface: Option<String>,
}

impl InterfaceProbe {
    /// Build a probe observing `interface` (or every non-loopback interface
    /// when `None`) for `window` per measurement.
    pub fn new(window: Duration, interface: Option<String>) -> Result<Self> {
        let probe = Self {
            networks: Networks::new_with_refreshed_list(),
            window,
            interface,
        };

        let names = probe.selected_names();
        if names.is_empty() {
            return Err(probe.no_interface_error());
        }
        debug!("Speed probe observing interfaces: {}", names.join(", "));

        Ok(probe)
    }

    fn is_selected(&self, name: &str) -> bool {
        match &self.interface {
            Some(wanted) => name == wanted,
            None => !is_loopback(name),
        }
    }

    fn selected_names(&self) -> Vec<String> {
        self.networks
            .iter()
            .filter(|(name, _)| self.is_selected(name))
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn no_interface_error(&self) -> MonitorError {
        match &self.interface {
            Some(name) => MonitorError::Probe(format!("network interface '{name}' not found")),
            None => MonitorError::Probe("no non-loopback network interfaces found".into()),
        }
    }
}

impl SpeedProbe for InterfaceProbe {
    fn measure(&mut self) -> Result<Throughput> {
        // `received()` / `transmitted()` are deltas since the last refresh,
        // so refresh once to open the window and once to close it.
        self.networks.refresh(false);
        let started = Instant::now();
        std::thread::sleep(self.window);
        self.networks.refresh(false);
        let elapsed = started.elapsed();

        let (mut rx, mut tx, mut matched) = (0u64, 0u64, 0usize);
        for (name, data) in self.networks.iter() {
            if self.is_selected(name) {
                rx += data.received();
                tx += data.transmitted();
                matched += 1;
            }
        }

        if matched == 0 {
            return Err(self.no_interface_error());
        }
        Ok(Throughput::from_bytes(rx, tx, elapsed))
    }
}

fn is_loopback(name: &str) -> bool {
    name == "lo" || name.starts_with("lo0") || name.to_ascii_lowercase().contains("loopback")
}
