//! The speed-probe capability: one blocking throughput measurement per call.
//!
//! - [`SpeedProbe`] — the seam the sampler depends on
//! - [`RetryingProbe`] — bounded retry with a fresh instance per re-attempt
//! - [`InterfaceProbe`] — measures live interface throughput via `sysinfo`

pub mod interface;
pub mod retry;

pub use interface::InterfaceProbe;
pub use retry::RetryingProbe;

use speedmon_core::Result;
use std::time::Duration;

/// Download and upload rates produced by one measurement, in Mbps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub download_mbps: f64,
    pub upload_mbps:   f64,
}

impl Throughput {
    /// Convert byte counts observed over `elapsed` into megabits per second.
    #[must_use]
    pub fn from_bytes(received: u64, transmitted: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let mbps = |bytes: u64| {
            if secs > 0.0 {
                bytes as f64 * 8.0 / 1_000_000.0 / secs
            } else {
                0.0
            }
        };
        Self {
            download_mbps: mbps(received),
            upload_mbps:   mbps(transmitted),
        }
    }
}

/// A capability that performs one throughput measurement.
///
/// `measure` blocks for as long as the measurement takes and may fail; any
/// retry policy belongs to the implementation, not to the caller.
pub trait SpeedProbe: Send + 'static {
    fn measure(&mut self) -> Result<Throughput>;
}

impl<P: SpeedProbe + ?Sized> SpeedProbe for Box<P> {
    fn measure(&mut self) -> Result<Throughput> {
        (**self).measure()
    }
}
