pub mod error;
pub mod format;
pub mod sample;
pub mod stats;

pub use error::{MonitorError, Result};
pub use format::format_mbps;
pub use sample::Sample;
pub use stats::{RateSummary, SpeedStats};
