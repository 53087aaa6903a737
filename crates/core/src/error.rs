use thiserror::Error;

/// Top-level error type shared by every speedmon crate.
///
/// None of these are fatal to a running monitor: probe and store errors are
/// logged by the scheduler and the cycle moves on.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(String),

    /// A single measurement attempt failed.
    #[error("probe error: {0}")]
    Probe(String),

    /// The persisted history is missing, unreadable or malformed.
    #[error("history read error: {0}")]
    StoreRead(String),

    /// A new sample could not be persisted.
    #[error("history write error: {0}")]
    StoreWrite(String),

    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
