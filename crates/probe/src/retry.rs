use crate::{SpeedProbe, Throughput};
use speedmon_core::Result;
use tracing::{info, warn};

/// Wraps a probe factory with a bounded retry contract.
///
/// The inner probe is built lazily on the first measurement.  When a
/// measurement fails the instance is thrown away and up to `retries` further
/// attempts are made, each with a freshly built probe.  Failing to build a
/// probe counts as a failed attempt.  Only when every attempt has failed is
/// the last error returned to the caller.
pub struct RetryingProbe<P, F> {
    factory: F,
    retries: u32,
    current: Option<P>,
}

impl<P, F> RetryingProbe<P, F>
where
    P: SpeedProbe,
    F: FnMut() -> Result<P> + Send + 'static,
{
    pub fn new(factory: F, retries: u32) -> Self {
        Self {
            factory,
            retries,
            current: None,
        }
    }

    fn attempt(&mut self) -> Result<Throughput> {
        let mut probe = match self.current.take() {
            Some(probe) => probe,
            None => {
                info!("Initializing speed probe…");
                (self.factory)()?
            }
        };
        let result = probe.measure();
        self.current = Some(probe);
        result
    }
}

impl<P, F> SpeedProbe for RetryingProbe<P, F>
where
    P: SpeedProbe,
    F: FnMut() -> Result<P> + Send + 'static,
{
    fn measure(&mut self) -> Result<Throughput> {
        let mut retried = 0;
        loop {
            match self.attempt() {
                Ok(throughput) => return Ok(throughput),
                Err(e) => {
                    self.current = None;
                    if retried == self.retries {
                        return Err(e);
                    }
                    retried += 1;
                    warn!(
                        "Speed probe failed: {e}; retrying with a new probe instance ({retried}/{})",
                        self.retries
                    );
                }
            }
        }
    }
}
