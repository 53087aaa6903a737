use crate::reader::{lock, WindowWriter};
use speedmon_core::Sample;
use speedmon_history::HistoryStore;
use speedmon_probe::SpeedProbe;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Where the sampling loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, no cycle started yet.
    Idle,
    /// A measurement is in flight.
    Probing,
    /// The last cycle produced a sample.
    Accepted,
    /// The last cycle's measurement failed; nothing was recorded.
    Failed,
    /// Waiting out the interval before the next cycle.
    Sleeping,
    /// The loop has exited and will not probe again.
    Stopped,
}

/// Result of a single sampling cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The sample is in the window; `persisted` says whether the history
    /// log was updated too.
    Accepted { sample: Sample, persisted: bool },
    Failed,
}

/// Background loop: probe, record, sleep, repeat.
///
/// Cycles are strictly sequential and the interval is measured from the end
/// of one cycle to the start of the next, so a slow probe stretches the
/// cadence instead of piling up measurements.  Probe failures skip the cycle
/// and history write failures only cost durability; neither stops the loop.
pub struct Scheduler<P> {
    probe:    Arc<Mutex<P>>,
    window:   WindowWriter,
    store:    Arc<HistoryStore>,
    interval: Duration,
    state:    watch::Sender<SchedulerState>,
}

impl<P: SpeedProbe> Scheduler<P> {
    pub fn new(probe: P, window: WindowWriter, store: HistoryStore, interval: Duration) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            probe: Arc::new(Mutex::new(probe)),
            window,
            store: Arc::new(store),
            interval,
            state,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.send_replace(state);
    }

    /// Run exactly one probe → window → history cycle.
    ///
    /// The probe and the history write run on the blocking pool so the
    /// runtime (and any snapshot consumer on it) is never stalled.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.set_state(SchedulerState::Probing);

        let probe = Arc::clone(&self.probe);
        let measured = tokio::task::spawn_blocking(move || {
            let mut probe = lock(&probe);
            probe.measure()
        })
        .await;

        let sample = match measured {
            Ok(Ok(t)) => Sample::now(t.download_mbps, t.upload_mbps),
            Ok(Err(e)) => Err(e),
            Err(e) => {
                error!("Speed probe panicked: {e}");
                return self.fail();
            }
        };
        let sample = match sample {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Speed test error: {e}; skipping this cycle");
                return self.fail();
            }
        };

        self.window.push(sample);

        let store = Arc::clone(&self.store);
        let persisted = match tokio::task::spawn_blocking(move || store.append(sample)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("{e}; sample kept in memory only");
                false
            }
            Err(e) => {
                error!("History writer panicked: {e}; sample kept in memory only");
                false
            }
        };

        info!(
            "{} - Down: {:.2} Mbps, Up: {:.2} Mbps",
            sample.timestamp().format("%H:%M:%S"),
            sample.download_mbps(),
            sample.upload_mbps()
        );

        self.set_state(SchedulerState::Accepted);
        CycleOutcome::Accepted { sample, persisted }
    }

    fn fail(&self) -> CycleOutcome {
        self.set_state(SchedulerState::Failed);
        CycleOutcome::Failed
    }

    /// Spawn the loop as a Tokio task.  Must be called inside a runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let state = self.state.subscribe();
        let task = tokio::spawn(self.run(stop_rx));
        SchedulerHandle {
            stop: stop_tx,
            state,
            task,
        }
    }

    async fn run(mut self, mut stop: watch::Receiver<bool>) {
        info!("Sampling scheduler started (interval {:?})", self.interval);

        while !*stop.borrow() {
            self.run_cycle().await;
            if *stop.borrow() {
                break;
            }

            self.set_state(SchedulerState::Sleeping);
            // A stop request (or a dropped handle) cuts the sleep short.
            let stopped = tokio::select! {
                () = tokio::time::sleep(self.interval) => false,
                _ = stop.changed() => true,
            };
            if stopped {
                break;
            }
        }

        self.set_state(SchedulerState::Stopped);
        info!("Sampling scheduler stopped");
    }
}

/// Control handle for a spawned [`Scheduler`].
///
/// Dropping the handle also stops the loop at its next sleep.
pub struct SchedulerHandle {
    stop:  watch::Sender<bool>,
    state: watch::Receiver<SchedulerState>,
    task:  JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Ask the loop to stop.  A measurement already in flight is allowed to
    /// finish and be recorded; no new cycle starts.
    pub fn request_stop(&self) {
        self.stop.send_replace(true);
    }

    /// Request a stop and wait for the loop to exit.
    pub async fn stop(self) {
        self.request_stop();
        if let Err(e) = self.task.await {
            error!("Sampling scheduler task failed: {e}");
        }
    }
}
