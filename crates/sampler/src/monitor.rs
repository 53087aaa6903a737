use crate::reader::SnapshotReader;
use crate::scheduler::{Scheduler, SchedulerHandle, SchedulerState};
use crate::window::Window;
use speedmon_config::MonitorConfig;
use speedmon_history::HistoryStore;
use speedmon_probe::SpeedProbe;
use tracing::{error, info};

/// A running acquisition pipeline: history store, seeded window and the
/// scheduler feeding both.
///
/// Changing capacity means stopping this monitor and starting a new one,
/// which re-seeds from the history log.
pub struct Monitor {
    handle: SchedulerHandle,
    reader: SnapshotReader,
}

impl Monitor {
    /// Load the history log, seed the window with its tail and spawn the
    /// scheduler.  The log is read on the blocking pool.
    pub async fn start<P: SpeedProbe>(config: &MonitorConfig, probe: P) -> Self {
        let store = HistoryStore::new(&config.history_file, config.max_history);
        let loader = store.clone();
        let history = tokio::task::spawn_blocking(move || loader.load())
            .await
            .unwrap_or_else(|e| {
                error!("History loader panicked: {e}; starting with an empty window");
                Vec::new()
            });
        let window = Window::seeded(config.max_data_points, &history);

        info!(
            "Loaded {} historical sample(s) from '{}'; window holds {}/{}",
            history.len(),
            store.path().display(),
            window.len(),
            window.capacity()
        );

        let (writer, reader) = window.into_shared();
        let handle = Scheduler::new(probe, writer, store, config.test_interval()).spawn();

        Self { handle, reader }
    }

    /// A reader for the consumer; cheap to clone and share.
    pub fn reader(&self) -> SnapshotReader {
        self.reader.clone()
    }

    pub fn state(&self) -> SchedulerState {
        self.handle.state()
    }

    /// Stop sampling and wait for the scheduler to exit.
    pub async fn stop(self) {
        self.handle.stop().await;
    }
}
