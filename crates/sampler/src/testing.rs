//! Probe doubles and polling helpers shared by the sampler tests.

use speedmon_core::{MonitorError, Result};
use speedmon_probe::{SpeedProbe, Throughput};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Counts measurements; shared between a probe and the test body.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn ok(mbps: f64) -> Result<Throughput> {
    Ok(Throughput {
        download_mbps: mbps,
        upload_mbps:   mbps / 10.0,
    })
}

/// Plays back scripted outcomes (`None` = failure), then fails forever.
pub struct Scripted {
    script: VecDeque<Option<f64>>,
    pub calls: Calls,
}

impl Scripted {
    pub fn new(script: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls:  Calls::default(),
        }
    }
}

impl SpeedProbe for Scripted {
    fn measure(&mut self) -> Result<Throughput> {
        self.calls.bump();
        match self.script.pop_front().flatten() {
            Some(mbps) => ok(mbps),
            None => Err(MonitorError::Probe("network unreachable".into())),
        }
    }
}

/// Always succeeds; the n-th measurement reports `n` Mbps down.
#[derive(Default)]
pub struct Steady {
    pub calls: Calls,
}

impl SpeedProbe for Steady {
    fn measure(&mut self) -> Result<Throughput> {
        ok(self.calls.bump() as f64)
    }
}

/// Blocks inside `measure` until the test releases it.
pub struct Gated {
    release: mpsc::Receiver<()>,
    pub calls: Calls,
}

impl Gated {
    pub fn new() -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let probe = Self {
            release: rx,
            calls:   Calls::default(),
        };
        (probe, tx)
    }
}

impl SpeedProbe for Gated {
    fn measure(&mut self) -> Result<Throughput> {
        let n = self.calls.bump();
        let _ = self.release.recv();
        ok(n as f64)
    }
}

/// Poll `cond` until it holds, failing the test after five seconds.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
