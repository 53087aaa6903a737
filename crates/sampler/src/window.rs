use crate::reader::{SnapshotReader, WindowWriter};
use speedmon_core::Sample;
use std::collections::VecDeque;

/// Rolling window of the most recent samples, oldest first.
///
/// Capacity is fixed at construction; a different capacity means a new
/// window seeded from the history log.
#[derive(Debug, Clone)]
pub struct Window {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl Window {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// A window holding the tail of `history`.
    pub fn seeded(capacity: usize, history: &[Sample]) -> Self {
        let mut window = Self::new(capacity);
        window.seed(history);
        window
    }

    /// Replace the contents with the last `capacity` entries of `history`.
    pub fn seed(&mut self, history: &[Sample]) {
        let skip = history.len().saturating_sub(self.capacity);
        self.samples.clear();
        self.samples.extend(history[skip..].iter().copied());
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Independent copy of the current contents, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Split into the scheduler's writer half and a cloneable reader half.
    pub fn into_shared(self) -> (WindowWriter, SnapshotReader) {
        WindowWriter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn at(sec: u32) -> Sample {
        let ts = Local.with_ymd_and_hms(2024, 5, 1, 8, 0, sec).single().unwrap();
        Sample::new(ts, f64::from(sec), 1.0).unwrap()
    }

    fn seconds(samples: &[Sample]) -> Vec<f64> {
        samples.iter().map(Sample::download_mbps).collect()
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut window = Window::new(3);
        for sec in 1..=4 {
            window.push(at(sec));
        }
        assert_eq!(window.snapshot(), vec![at(2), at(3), at(4)]);
    }

    #[test]
    fn keeps_most_recent_in_insertion_order() {
        for capacity in 1..=6 {
            let mut window = Window::new(capacity);
            for pushed in 1..=10u32 {
                window.push(at(pushed));
                let snap = window.snapshot();
                let expected_len = (pushed as usize).min(capacity);
                assert_eq!(snap.len(), expected_len);
                let first = pushed + 1 - expected_len as u32;
                let expected: Vec<f64> = (first..=pushed).map(f64::from).collect();
                assert_eq!(seconds(&snap), expected);
            }
        }
    }

    #[test]
    fn seed_keeps_tail_of_longer_history() {
        let history: Vec<_> = (1..=5).map(at).collect();
        let window = Window::seeded(3, &history);
        assert_eq!(window.snapshot(), vec![at(3), at(4), at(5)]);
    }

    #[test]
    fn seed_keeps_all_of_shorter_history() {
        let history = vec![at(1), at(2)];
        let window = Window::seeded(4, &history);
        assert_eq!(window.snapshot(), history);
        assert_eq!(window.latest(), Some(at(2)));
    }

    #[test]
    fn seed_from_empty_history() {
        let window = Window::seeded(4, &[]);
        assert!(window.is_empty());
        assert!(window.snapshot().is_empty());
        assert_eq!(window.latest(), None);
    }

    #[test]
    fn seed_replaces_previous_contents() {
        let mut window = Window::seeded(2, &[at(1), at(2)]);
        window.seed(&[at(9)]);
        assert_eq!(window.snapshot(), vec![at(9)]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut window = Window::new(0);
        window.push(at(1));
        window.push(at(2));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.snapshot(), vec![at(2)]);
    }

    #[test]
    fn snapshot_is_independent_of_later_pushes() {
        let mut window = Window::new(2);
        window.push(at(1));
        let snap = window.snapshot();
        window.push(at(2));
        window.push(at(3));
        assert_eq!(snap, vec![at(1)]);
        assert_eq!(window.len(), 2);
    }
}
