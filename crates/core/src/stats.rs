use crate::sample::Sample;

/// Summary of one direction (download or upload) over a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSummary {
    /// Rate of the most recent sample.
    pub current: f64,
    pub average: f64,
    pub min:     f64,
    pub max:     f64,
}

impl RateSummary {
    fn from_rates(rates: impl Iterator<Item = f64> + Clone) -> Option<Self> {
        let current = rates.clone().last()?;
        let (mut min, mut max, mut sum, mut n) = (f64::MAX, f64::MIN, 0.0, 0usize);
        for rate in rates {
            min = min.min(rate);
            max = max.max(rate);
            sum += rate;
            n += 1;
        }
        Some(Self {
            current,
            average: sum / n as f64,
            min,
            max,
        })
    }
}

/// Derived statistics over a window snapshot, as shown in the status report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedStats {
    pub samples:  usize,
    pub download: RateSummary,
    pub upload:   RateSummary,
}

impl SpeedStats {
    /// Returns `None` for an empty snapshot.
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        Some(Self {
            samples:  samples.len(),
            download: RateSummary::from_rates(samples.iter().map(Sample::download_mbps))?,
            upload:   RateSummary::from_rates(samples.iter().map(Sample::upload_mbps))?,
        })
    }
}
