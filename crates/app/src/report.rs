use speedmon_core::{format_mbps, Sample, SpeedStats};

/// One-line status report for a window snapshot.
pub fn status_line(samples: &[Sample]) -> String {
    let Some(stats) = SpeedStats::from_samples(samples) else {
        return "waiting for first measurement".to_string();
    };
    let (down, up) = (stats.download, stats.upload);

    // `from_samples` returned Some, so the snapshot is non-empty.
    let since = samples[0].timestamp().format("%H:%M:%S");

    format!(
        "↓{} ↑{} | avg ↓{} ↑{} | max ↓{} ↑{} | min ↓{} ↑{} | {} sample(s) since {since}",
        format_mbps(down.current),
        format_mbps(up.current),
        format_mbps(down.average),
        format_mbps(up.average),
        format_mbps(down.max),
        format_mbps(up.max),
        format_mbps(down.min),
        format_mbps(up.min),
        stats.samples,
    )
}
