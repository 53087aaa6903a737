/// Format a rate in megabits per second (e.g. `"93.42 Mbps"`, `"1.20 Gbps"`).
pub fn format_mbps(mbps: f64) -> String {
    const GBPS: f64 = 1_000.0;

    if mbps >= GBPS {
        format!("{:.2} Gbps", mbps / GBPS)
    } else {
        format!("{mbps:.2} Mbps")
    }
}
