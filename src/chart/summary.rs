//! Plain-text summary of an analysis for the terminal.

use crate::aggregator::{FlowKey, JitterStat, TraceStats};
use std::collections::BTreeMap;

/// Format a ratio, showing `n/a` for NaN
fn ratio(value: f64, precision: usize, suffix: &str) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.*}{}", precision, value, suffix)
    }
}

/// Create a text summary with the aggregate counters and busiest flows
pub fn generate_text_summary(
    stats: &TraceStats,
    jitter: &BTreeMap<FlowKey, JitterStat>,
    max_flows: usize,
) -> String {
    let mut lines = Vec::new();

    lines.push("  TRAFFIC STATISTICS".to_string());
    lines.push(format!("  {:<20} {:>14}", "Entries", stats.total_entries));
    lines.push(format!("  {:<20} {:>14}", "Received", stats.received_packets));
    lines.push(format!("  {:<20} {:>14}", "Dropped", stats.dropped_packets));
    lines.push(format!("  {:<20} {:>14}", "Collisions", stats.collisions));
    lines.push(format!("  {:<20} {:>14}", "Lost", stats.lost_packets));
    lines.push(format!("  {:<20} {:>14}", "Throughput", ratio(stats.throughput, 2, "%")));
    lines.push(format!("  {:<20} {:>14}", "Avg hops", ratio(stats.avg_hops, 3, "")));
    lines.push(format!("  {:<20} {:>14}", "Avg delay", ratio(stats.avg_delay, 6, " s")));
    lines.push(format!("  {:<20} {:>14}", "Active nodes", stats.active_nodes));
    lines.push(format!("  {:<20} {:>14}", "Bandwidth", format!("{} B", stats.total_bandwidth)));
    lines.push(format!("  {:<20} {:>14}", "Network time", format!("{:.3} s", stats.network_time)));

    lines.push(String::new());
    lines.push(format!("  JITTER FLOWS ({})", jitter.len()));

    let mut flows: Vec<&JitterStat> = jitter.values().collect();
    // Most samples first, ties by flow key
    flows.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.key().cmp(b.key())));

    for stat in flows.iter().take(max_flows) {
        let mean = if stat.is_empty() {
            f64::NAN
        } else {
            stat.jitter().values().sum::<f64>() / stat.len() as f64
        };
        lines.push(format!(
            "  {:<20} {:>8} samples   mean {}",
            stat.key().to_string(),
            stat.len(),
            ratio(mean, 6, "")
        ));
    }

    if jitter.len() > max_flows {
        lines.push(format!("   (Showing top {} of {} flows)", max_flows, jitter.len()));
    }

    lines.join("\n")
}
