//! Aggregate traffic statistics over a whole trace.
//!
//! One left-to-right pass in input order. Ratios whose denominator is
//! zero come out as NaN and are passed through untouched.

use crate::parser::schema::{TraceEvent, TraceRecord};
use crate::utils::config::is_accepted_packet_type;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Summary statistics for one trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceStats {
    /// Records with an accepted packet type
    pub total_entries: u64,
    pub received_packets: u64,
    pub dropped_packets: u64,
    pub collisions: u64,

    /// Dequeued minus received. Negative when receives outnumber dequeues.
    pub lost_packets: i64,

    /// Received / dequeued, in percent
    pub throughput: f64,

    /// Approximate hops per received packet
    pub avg_hops: f64,

    /// Mean enqueue-to-receive time in seconds
    pub avg_delay: f64,

    /// Distinct node ids seen on either end of a record
    pub active_nodes: u64,

    /// Sum of packet sizes in bytes, saturating at `u64::MAX`
    pub total_bandwidth: u64,

    /// Latest simulation time seen
    pub network_time: f64,
}

/// Compute aggregate statistics for a trace
///
/// **Public** - main entry point for stats calculation
///
/// Never fails. `throughput`, `avg_hops` and `avg_delay` are NaN when
/// nothing was dequeued, received, or delay-matched respectively.
pub fn compute_stats(records: &[TraceRecord]) -> TraceStats {
    let mut stats = TraceStats::default();
    let mut counters = PassCounters::default();

    for record in records {
        if !is_accepted_packet_type(&record.packet_type) {
            continue;
        }
        stats.total_entries += 1;

        match record.event {
            TraceEvent::Receive => {
                stats.received_packets += 1;
                if let Some(sent) = counters.sent_time.get(&record.unique_packet_id) {
                    counters.delay_sum += record.time - sent;
                    counters.delay_samples += 1;
                }
            }
            TraceEvent::Drop => stats.dropped_packets += 1,
            TraceEvent::Enqueue => {
                counters.enqueue_backlog += 1;
                counters
                    .sent_time
                    .entry(record.unique_packet_id)
                    .or_insert(record.time);
            }
            TraceEvent::Dequeue => {
                counters.total_sent += 1;
                // Pair each dequeue with an outstanding enqueue to approximate hops
                if counters.enqueue_backlog > 0 {
                    counters.enqueue_backlog -= 1;
                    counters.hops += 1;
                }
            }
            TraceEvent::Collision => stats.collisions += 1,
        }

        for node in [record.from_node, record.to_node] {
            if counters.nodes.insert(node) {
                stats.active_nodes += 1;
            }
        }
        stats.total_bandwidth = stats.total_bandwidth.saturating_add(record.packet_size);
        if record.time > stats.network_time {
            stats.network_time = record.time;
        }
    }

    stats.lost_packets = counters.total_sent as i64 - stats.received_packets as i64;
    stats.throughput = ratio(stats.received_packets as f64, counters.total_sent) * 100.0;
    stats.avg_hops = ratio(counters.hops as f64, stats.received_packets);
    stats.avg_delay = ratio(counters.delay_sum, counters.delay_samples);

    debug!(
        "Stats pass: {} entries, {} received, {} sent, {} active nodes",
        stats.total_entries, stats.received_packets, counters.total_sent, stats.active_nodes
    );

    stats
}

/// Running state that does not end up in the summary
#[derive(Debug, Default)]
struct PassCounters {
    enqueue_backlog: u64,
    total_sent: u64,
    hops: u64,
    delay_sum: f64,
    delay_samples: u64,
    /// unique packet id -> first enqueue time
    sent_time: HashMap<i64, f64>,
    nodes: HashSet<u32>,
}

/// Division that yields NaN for a zero denominator
///
/// **Private** - internal utility
fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator / denominator as f64
    }
}
