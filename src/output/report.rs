//! Report JSON schema definitions.
//!
//! This module defines the structure of the JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{JitterStat, TraceStats};
use crate::analysis::{Analysis, AnalysisId};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Identifier the analysis was stored under
    pub analysis_id: String,

    /// Trace file the analysis was run on
    pub source: String,

    /// Number of parsed records, including ones the aggregators filtered out
    pub record_count: usize,

    pub stats: StatsSummary,

    /// One entry per flow, ordered by flow key
    pub flows: Vec<FlowSeries>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Aggregate statistics. Undefined ratios are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_entries: u64,
    pub received_packets: u64,
    pub dropped_packets: u64,
    pub collisions: u64,
    pub lost_packets: i64,
    pub throughput: Option<f64>,
    pub avg_hops: Option<f64>,
    pub avg_delay: Option<f64>,
    pub active_nodes: u64,
    pub total_bandwidth: u64,
    pub network_time: f64,
}

impl From<&TraceStats> for StatsSummary {
    fn from(stats: &TraceStats) -> Self {
        Self {
            total_entries: stats.total_entries,
            received_packets: stats.received_packets,
            dropped_packets: stats.dropped_packets,
            collisions: stats.collisions,
            lost_packets: stats.lost_packets,
            throughput: defined(stats.throughput),
            avg_hops: defined(stats.avg_hops),
            avg_delay: defined(stats.avg_delay),
            active_nodes: stats.active_nodes,
            total_bandwidth: stats.total_bandwidth,
            network_time: stats.network_time,
        }
    }
}

/// Jitter series of one flow, as parallel arrays sorted by sequence number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSeries {
    pub from_node: u32,
    pub to_node: u32,
    pub packet_type: String,
    pub sequence: Vec<i64>,
    pub jitter: Vec<f64>,
}

impl From<&JitterStat> for FlowSeries {
    fn from(stat: &JitterStat) -> Self {
        let (sequence, jitter) = stat.jitter().iter().map(|(&seq, &j)| (seq, j)).unzip();
        Self {
            from_node: stat.key().from_node,
            to_node: stat.key().to_node,
            packet_type: stat.key().packet_type.clone(),
            sequence,
            jitter,
        }
    }
}

impl AnalysisReport {
    /// Build the report for a stored analysis
    pub fn new(id: &AnalysisId, source: impl Into<String>, analysis: &Analysis) -> Self {
        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            analysis_id: id.to_string(),
            source: source.into(),
            record_count: analysis.records.len(),
            stats: StatsSummary::from(&analysis.stats),
            flows: analysis.jitter.values().map(FlowSeries::from).collect(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}
