//! Run both aggregation passes over a parsed trace.

use crate::aggregator::{compute_jitter, compute_stats, FlowKey, JitterStat, TraceStats};
use crate::parser::schema::TraceRecord;
use log::info;
use std::collections::BTreeMap;
use std::time::Instant;

/// Result of analysing one trace
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<TraceRecord>,
    pub stats: TraceStats,
    pub jitter: BTreeMap<FlowKey, JitterStat>,
}

impl Analysis {
    /// Look up one flow's jitter series
    pub fn flow(&self, key: &FlowKey) -> Option<&JitterStat> {
        self.jitter.get(key)
    }
}

/// Analyse a fully parsed trace
///
/// **Public** - main entry point after parsing
///
/// The stats and jitter passes run concurrently on the rayon pool over the
/// same read-only slice; this returns once both have finished.
pub fn analyze(records: Vec<TraceRecord>) -> Analysis {
    let start = Instant::now();

    let (stats, jitter) = rayon::join(|| compute_stats(&records), || compute_jitter(&records));

    info!(
        "Analysed {} records ({} flows) in {:.3}s",
        records.len(),
        jitter.len(),
        start.elapsed().as_secs_f64()
    );

    Analysis {
        records,
        stats,
        jitter,
    }
}
