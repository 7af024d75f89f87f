//! Per-flow jitter time series.
//!
//! A flow is identified by (from node, to node, packet type). For each
//! receive event on a flow, jitter is the time since the previous sample
//! divided by how far the sequence number advanced.

use crate::parser::schema::{TraceEvent, TraceRecord};
use crate::utils::config::is_accepted_packet_type;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Composite key of a flow
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowKey {
    pub from_node: u32,
    pub to_node: u32,
    pub packet_type: String,
}

impl FlowKey {
    pub fn new(from_node: u32, to_node: u32, packet_type: impl Into<String>) -> Self {
        Self {
            from_node,
            to_node,
            packet_type: packet_type.into(),
        }
    }

    fn of(record: &TraceRecord) -> Self {
        Self::new(record.from_node, record.to_node, record.packet_type.clone())
    }
}

/// Formats as `from:to:type`
impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.from_node, self.to_node, self.packet_type)
    }
}

impl FromStr for FlowKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(from), Some(to), Some(packet_type)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected <from>:<to>:<type>, got '{}'", s));
        };
        if packet_type.is_empty() {
            return Err(format!("missing packet type in '{}'", s));
        }
        let from_node = from
            .parse()
            .map_err(|e| format!("invalid from node '{}': {}", from, e))?;
        let to_node = to
            .parse()
            .map_err(|e| format!("invalid to node '{}': {}", to, e))?;
        Ok(Self::new(from_node, to_node, packet_type))
    }
}

/// Jitter samples for one flow
#[derive(Debug, Clone, PartialEq)]
pub struct JitterStat {
    key: FlowKey,
    /// sequence number -> jitter
    jitter: BTreeMap<i64, f64>,
    last_time: f64,
    last_seq: i64,
}

impl JitterStat {
    fn new(key: FlowKey) -> Self {
        Self {
            key,
            jitter: BTreeMap::new(),
            last_time: 0.0,
            last_seq: 0,
        }
    }

    pub fn key(&self) -> &FlowKey {
        &self.key
    }

    /// Jitter samples keyed by sequence number
    pub fn jitter(&self) -> &BTreeMap<i64, f64> {
        &self.jitter
    }

    pub fn get(&self, sequence_num: i64) -> Option<f64> {
        self.jitter.get(&sequence_num).copied()
    }

    pub fn len(&self) -> usize {
        self.jitter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jitter.is_empty()
    }

    /// Sequence numbers in ascending order and the matching jitter values
    ///
    /// This is the shape chart front ends consume: `[xs, ys]`.
    pub fn series(&self) -> (Vec<f64>, Vec<f64>) {
        self.jitter
            .iter()
            .map(|(&seq, &value)| (seq as f64, value))
            .unzip()
    }

    /// Fold one receive event into the series
    fn record(&mut self, time: f64, sequence_num: i64) {
        let mut diff = sequence_num.saturating_sub(self.last_seq);
        // A repeated sequence number counts as a step of one
        if diff == 0 {
            diff = 1;
        }
        // Out-of-order packets are dropped from the series
        if diff < 0 {
            return;
        }
        self.jitter
            .insert(sequence_num, (time - self.last_time) / diff as f64);
        self.last_time = time;
        self.last_seq = sequence_num;
    }
}

/// Compute jitter series for every flow in a trace
///
/// **Public** - main entry point for jitter calculation
///
/// Only receive events with an accepted packet type take part. Never fails.
pub fn compute_jitter(records: &[TraceRecord]) -> BTreeMap<FlowKey, JitterStat> {
    let mut flows: BTreeMap<FlowKey, JitterStat> = BTreeMap::new();

    for record in records {
        if record.event != TraceEvent::Receive || !is_accepted_packet_type(&record.packet_type) {
            continue;
        }
        let key = FlowKey::of(record);
        flows
            .entry(key)
            .or_insert_with_key(|key| JitterStat::new(key.clone()))
            .record(record.time, record.sequence_num);
    }

    debug!(
        "Jitter pass: {} flows, {} samples",
        flows.len(),
        flows.values().map(JitterStat::len).sum::<usize>()
    );

    flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_trace;

    fn jitter_for(lines: &[&str]) -> BTreeMap<FlowKey, JitterStat> {
        compute_jitter(&parse_trace(lines).unwrap())
    }

    #[test]
    fn test_empty_trace() {
        assert!(compute_jitter(&[]).is_empty());
    }

    #[test]
    fn test_non_receive_events_ignored() {
        let flows = jitter_for(&[
            "+ 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100",
            "- 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100",
            "d 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100",
        ]);
        assert!(flows.is_empty());
    }

    #[test]
    fn test_first_sample_measured_from_zero() {
        let flows = jitter_for(&[
            "r 10.0 1 2 tcp 1000 - 7 1.0 2.0 5 100",
            "r 10.5 1 2 tcp 1000 - 7 1.0 2.0 6 101",
        ]);
        let stat = &flows[&FlowKey::new(1, 2, "tcp")];

        assert_eq!(stat.get(5), Some(2.0));
        assert_eq!(stat.get(6), Some(0.5));
    }

    #[test]
    fn test_backward_sequence_dropped() {
        let mut stat = JitterStat::new(FlowKey::new(0, 1, "cbr"));
        stat.record(1.0, 4);
        stat.record(2.0, 3);

        assert_eq!(stat.len(), 1);
        assert_eq!(stat.last_seq, 4);
        assert_eq!(stat.last_time, 1.0);
    }

    #[test]
    fn test_repeated_sequence_overwrites_with_unit_step() {
        let mut stat = JitterStat::new(FlowKey::new(0, 1, "cbr"));
        stat.record(1.0, 4);
        stat.record(1.75, 4);

        assert_eq!(stat.len(), 1);
        assert_eq!(stat.get(4), Some(0.75));
        assert_eq!(stat.last_time, 1.75);
    }

    #[test]
    fn test_sequence_gap_divides_interval() {
        let mut stat = JitterStat::new(FlowKey::new(0, 1, "udp"));
        stat.record(1.0, 1);
        stat.record(3.0, 5);
        assert_eq!(stat.get(5), Some(0.5));
    }

    #[test]
    fn test_flows_are_separated() {
        let flows = jitter_for(&[
            "r 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100",
            "r 1.0 0 1 udp 1000 - 7 0.0 1.0 1 101",
            "r 1.0 1 0 tcp 1000 - 7 0.0 1.0 1 102",
            "r 1.0 0 1 ack 40 - 7 0.0 1.0 1 103",
        ]);
        assert_eq!(flows.len(), 3);
        assert!(!flows.contains_key(&FlowKey::new(0, 1, "ack")));
    }

    #[test]
    fn test_series_sorted_by_sequence() {
        let flows = jitter_for(&[
            "r 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100",
            "r 3.0 0 1 tcp 1000 - 7 0.0 1.0 3 101",
            "r 4.0 0 1 tcp 1000 - 7 0.0 1.0 10 102",
        ]);
        let (xs, ys) = flows[&FlowKey::new(0, 1, "tcp")].series();
        assert_eq!(xs, vec![1.0, 3.0, 10.0]);
        assert_eq!(ys, vec![1.0, 1.0, 1.0 / 7.0]);
    }

    #[test]
    fn test_flow_key_round_trip() {
        let key: FlowKey = "3:4:cbr".parse().unwrap();
        assert_eq!(key, FlowKey::new(3, 4, "cbr"));
        assert_eq!(key.to_string(), "3:4:cbr");

        assert!("3:4".parse::<FlowKey>().is_err());
        assert!("a:4:tcp".parse::<FlowKey>().is_err());
        assert!("3:4:".parse::<FlowKey>().is_err());
    }
}
