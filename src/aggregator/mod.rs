//! Aggregation passes over parsed trace records.
//!
//! Both passes take the full record slice read-only and own their output,
//! so they can run side by side.

pub mod jitter;
pub mod stats;

pub use jitter::{compute_jitter, FlowKey, JitterStat};
pub use stats::{compute_stats, TraceStats};
