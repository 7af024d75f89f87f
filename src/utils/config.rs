//! Configuration and constants for the analyzer.

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Number of space-separated fields in an NS2 trace line
pub const TRACE_FIELD_COUNT: usize = 12;

/// Packet types taken into account by the aggregators.
/// Anything else (routing, ack, arp ...) parses but is ignored.
pub const ACCEPTED_PACKET_TYPES: &[&str] = &["tcp", "udp", "cbr"];

/// Placeholder written in the flags column when re-serializing a record
pub const EMPTY_FLAGS_FIELD: &str = "-------";

// Chart defaults
pub const DEFAULT_CHART_WIDTH: usize = 800;
pub const DEFAULT_CHART_HEIGHT: usize = 400;
pub const MAX_CHART_DIMENSION: usize = 10_000;
pub const MIN_CHART_DIMENSION: usize = 100;
pub const ZOOM_Y_RANGE: (f64, f64) = (-0.5, 0.5);

// Analysis identifiers are six decimal digits
pub const ANALYSIS_ID_MIN: u32 = 100_000;
pub const ANALYSIS_ID_MAX: u32 = 999_999;
pub const MAX_ID_ATTEMPTS: usize = 64;

/// Returns true when the aggregators should look at this packet type
pub fn is_accepted_packet_type(packet_type: &str) -> bool {
    ACCEPTED_PACKET_TYPES.contains(&packet_type)
}
