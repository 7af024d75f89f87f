use crate::output::read_report;
use crate::utils::config::{ACCEPTED_PACKET_TYPES, REPORT_SCHEMA_VERSION};
use anyhow::Result;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    let samples: usize = report.flows.iter().map(|f| f.sequence.len()).sum();
    if let Some(flow) = report
        .flows
        .iter()
        .find(|f| f.sequence.len() != f.jitter.len())
    {
        anyhow::bail!(
            "Flow {}:{}:{} has {} sequence numbers but {} jitter values",
            flow.from_node,
            flow.to_node,
            flow.packet_type,
            flow.sequence.len(),
            flow.jitter.len()
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Analysis: {}", report.analysis_id);
    println!("  Source: {}", report.source);
    println!("  Records: {}", report.record_count);
    println!("  Received: {}", report.stats.received_packets);
    println!("  Flows: {} ({} jitter samples)", report.flows.len(), samples);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("NS Trace Analyzer Report Schema");
    println!("Current Version: {}", REPORT_SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Trace input: 12 space-separated columns per line");
        println!("  event time from to type size flags flow_id src.port dst.port seq uid");
        println!("  analysed packet types: {}", ACCEPTED_PACKET_TYPES.join(", "));
        println!();
        println!("Report Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  analysis_id: string      - Identifier of the stored analysis");
        println!("  source: string           - Trace file name");
        println!("  record_count: number     - Parsed trace records");
        println!("  stats: object            - Aggregate traffic statistics");
        println!("    throughput: number?    - Received / sent in percent (null if nothing sent)");
        println!("    avg_hops: number?      - Hops per received packet");
        println!("    avg_delay: number?     - Seconds from first enqueue to receive");
        println!("  flows: array             - Per-flow jitter series");
        println!("    sequence: number[]     - Sequence numbers, ascending");
        println!("    jitter: number[]       - Jitter for each sequence number");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("NS Trace Analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Throughput, loss, delay and jitter analysis for NS2 traces.");
}
