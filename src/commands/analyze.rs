//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Parses the trace file
//! 2. Runs the stats and jitter passes
//! 3. Stores the analysis under a fresh id
//! 4. Writes the JSON report
//! 5. Renders per-flow charts (optional)

use super::models::AnalyzeArgs;
use crate::analysis::{analyze, AnalysisId, AnalysisStore, IdGenerator};
use crate::chart::{generate_jitter_chart, generate_text_summary};
use crate::output::{write_report, write_svg, AnalysisReport};
use crate::parser::{parse_trace_reader, TraceRecord};
use crate::utils::config::{MAX_CHART_DIMENSION, MIN_CHART_DIMENSION};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Identifier the analysis was stored under
///
/// # Errors
/// * Trace file missing or malformed
/// * Store could not allocate an id
/// * File write errors
pub fn execute_analyze<G: IdGenerator>(
    args: AnalyzeArgs,
    store: &mut AnalysisStore<G>,
) -> Result<AnalysisId> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.trace.display());

    // Step 1: Parse trace
    info!("Step 1/4: Parsing trace...");
    let records = load_trace(&args.trace)?;
    info!("Parsed {} records", records.len());

    // Step 2: Aggregate
    info!("Step 2/4: Computing statistics and jitter...");
    let analysis = analyze(records);

    // Step 3: Store and write report
    info!("Step 3/4: Writing report...");
    let id = store
        .create(analysis)
        .context("Failed to store analysis")?;
    let analysis = store.require(&id)?;

    let source = args
        .trace
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let report = AnalysisReport::new(&id, source, &analysis);
    write_report(&report, &args.output_json).context("Failed to write analysis report")?;

    info!("✓ Report written to: {}", args.output_json.display());

    // Step 4: Charts (if requested)
    if let Some(dir) = &args.charts_dir {
        info!("Step 4/4: Rendering {} jitter charts...", analysis.jitter.len());
        let mut written = 0;
        for (key, stat) in &analysis.jitter {
            if stat.is_empty() {
                warn!("Flow {} has no jitter samples, skipping chart", key);
                continue;
            }
            let svg = generate_jitter_chart(stat, &args.chart_config)
                .with_context(|| format!("Failed to render chart for flow {}", key))?;
            let path = dir.join(format!(
                "{}_{}_{}.svg",
                key.from_node, key.to_node, key.packet_type
            ));
            write_svg(&svg, &path).context("Failed to write jitter chart")?;
            written += 1;
        }
        info!("✓ {} charts written to: {}", written, dir.display());
    } else {
        info!("Step 4/4: Skipping chart rendering (not requested)");
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(60));
        println!("ANALYSIS {}", id);
        println!("{}", "=".repeat(60));
        println!("Trace:   {}", args.trace.display());
        println!("Records: {}", analysis.records.len());
        println!(
            "\n{}",
            generate_text_summary(&analysis.stats, &analysis.jitter, args.max_flows)
        );
        println!("{}", "=".repeat(60));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis {} completed in {:.2}s", id, elapsed.as_secs_f64());

    Ok(id)
}

/// Open and parse a trace file
///
/// **Public** - shared by the analyze and chart commands
pub fn load_trace(path: &Path) -> Result<Vec<TraceRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open trace file {}", path.display()))?;
    let records = parse_trace_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse trace file {}", path.display()))?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.trace.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if args.max_flows == 0 {
        anyhow::bail!("max_flows must be greater than 0");
    }

    validate_chart_size(args.chart_config.width, args.chart_config.height)
}

/// Check chart dimensions are within sane bounds
pub fn validate_chart_size(width: usize, height: usize) -> Result<()> {
    for (name, value) in [("width", width), ("height", height)] {
        if !(MIN_CHART_DIMENSION..=MAX_CHART_DIMENSION).contains(&value) {
            anyhow::bail!(
                "Chart {} must be between {} and {} pixels",
                name,
                MIN_CHART_DIMENSION,
                MAX_CHART_DIMENSION
            );
        }
    }
    Ok(())
}
