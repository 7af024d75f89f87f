//! Chart command implementation.
//! Renders the jitter series of a single flow to SVG.

use super::analyze::{load_trace, validate_chart_size};
use super::models::ChartArgs;
use crate::aggregator::compute_jitter;
use crate::chart::generate_jitter_chart;
use crate::output::write_svg;
use anyhow::{Context, Result};
use log::info;

/// Execute the chart command
///
/// Only the jitter pass is needed here, so stats are not computed.
pub fn execute_chart(args: ChartArgs) -> Result<()> {
    validate_chart_size(args.chart_config.width, args.chart_config.height)?;

    let records = load_trace(&args.trace)?;
    let flows = compute_jitter(&records);

    let Some(stat) = flows.get(&args.flow) else {
        anyhow::bail!(
            "Flow {} not found in {} ({} flows available)",
            args.flow,
            args.trace.display(),
            flows.len()
        );
    };

    let svg = generate_jitter_chart(stat, &args.chart_config)
        .with_context(|| format!("Failed to render chart for flow {}", args.flow))?;
    write_svg(&svg, &args.output_svg).context("Failed to write jitter chart")?;

    info!("✓ Chart for {} written to: {}", args.flow, args.output_svg.display());
    Ok(())
}
