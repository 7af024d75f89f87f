//! NS Trace Analyzer CLI
//!
//! Computes throughput, loss, hop, delay and jitter figures from NS2
//! simulator traces and renders per-flow jitter charts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use ns_trace_analyzer::aggregator::FlowKey;
use ns_trace_analyzer::analysis::AnalysisStore;
use ns_trace_analyzer::chart::ChartConfig;
use ns_trace_analyzer::commands::{
    display_schema, display_version, execute_analyze, execute_chart, validate_args,
    validate_report_file, AnalyzeArgs, ChartArgs,
};
use ns_trace_analyzer::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use std::path::PathBuf;

/// NS Trace Analyzer - statistics and jitter for NS2 traces
#[derive(Parser, Debug)]
#[command(name = "nstrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a trace file and write a JSON report
    Analyze {
        /// NS2 trace file
        #[arg(short, long, env = "NSTRACE_TRACE")]
        trace: PathBuf,

        /// Output path for JSON report
        #[arg(short, long, default_value = "analysis.json")]
        output: PathBuf,

        /// Directory for per-flow SVG jitter charts (optional)
        #[arg(short, long)]
        charts: Option<PathBuf>,

        /// Fix chart y axis to [-0.5, 0.5]
        #[arg(long)]
        zoom: bool,

        /// Chart width in pixels
        #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
        width: usize,

        /// Chart height in pixels
        #[arg(long, default_value_t = DEFAULT_CHART_HEIGHT)]
        height: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of flows listed in the summary
        #[arg(long, default_value = "10")]
        max_flows: usize,
    },

    /// Render the jitter chart of one flow
    Chart {
        /// NS2 trace file
        #[arg(short, long, env = "NSTRACE_TRACE")]
        trace: PathBuf,

        /// Flow as <from>:<to>:<type>, e.g. 0:3:cbr
        #[arg(short, long)]
        flow: FlowKey,

        /// Output path for SVG chart
        #[arg(short, long, default_value = "jitter.svg")]
        output: PathBuf,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Fix y axis to [-0.5, 0.5]
        #[arg(long)]
        zoom: bool,

        /// Chart width in pixels
        #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
        width: usize,

        /// Chart height in pixels
        #[arg(long, default_value_t = DEFAULT_CHART_HEIGHT)]
        height: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            trace,
            output,
            charts,
            zoom,
            width,
            height,
            summary,
            max_flows,
        } => {
            let args = AnalyzeArgs {
                trace,
                output_json: output,
                charts_dir: charts,
                chart_config: ChartConfig::new()
                    .with_zoom(zoom)
                    .with_size(width, height),
                print_summary: summary,
                max_flows,
            };

            // Validate args first
            validate_args(&args)?;

            let mut store = AnalysisStore::new();
            let id = execute_analyze(args, &mut store)?;
            println!("Analysis id: {}", id);
        }

        Commands::Chart {
            trace,
            flow,
            output,
            title,
            zoom,
            width,
            height,
        } => {
            let mut chart_config = ChartConfig::new()
                .with_zoom(zoom)
                .with_size(width, height);
            if let Some(title_str) = title {
                chart_config = chart_config.with_title(title_str);
            }

            execute_chart(ChartArgs {
                trace,
                flow,
                output_svg: output,
                chart_config,
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
