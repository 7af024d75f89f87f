use crate::aggregator::FlowKey;
use crate::chart::ChartConfig;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// NS2 trace file to analyse
    pub trace: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Directory for per-flow SVG charts (optional)
    pub charts_dir: Option<PathBuf>,

    /// Chart rendering options
    pub chart_config: ChartConfig,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of flows listed in the text summary
    pub max_flows: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace: PathBuf::new(),
            output_json: PathBuf::from("analysis.json"),
            charts_dir: None,
            chart_config: ChartConfig::default(),
            print_summary: false,
            max_flows: 10,
        }
    }
}

/// Arguments for the chart command
#[derive(Debug, Clone)]
pub struct ChartArgs {
    /// NS2 trace file to analyse
    pub trace: PathBuf,

    /// Flow to render
    pub flow: FlowKey,

    /// Output path for the SVG chart
    pub output_svg: PathBuf,

    /// Chart rendering options
    pub chart_config: ChartConfig,
}
