//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod chart;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, load_trace, validate_args, validate_chart_size};
pub use chart::execute_chart;
pub use models::{AnalyzeArgs, ChartArgs};
pub use utils::{display_schema, display_version, validate_report_file};
