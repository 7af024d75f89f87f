//! Rendering of analysis results.
//!
//! Jitter series become SVG line charts; the aggregate stats become a
//! terminal summary.

pub mod generator;
pub mod summary;

// Re-export main types
pub use generator::{generate_jitter_chart, ChartConfig};
pub use summary::generate_text_summary;
