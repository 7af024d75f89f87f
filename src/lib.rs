//! NS Trace Analyzer
//!
//! Traffic statistics and per-flow jitter for NS2 network simulator
//! trace files.
//!
//! This crate provides the core implementation for the `nstrace` CLI tool:
//! a line parser for the 12-column trace format, two aggregation passes
//! (aggregate stats and jitter series) that run side by side, an in-memory
//! result store, and JSON / SVG writers.
//!
//! ## Getting Started
//!
//! ```bash
//! nstrace analyze --trace out.tr --charts charts/ --summary
//! nstrace chart --trace out.tr --flow 0:3:cbr --zoom
//! ```

pub mod aggregator;
pub mod analysis;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
