//! Trace parsing and record definitions.
//!
//! This module handles:
//! - Splitting raw NS2 trace lines into columns
//! - Decoding columns into typed records
//! - Reporting the first malformed numeric column

pub mod ns2_trace;
pub mod schema;

// Re-export main types
pub use ns2_trace::{parse_address, parse_line, parse_trace, parse_trace_reader};
pub use schema::{Address, TraceEvent, TraceRecord};
