//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur during trace parsing
///
/// Parsing is all-or-nothing: the first of these aborts the whole file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: invalid {field} (field {index}) value '{value}': {reason}")]
    InvalidField {
        line: usize,
        field: &'static str,
        index: usize,
        value: String,
        reason: String,
    },

    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during jitter chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("no jitter samples for flow {key}")]
    EmptySeries { key: String },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors raised by the analysis store
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("analysis {0} does not exist")]
    NotFound(String),

    #[error("could not allocate a free analysis id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}
