//! Analysis runs and the in-memory result store.
//!
//! An analysis bundles the parsed records with the output of both
//! aggregation passes. The store hands out identifiers for finished runs.

pub mod run;
pub mod store;

pub use run::{analyze, Analysis};
pub use store::{AnalysisId, AnalysisStore, IdGenerator, RandomIdGenerator, SequentialIdGenerator};
