//! In-memory store of finished analyses, keyed by generated identifiers.
//!
//! The store owns no global state. Identifier generation is injected so
//! callers can choose random ids (default) or a deterministic sequence.

use super::run::Analysis;
use crate::utils::config::{ANALYSIS_ID_MAX, ANALYSIS_ID_MIN, MAX_ID_ATTEMPTS};
use crate::utils::error::StoreError;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a stored analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(String);

impl AnalysisId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AnalysisId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AnalysisId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of candidate identifiers
///
/// Candidates may repeat; the store retries until it finds a free one.
pub trait IdGenerator {
    fn next_id(&mut self) -> AnalysisId;
}

/// Six-digit random identifiers
#[derive(Debug)]
pub struct RandomIdGenerator {
    rng: StdRng,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator, mainly for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> AnalysisId {
        let n = self.rng.gen_range(ANALYSIS_ID_MIN..=ANALYSIS_ID_MAX);
        AnalysisId(n.to_string())
    }
}

/// Counts upward from 100000
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u32,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self {
            next: ANALYSIS_ID_MIN,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> AnalysisId {
        let id = AnalysisId(self.next.to_string());
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Holds analyses for the lifetime of the process
pub struct AnalysisStore<G: IdGenerator = RandomIdGenerator> {
    analyses: HashMap<AnalysisId, Arc<Analysis>>,
    ids: G,
}

impl AnalysisStore<RandomIdGenerator> {
    pub fn new() -> Self {
        Self::with_generator(RandomIdGenerator::new())
    }
}

impl Default for AnalysisStore<RandomIdGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> AnalysisStore<G> {
    pub fn with_generator(ids: G) -> Self {
        Self {
            analyses: HashMap::new(),
            ids,
        }
    }

    /// Store an analysis under a fresh identifier
    ///
    /// # Errors
    /// * `StoreError::IdExhausted` - the generator kept returning ids already in use
    pub fn create(&mut self, analysis: Analysis) -> Result<AnalysisId, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if self.analyses.contains_key(&id) {
                debug!("Analysis id {} already taken, drawing another", id);
                continue;
            }
            self.analyses.insert(id.clone(), Arc::new(analysis));
            debug!("Stored analysis {}", id);
            return Ok(id);
        }
        Err(StoreError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    pub fn get(&self, id: &AnalysisId) -> Option<Arc<Analysis>> {
        self.analyses.get(id).cloned()
    }

    /// Like [`get`](Self::get) but with an error naming the missing id
    pub fn require(&self, id: &AnalysisId) -> Result<Arc<Analysis>, StoreError> {
        self.get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    /// Always returns the same id
    struct FixedIdGenerator;

    impl IdGenerator for FixedIdGenerator {
        fn next_id(&mut self) -> AnalysisId {
            AnalysisId::from("424242")
        }
    }

    #[test]
    fn test_create_and_get() {
        let mut store = AnalysisStore::with_generator(SequentialIdGenerator::new());
        let id = store.create(analyze(Vec::new())).unwrap();

        assert_eq!(id.as_str(), "100000");
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());
        assert!(store.get(&AnalysisId::from("100001")).is_none());
    }

    #[test]
    fn test_require_missing() {
        let store = AnalysisStore::with_generator(SequentialIdGenerator::new());
        let err = store.require(&AnalysisId::from("123456")).unwrap_err();
        assert_eq!(err, StoreError::NotFound("123456".to_string()));
    }

    #[test]
    fn test_collision_exhausts_attempts() {
        let mut store = AnalysisStore::with_generator(FixedIdGenerator);
        store.create(analyze(Vec::new())).unwrap();

        let err = store.create(analyze(Vec::new())).unwrap_err();
        assert_eq!(
            err,
            StoreError::IdExhausted {
                attempts: MAX_ID_ATTEMPTS
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_random_ids_are_six_digits() {
        let mut ids = RandomIdGenerator::with_seed(7);
        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.as_str().len(), 6);
            let n: u32 = id.as_str().parse().unwrap();
            assert!((ANALYSIS_ID_MIN..=ANALYSIS_ID_MAX).contains(&n));
        }
    }

    #[test]
    fn test_random_store_ids_unique() {
        let mut store = AnalysisStore::with_generator(RandomIdGenerator::with_seed(1));
        let a = store.create(analyze(Vec::new())).unwrap();
        let b = store.create(analyze(Vec::new())).unwrap();
        assert_ne!(a, b);
    }
}
