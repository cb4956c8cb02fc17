//! In-memory candidate store
//!
//! Fixed set of records held in a `Vec`. Used for fixtures and for embedding
//! the search core without a database.

use super::models::{CandidateRecord, CandidateStore};
use super::{Result, StorageError};

/// Immutable in-memory candidate store
#[derive(Debug, Clone)]
pub struct InMemoryCandidateStore {
    dimensions: usize,
    records: Vec<CandidateRecord>,
}

impl InMemoryCandidateStore {
    /// Build a store, rejecting records whose vectors are not `dimensions` long
    pub fn new(dimensions: usize, records: Vec<CandidateRecord>) -> Result<Self> {
        if dimensions == 0 {
            return Err(StorageError::Init(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }
        if let Some(bad) = records
            .iter()
            .find(|r| r.request_vector.dimensions() != dimensions)
        {
            return Err(StorageError::InvalidDimensions {
                id: bad.id.clone(),
                expected: dimensions,
                actual: bad.request_vector.dimensions(),
            });
        }
        Ok(Self { dimensions, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CandidateStore for InMemoryCandidateStore {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn load_candidates(&self) -> Result<Vec<CandidateRecord>> {
        Ok(self.records.clone())
    }
}
