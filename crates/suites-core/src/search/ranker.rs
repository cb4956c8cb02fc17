//! Similarity ranking over candidate records
//!
//! Scoring is embarrassingly parallel and runs on the rayon pool; ordering is
//! imposed once, in the final sort: score descending, then id ascending.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::embeddings::Embedding;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::CandidateRecord;

/// A ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub hotel_id: Option<i64>,
    pub hotel: Option<String>,
    pub details: String,
    pub source: Option<String>,
    /// Cosine similarity to the query, in [-1, 1]
    pub similarity_score: f32,
    /// 1-based position in the result list
    pub rank: usize,
}

impl SearchResult {
    fn from_candidate(record: CandidateRecord, similarity_score: f32, rank: usize) -> Self {
        Self {
            id: record.id,
            hotel_id: record.hotel_id,
            hotel: record.hotel,
            details: record.details,
            source: record.source,
            similarity_score,
            rank,
        }
    }
}

/// Score, filter, sort and truncate candidates against a query vector
///
/// `max_results == 0` means no truncation. Every candidate must share the
/// query's dimensionality; one that does not fails the whole ranking.
pub fn rank_candidates(
    query: &Embedding,
    candidates: Vec<CandidateRecord>,
    max_results: usize,
    minimum_similarity_score: f64,
) -> ServiceResult<Vec<SearchResult>> {
    if let Some(bad) = candidates
        .iter()
        .find(|c| c.request_vector.dimensions() != query.dimensions())
    {
        warn!(
            record_id = %bad.id,
            stored = bad.request_vector.dimensions(),
            query = query.dimensions(),
            "Stored vector dimensionality differs from query"
        );
        return Err(ServiceError::DimensionMismatch {
            expected: bad.request_vector.dimensions(),
            actual: query.dimensions(),
        });
    }

    let mut scored: Vec<(f32, CandidateRecord)> = candidates
        .into_par_iter()
        .map(|c| (query.cosine_similarity(&c.request_vector), c))
        .filter(|(score, _)| f64::from(*score) >= minimum_similarity_score)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

    if max_results > 0 {
        scored.truncate(max_results);
    }

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(i, (score, record))| SearchResult::from_candidate(record, score, i + 1))
        .collect())
}
