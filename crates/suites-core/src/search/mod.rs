//! Search Module
//!
//! Cosine-similarity ranking of maintenance requests and the parameter
//! rules shared by every search entry point.

mod ranker;

pub use ranker::{rank_candidates, SearchResult};

use crate::error::{ServiceError, ServiceResult};

/// Default result cap; 0 means "return every qualifying result"
pub const DEFAULT_MAX_RESULTS: i64 = 0;

/// Default minimum cosine similarity
pub const DEFAULT_MINIMUM_SIMILARITY_SCORE: f64 = 0.8;

/// Reject thresholds outside [-1, 1] (NaN included)
pub fn validate_threshold(minimum_similarity_score: f64) -> ServiceResult<()> {
    if !(-1.0..=1.0).contains(&minimum_similarity_score) {
        return Err(ServiceError::InvalidArgument(format!(
            "minimum_similarity_score must be between -1 and 1, got {}",
            minimum_similarity_score
        )));
    }
    Ok(())
}

/// Convert a caller-supplied result cap, rejecting negatives
pub fn validate_max_results(max_results: i64) -> ServiceResult<usize> {
    usize::try_from(max_results).map_err(|_| {
        ServiceError::InvalidArgument(format!(
            "max_results must be zero or positive, got {}",
            max_results
        ))
    })
}
