//! Vectorization Service
//!
//! Orchestrates embedding generation and similarity search. The provider
//! call is the only suspension point; it is bounded by a timeout and never
//! retried. Dropping the returned future cancels the in-flight call.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::embeddings::{Embedding, EmbeddingProvider};
use crate::error::{ServiceError, ServiceResult};
use crate::search::{self, SearchResult};
use crate::storage::CandidateStore;

/// Default bound on a single provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Embedding + vector search over the candidate store
pub struct VectorizationService {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn CandidateStore>,
    timeout: Duration,
}

impl VectorizationService {
    /// Create a service with the default provider timeout
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: Arc<dyn CandidateStore>) -> Self {
        Self {
            provider,
            store,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Override the provider timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dimensionality of the candidate store
    pub fn dimensions(&self) -> usize {
        self.store.dimensions()
    }

    pub fn provider_timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate an embedding for `text`
    pub async fn get_embeddings(&self, text: &str) -> ServiceResult<Embedding> {
        if text.trim().is_empty() {
            return Err(ServiceError::InputRejected(
                "Text cannot be empty".to_string(),
            ));
        }

        debug!(model = self.provider.model_name(), chars = text.len(), "Embedding text");

        let embedding = tokio::time::timeout(self.timeout, self.provider.embed(text))
            .await
            .map_err(|_| {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Embedding provider timed out");
                ServiceError::ProviderUnavailable(format!(
                    "Embedding provider did not respond within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        if embedding.is_empty() {
            return Err(ServiceError::ProviderUnavailable(
                "Embedding provider returned an empty vector".to_string(),
            ));
        }

        Ok(embedding)
    }

    /// Rank stored candidates against `query`
    ///
    /// `max_results == 0` returns every candidate at or above the threshold.
    pub fn execute_vector_search(
        &self,
        query: &Embedding,
        max_results: usize,
        minimum_similarity_score: f64,
    ) -> ServiceResult<Vec<SearchResult>> {
        if query.is_empty() {
            return Err(ServiceError::InputRejected(
                "Query vector cannot be empty".to_string(),
            ));
        }
        if !query.is_finite() {
            return Err(ServiceError::InputRejected(
                "Query vector contains non-finite values".to_string(),
            ));
        }
        search::validate_threshold(minimum_similarity_score)?;

        let expected = self.store.dimensions();
        if query.dimensions() != expected {
            return Err(ServiceError::DimensionMismatch {
                expected,
                actual: query.dimensions(),
            });
        }

        let candidates = self.store.load_candidates()?;
        let candidate_count = candidates.len();
        let results = search::rank_candidates(
            query,
            candidates,
            max_results,
            minimum_similarity_score,
        )?;

        info!(
            candidates = candidate_count,
            returned = results.len(),
            max_results,
            minimum_similarity_score,
            "Vector search complete"
        );

        Ok(results)
    }

    /// Embed `text`, then search with the resulting vector
    pub async fn search_text(
        &self,
        text: &str,
        max_results: usize,
        minimum_similarity_score: f64,
    ) -> ServiceResult<Vec<SearchResult>> {
        search::validate_threshold(minimum_similarity_score)?;
        let query = self.get_embeddings(text).await?;
        self.execute_vector_search(&query, max_results, minimum_similarity_score)
    }
}

// ============================================================================
// TESTS
// ============================================================================
