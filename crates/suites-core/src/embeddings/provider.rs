//! Embedding provider contract

use async_trait::async_trait;

use super::Embedding;

/// Embedding provider error types
#[non_exhaustive]
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Transport, auth or server-side failure
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    /// The provider declined the input (length, content policy, ...)
    #[error("Input rejected by provider: {0}")]
    InputRejected(String),
}

/// Converts text to a fixed-dimensionality vector.
///
/// Implementations must be safe to share across requests and must not retry
/// on their own; the caller decides what a failure means.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError>;

    /// Name of the model or deployment, for logs
    fn model_name(&self) -> &str;
}
