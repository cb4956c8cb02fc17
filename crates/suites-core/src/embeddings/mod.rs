//! Semantic Embeddings Module
//!
//! Embeddings come from a remote provider behind [`EmbeddingProvider`];
//! nothing is computed locally except similarity.
//!
//! Supports:
//! - Text embedding generation via Azure OpenAI deployments
//! - Cosine similarity computation
//! - Byte encoding for SQLite storage

mod azure;
mod provider;
mod vector;

pub use azure::{
    AzureOpenAiClient, AzureOpenAiConfig, DEFAULT_API_VERSION, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub(crate) use azure::ChatCompletionResponse;
pub use provider::{EmbeddingProvider, ProviderError};
pub use vector::{cosine_similarity, Embedding};
