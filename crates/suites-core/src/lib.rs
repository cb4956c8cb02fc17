//! # Suites Core
//!
//! Semantic search engine behind the Contoso Suites API.
//!
//! - **Embeddings**: text to vector through an injected [`EmbeddingProvider`]
//!   (Azure OpenAI by default)
//! - **Ranking**: parallel cosine similarity over stored maintenance requests,
//!   deterministic ordering
//! - **Storage**: SQLite for hotels, bookings and maintenance request vectors
//! - **Copilot**: single-turn chat pass-through for maintenance questions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use suites_core::{Storage, VectorizationService, AzureOpenAiClient};
//!
//! let storage = Arc::new(Storage::new(None, 1536)?);
//! let client = Arc::new(AzureOpenAiClient::new(config)?);
//! let service = VectorizationService::new(client, storage);
//!
//! let query = service.get_embeddings("leaky faucet in the bathroom").await?;
//! let results = service.execute_vector_search(&query, 5, 0.8)?;
//! ```

pub mod chat;
pub mod embeddings;
pub mod error;
pub mod search;
pub mod storage;
pub mod vectorization;

pub use chat::{ChatMessage, ChatProvider, MaintenanceCopilot, COPILOT_SYSTEM_PROMPT};
pub use embeddings::{
    cosine_similarity, AzureOpenAiClient, AzureOpenAiConfig, Embedding,
    EmbeddingProvider, ProviderError,
};
pub use error::{ServiceError, ServiceResult};
pub use search::{
    rank_candidates, validate_max_results, validate_threshold, SearchResult, DEFAULT_MAX_RESULTS,
    DEFAULT_MINIMUM_SIMILARITY_SCORE,
};
pub use storage::{
    Booking, CandidateRecord, CandidateStore, Hotel, HotelDirectory, InMemoryCandidateStore,
    Storage, StorageError,
};
pub use vectorization::{VectorizationService, DEFAULT_PROVIDER_TIMEOUT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
