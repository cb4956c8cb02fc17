//! Service error taxonomy
//!
//! Every failure the search path can produce. The HTTP layer maps each
//! variant to one status code; nothing here is retried.

use crate::embeddings::ProviderError;
use crate::storage::StorageError;

/// Errors surfaced by the vectorization service and the copilot
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Caller-supplied text or vector is invalid
    #[error("Input rejected: {0}")]
    InputRejected(String),
    /// Query vector dimensionality disagrees with stored vectors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Embedding or chat provider transport/auth failure, including timeouts
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Out-of-range request parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Backing store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Stable kind name, used in client-visible error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InputRejected(_) => "InputRejected",
            ServiceError::DimensionMismatch { .. } => "DimensionMismatch",
            ServiceError::ProviderUnavailable(_) => "ProviderUnavailable",
            ServiceError::InvalidArgument(_) => "InvalidArgument",
            ServiceError::Storage(_) => "StorageError",
        }
    }

    /// True when the caller can fix the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InputRejected(_)
                | ServiceError::DimensionMismatch { .. }
                | ServiceError::InvalidArgument(_)
        )
    }
}

impl From<ProviderError> for ServiceError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::InputRejected(msg) => ServiceError::InputRejected(msg),
            ProviderError::Unavailable(msg) => ServiceError::ProviderUnavailable(msg),
        }
    }
}

/// Service result type
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
