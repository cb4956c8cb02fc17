//! Azure OpenAI REST client
//!
//! Talks to the deployment-scoped REST endpoints:
//!
//! - `POST {endpoint}/openai/deployments/{embedding}/embeddings`
//! - `POST {endpoint}/openai/deployments/{chat}/chat/completions`
//!
//! Status 400/413/422 means the service declined the input; everything else
//! that is not a 2xx is reported as the provider being unavailable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Embedding, EmbeddingProvider, ProviderError};

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Connection settings for an Azure OpenAI resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// Key sent in the `api-key` header
    pub api_key: String,
    /// Chat-completion deployment
    pub deployment_name: String,
    /// Embedding deployment
    pub embedding_deployment_name: String,
    pub api_version: String,
    pub request_timeout_secs: u64,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment_name: "gpt-4o".to_string(),
            embedding_deployment_name: "text-embedding-ada-002".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub(crate) choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

// ============================================================================
// CLIENT
// ============================================================================

/// Shared Azure OpenAI client
///
/// Holds one pooled `reqwest::Client`.
pub struct AzureOpenAiClient {
    http: reqwest::Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiClient {
    /// Create a client from connection settings
    ///
    /// An empty endpoint is accepted; every call then fails as unavailable
    /// without touching the network.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Connection settings in use
    pub fn config(&self) -> &AzureOpenAiConfig {
        &self.config
    }

    /// True when an endpoint has been configured
    pub fn is_configured(&self) -> bool {
        !self.config.endpoint.trim().is_empty()
    }

    /// Build the URL for an operation on a deployment
    pub fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            deployment,
            operation,
            self.config.api_version
        )
    }

    /// POST a JSON body and decode a JSON response
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Unavailable(
                "Azure OpenAI endpoint is not configured".to_string(),
            ));
        }

        let response = self
            .http
            .post(url)
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Unavailable("Request to Azure OpenAI timed out".to_string())
                } else {
                    ProviderError::Unavailable(format!("Request to Azure OpenAI failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Azure OpenAI returned an error");
            return Err(map_error_status(status, &text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("Malformed Azure OpenAI response: {}", e)))
    }
}

#[async_trait]
impl EmbeddingProvider for AzureOpenAiClient {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        let url = self.deployment_url(&self.config.embedding_deployment_name, "embeddings");
        debug!(deployment = %self.config.embedding_deployment_name, chars = text.len(), "Requesting embedding");

        let response: EmbeddingResponse = self
            .post_json(&url, &serde_json::json!({ "input": text }))
            .await?;

        first_embedding(response)
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_deployment_name
    }
}

/// Pick the embedding for input 0 out of a response
fn first_embedding(response: EmbeddingResponse) -> Result<Embedding, ProviderError> {
    let data = response
        .data
        .into_iter()
        .min_by_key(|d| d.index)
        .ok_or_else(|| ProviderError::Unavailable("No embedding generated".to_string()))?;

    if data.embedding.is_empty() {
        return Err(ProviderError::Unavailable(
            "Provider returned an empty embedding".to_string(),
        ));
    }

    Ok(Embedding::new(data.embedding))
}

/// Translate a non-success status into a provider error
pub(crate) fn map_error_status(status: StatusCode, body: &str) -> ProviderError {
    let detail = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.code {
            Some(code) => format!("{} ({})", envelope.error.message, code),
            None => envelope.error.message,
        },
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body.chars().take(200).collect(),
    };

    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNPROCESSABLE_ENTITY => ProviderError::InputRejected(detail),
        _ => ProviderError::Unavailable(format!("HTTP {}: {}", status.as_u16(), detail)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
