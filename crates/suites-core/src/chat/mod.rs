//! Maintenance Copilot
//!
//! Single-turn pass-through to a chat-completion deployment. The copilot adds
//! a fixed system prompt and returns the reply text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embeddings::{AzureOpenAiClient, ChatCompletionResponse, ProviderError};
use crate::error::{ServiceError, ServiceResult};

/// System prompt sent ahead of every copilot message
pub const COPILOT_SYSTEM_PROMPT: &str = "You are a friendly assistant who works for Contoso Suites. \
You help hotel staff understand and triage maintenance requests. \
Keep answers short and practical, and say so when you do not know.";

/// One chat message in OpenAI wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion backend
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete a conversation and return the assistant's reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}

#[async_trait]
impl ChatProvider for AzureOpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let url = self.deployment_url(&self.config().deployment_name, "chat/completions");
        debug!(deployment = %self.config().deployment_name, messages = messages.len(), "Requesting chat completion");

        let response: ChatCompletionResponse = self
            .post_json(&url, &serde_json::json!({ "messages": messages }))
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Unavailable("Chat completion had no content".to_string()))
    }
}

/// Maintenance request assistant
pub struct MaintenanceCopilot {
    provider: Arc<dyn ChatProvider>,
    timeout: Duration,
}

impl MaintenanceCopilot {
    pub fn new(provider: Arc<dyn ChatProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Answer one staff message
    ///
    /// A message the provider declines is `InputRejected`; any other provider
    /// failure, or the timeout elapsing, is `ProviderUnavailable`.
    pub async fn chat(&self, message: &str) -> ServiceResult<String> {
        if message.trim().is_empty() {
            return Err(ServiceError::InputRejected(
                "Message cannot be empty".to_string(),
            ));
        }

        let messages = [
            ChatMessage::system(COPILOT_SYSTEM_PROMPT),
            ChatMessage::user(message),
        ];

        let reply = tokio::time::timeout(self.timeout, self.provider.complete(&messages))
            .await
            .map_err(|_| {
                warn!("Chat provider timed out");
                ServiceError::ProviderUnavailable(format!(
                    "Chat provider did not respond within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        Ok(reply)
    }
}
