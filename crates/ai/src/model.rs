//! Hosted-model client boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid flow input: {0}")]
    InvalidInput(String),

    #[error("model call failed: {0}")]
    Transport(String),

    #[error("model returned status {0}")]
    BadStatus(u16),

    #[error("model response did not match the expected schema: {0}")]
    MalformedResponse(String),
}

/// One completion round trip. Implementations must not retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
}

/// Client for a hosted completion endpoint.
///
/// Speaks a minimal JSON contract: POST `{"prompt": ...}`, receive
/// `{"text": ...}`. Authentication is a bearer API key.
pub struct HostedModelClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HostedModelClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ModelClient for HostedModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest { prompt })
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "model endpoint returned error");
            return Err(AiError::BadStatus(status.as_u16()));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;
        Ok(body.text)
    }
}
