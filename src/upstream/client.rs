//! Completion API client.
//!
//! One logical call may span several HTTP attempts: transport errors, timeouts
//! and 5xx statuses are retried up to `max_retries` times with exponential
//! backoff. 429 and 402 are surfaced immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::UpstreamConfig;
use crate::upstream::types::{ChatCompletionRequest, ChatCompletionResponse};

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0} is not configured")]
    MissingCredential(String),

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("Payment required. Please add credits to continue.")]
    PaymentRequired,

    /// Body is kept for logging only; it is not part of the message.
    #[error("Completion API returned {status}")]
    Status { status: u16, body: String },

    #[error("Completion API timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to reach the completion API")]
    Transport(#[source] reqwest::Error),

    #[error("Completion API returned a malformed response")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl UpstreamError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Timeout(_) | UpstreamError::Transport(_) => true,
            UpstreamError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// A chat completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError>;
}

/// `reqwest`-backed client for an OpenAI-compatible endpoint.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    url: String,
    config: UpstreamConfig,
}

impl HttpCompletionClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(UpstreamError::ClientBuild)?;

        Ok(Self {
            http,
            url: config.completions_url(),
            config: config.clone(),
        })
    }

    async fn attempt(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Completion API error");
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited,
                StatusCode::PAYMENT_REQUIRED => UpstreamError::PaymentRequired,
                _ => UpstreamError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Completion API response is not valid JSON");
            UpstreamError::MalformedResponse(e)
        })
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.config.timeout_secs)
        } else {
            UpstreamError::Transport(err)
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| UpstreamError::MissingCredential(self.config.api_key_env.clone()))?;

        let mut attempt = 0;
        loop {
            debug!(attempt, url = self.url, model = request.model, "Calling completion API");
            match self.attempt(api_key, request).await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = self.config.backoff(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "Retrying completion API call"
                    );
                    tokio::time::sleep(backoff).await;
                }
                result => return result,
            }
        }
    }
}
