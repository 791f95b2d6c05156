//! OpenAI-compatible completions client
//!
//! Speaks the `/completions` protocol any OpenAI-compatible endpoint
//! exposes. One request per call, no retries; HTTP statuses map onto the
//! provider error taxonomy so the caller can tell an auth failure from a
//! throttle from a transport fault.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ProviderError;
use crate::models::{CompletionRequest, CompletionResponse};
use crate::provider::CompletionProvider;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for an OpenAI-compatible completion endpoint.
pub struct OpenAiCompatClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenAiCompatClient {
    /// Create a client with the default request timeout.
    pub fn new(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::Config(
                "completion service API key is not set".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatClient {
    fn id(&self) -> &str {
        "openai-compat"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        request.params.validate()?;

        let wire = WireCompletionRequest {
            model: &request.params.model,
            prompt: &request.prompt,
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            frequency_penalty: request.params.frequency_penalty,
            stop: request.params.stop.as_deref(),
            n: request.n,
        };

        debug!(model = %request.params.model, "dispatching completion request");

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let body = response.text().await.unwrap_or_default();
            error!(%status, "completion service returned an error");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth,
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(retry_after),
                _ => ProviderError::Api {
                    status: status.as_u16(),
                    message: truncate(&body, 200),
                },
            });
        }

        let wire: WireCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        if wire.choices.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "response contained no choices".to_string(),
            ));
        }
        Ok(CompletionResponse {
            choices: wire.choices.into_iter().map(|c| c.text).collect(),
        })
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        s.chars().take(max).collect()
    } else {
        s.to_string()
    }
}

#[derive(Debug, Serialize)]
struct WireCompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    frequency_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct WireCompletionResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    text: String,
}
