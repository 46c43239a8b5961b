// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Groq chat completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use concierge_config::model::GroqConfig;
use concierge_core::{
    Adapter, ConciergeError, HealthStatus, ProviderAdapter, ProviderRequest, ProviderResponse,
    ToolCallRequest,
};

use crate::types::{ChatRequest, ChatResponse, WireMessage};

const RETRY_DELAY: Duration = Duration::from_millis(500);

pub struct GroqClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self, ConciergeError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| {
                ConciergeError::Config(
                    "groq.api_key is not set (use CONCIERGE_GROQ_API_KEY)".to_string(),
                )
            })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ConciergeError::Provider {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Point the client at a different endpoint. Used in tests against a
    /// mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post_once(&self, request: &ChatRequest) -> Result<reqwest::Response, ConciergeError> {
        self.http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ConciergeError::Provider {
                message: "request to provider failed".to_string(),
                source: Some(Box::new(e)),
            })
    }

    /// POST with a single retry on transient statuses (429, 500, 503).
    async fn post_with_retry(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::Response, ConciergeError> {
        let response = self.post_once(request).await?;
        if !is_transient(response.status()) {
            return Ok(response);
        }
        warn!(status = %response.status(), "transient provider error, retrying once");
        tokio::time::sleep(RETRY_DELAY).await;
        self.post_once(request).await
    }
}

fn is_transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}

#[async_trait]
impl Adapter for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        if self.api_key.is_empty() {
            return Ok(HealthStatus::Unhealthy("api key is empty".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for GroqClient {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, ConciergeError> {
        let wire = ChatRequest {
            model: if request.model.is_empty() {
                self.model.clone()
            } else {
                request.model
            },
            messages: request.messages.iter().map(WireMessage::from).collect(),
            max_tokens: if request.max_tokens == 0 {
                self.max_tokens
            } else {
                request.max_tokens
            },
            tools: request.tools,
        };

        let response = self.post_with_retry(&wire).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConciergeError::Provider {
                message: format!("provider returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ConciergeError::Provider {
                message: "failed to decode provider response".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ConciergeError::Provider {
                message: "provider response contained no choices".to_string(),
                source: None,
            })?;

        let mut tool_calls = Vec::new();
        for call in choice.message.tool_calls.unwrap_or_default() {
            let arguments =
                serde_json::from_str(&call.function.arguments).map_err(|e| {
                    ConciergeError::Provider {
                        message: format!(
                            "tool call {} carried unparseable arguments",
                            call.function.name
                        ),
                        source: Some(Box::new(e)),
                    }
                })?;
            tool_calls.push(ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments,
            });
        }

        debug!(
            text = choice.message.content.is_some(),
            tool_calls = tool_calls.len(),
            "provider response"
        );
        Ok(ProviderResponse {
            text: choice.message.content,
            tool_calls,
        })
    }
}
