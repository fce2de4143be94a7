// ABOUTME: OpenAI chat completions client built on reqwest
// ABOUTME: Sends the transcript with sampling parameters and maps provider failures to upstream errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI` Provider
//!
//! Talks to `POST {base_url}/chat/completions`. Works against the hosted
//! `OpenAI` API and any endpoint speaking the same wire format, which is how
//! the integration tests drive it with a local stub.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatCompletion, ChatMessage, ChatRequest, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use crate::constants::{service_names, timeouts};
use crate::errors::{AppError, AppResult};

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Chat completions request body
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    index: u32,
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Connection settings for the `OpenAI` provider
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Base URL, e.g. <https://api.openai.com/v1>
    pub base_url: String,
    /// Bearer credential; no `Authorization` header is sent when `None`
    pub api_key: Option<String>,
    /// Model used when the request does not name one
    pub default_model: String,
    /// Upper bound on one completion call
    pub request_timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl From<&LlmConfig> for OpenAiConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// `OpenAI` chat completions provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts::LLM_CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            service_names::OPENAI,
            config.base_url,
            config.default_model
        );

        Ok(Self { client, config })
    }

    /// Create a provider from the server's LLM settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        Self::new(OpenAiConfig::from(config))
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }

    /// Map a transport failure (no HTTP status available)
    fn map_send_error(&self, e: &reqwest::Error) -> AppError {
        error!("Failed to send request to {}: {}", service_names::OPENAI, e);
        if e.is_connect() {
            AppError::external_unavailable(
                service_names::OPENAI,
                format!("Cannot connect to {}", self.config.base_url),
            )
        } else if e.is_timeout() {
            AppError::external_unavailable(
                service_names::OPENAI,
                format!(
                    "Request timed out after {}s",
                    self.config.request_timeout.as_secs()
                ),
            )
        } else {
            AppError::external_service(service_names::OPENAI, format!("Request failed: {e}"))
        }
    }

    /// Parse error response from API
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| {
                format!(
                    "API error ({status}): {}",
                    body.chars().take(200).collect::<String>()
                )
            },
            |parsed| match parsed.error.error_type {
                Some(error_type) => format!("{error_type} - {}", parsed.error.message),
                None => parsed.error.message,
            },
        );

        match status {
            StatusCode::UNAUTHORIZED => AppError::external_auth(
                service_names::OPENAI,
                format!("API authentication failed: {message}"),
            ),
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::external_rate_limited(service_names::OPENAI, message)
            }
            s if s.is_server_error() => AppError::external_unavailable(service_names::OPENAI, message),
            _ => AppError::external_service(service_names::OPENAI, message),
        }
    }

    /// Turn a successful response body into ordered, trimmed candidates
    fn parse_completion(body: &str, requested_model: &str) -> AppResult<ChatCompletion> {
        let response: OpenAiResponse = serde_json::from_str(body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            AppError::external_service(
                service_names::OPENAI,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let mut choices = response.choices;
        if choices.is_empty() {
            return Err(AppError::external_service(
                service_names::OPENAI,
                "API returned no choices",
            ));
        }
        choices.sort_by_key(|choice| choice.index);

        debug!(
            choices = choices.len(),
            finish_reason = ?choices.first().and_then(|c| c.finish_reason.as_deref()),
            "Received completion"
        );

        Ok(ChatCompletion {
            choices: choices
                .into_iter()
                .map(|choice| {
                    choice
                        .message
                        .content
                        .map(|content| content.trim().to_owned())
                        .unwrap_or_default()
                })
                .collect(),
            model: response
                .model
                .unwrap_or_else(|| requested_model.to_owned()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(
        model = %request.model.as_deref().unwrap_or(&self.config.default_model),
        messages = request.messages.len(),
        candidates = request.candidates.unwrap_or(1),
    ))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatCompletion> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let openai_request = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            max_tokens: request.max_tokens,
            n: request.candidates,
            temperature: request.temperature,
        };

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(
                service_names::OPENAI,
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            warn!(status = %status, "Completion request rejected");
            return Err(Self::parse_error_response(status, &body));
        }

        Self::parse_completion(&body, model)
    }

    async fn health_check(&self) -> AppResult<bool> {
        debug!(
            "Performing {} health check at {}",
            service_names::OPENAI,
            self.config.base_url
        );

        let http_request = self.client.get(self.api_url("models"));
        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(
                "{} health check returned status {}",
                service_names::OPENAI,
                response.status()
            );
        }
        Ok(healthy)
    }
}
