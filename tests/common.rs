// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory stores, and a scripted completion provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `chat_relay_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chat_relay_server::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    errors::{AppError, AppResult},
    llm::{ChatCompletion, ChatRequest, LlmProvider, MessageRole},
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok(_) | Err(_) => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseUrl::Memory).await?)
}

/// Server resources over an in-memory store and the given provider
pub async fn create_test_resources(provider: Arc<MockLlmProvider>) -> Result<Arc<ServerResources>> {
    create_test_resources_with_config(provider, ServerConfig::default()).await
}

/// Server resources with a caller-supplied configuration; the store is always in-memory
pub async fn create_test_resources_with_config(
    provider: Arc<MockLlmProvider>,
    config: ServerConfig,
) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let config = ServerConfig {
        database: chat_relay_server::config::DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        ..config
    };
    Ok(Arc::new(ServerResources::new(
        database,
        provider,
        Arc::new(config),
    )))
}

// ============================================================================
// Scripted completion provider
// ============================================================================

/// What the mock returns from `complete`
#[derive(Debug, Clone)]
enum MockBehavior {
    /// The same candidate list on every call
    Fixed(Vec<String>),
    /// As many candidates as requested: "{prefix} 1", "{prefix} 2", ...
    PerCandidate(String),
    /// "echo: <last user message>"
    Echo,
    /// An upstream failure with this message
    Fail(String),
}

/// Completion provider returning scripted answers and recording every request
pub struct MockLlmProvider {
    behavior: MockBehavior,
    delay: Option<Duration>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmProvider {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with one fixed reply
    pub fn replying(reply: &str) -> Self {
        Self::with_behavior(MockBehavior::Fixed(vec![reply.to_owned()]))
    }

    /// Always answer with this exact candidate list
    pub fn replying_all(replies: &[&str]) -> Self {
        Self::with_behavior(MockBehavior::Fixed(
            replies.iter().map(|r| (*r).to_owned()).collect(),
        ))
    }

    /// Answer with one numbered candidate per requested candidate
    pub fn numbered(prefix: &str) -> Self {
        Self::with_behavior(MockBehavior::PerCandidate(prefix.to_owned()))
    }

    /// Echo the latest user message
    pub fn echo() -> Self {
        Self::with_behavior(MockBehavior::Echo)
    }

    /// Fail every call with an upstream error
    pub fn failing(message: &str) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.to_owned()))
    }

    /// Sleep before answering, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of `complete` calls so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatCompletion> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let choices = match &self.behavior {
            MockBehavior::Fixed(replies) => replies.clone(),
            MockBehavior::PerCandidate(prefix) => (1..=request.candidates.unwrap_or(1))
                .map(|i| format!("{prefix} {i}"))
                .collect(),
            MockBehavior::Echo => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                vec![format!("echo: {last_user}")]
            }
            MockBehavior::Fail(message) => {
                return Err(AppError::external_unavailable("mock", message.clone()));
            }
        };

        Ok(ChatCompletion {
            choices,
            model: "mock-model".to_owned(),
            usage: None,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!matches!(self.behavior, MockBehavior::Fail(_)))
    }
}
