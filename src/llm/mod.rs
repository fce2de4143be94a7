// ABOUTME: LLM provider abstraction layer for the completion call
// ABOUTME: Defines message, request, and completion types plus the LlmProvider contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! The completion provider is a stateless remote call: it takes an ordered
//! transcript plus sampling parameters and returns one or more candidate
//! replies. The chat orchestrator depends only on the [`LlmProvider`] trait, so
//! the `OpenAI` client can be swapped for a scripted provider in tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chat_relay_server::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You are a helpful assistant."),
//!         ChatMessage::user("What's a good name for a cat?"),
//!     ])
//!     .with_max_tokens(100)
//!     .with_candidates(3);
//!     let completion = provider.complete(&request).await;
//! }
//! ```

mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AppError, AppResult};

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls and storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a stored role name
    ///
    /// # Errors
    ///
    /// Returns a storage error for anything other than `system`, `user` or
    /// `assistant`; such a value can only come from a corrupted row.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(AppError::storage(format!(
                "Unknown message role '{other}' in chat history"
            ))),
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider default when `None`)
    pub model: Option<String>,
    /// Temperature for response randomness
    pub temperature: Option<f64>,
    /// Maximum tokens to generate per candidate
    pub max_tokens: Option<u32>,
    /// Number of candidate replies to generate
    pub candidates: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            candidates: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the number of candidate replies
    #[must_use]
    pub const fn with_candidates(mut self, candidates: u32) -> Self {
        self.candidates = Some(candidates);
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Candidate replies in provider order, each trimmed of surrounding whitespace
    pub choices: Vec<String>,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
}

impl ChatCompletion {
    /// The first candidate, which is the one stored in history
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.choices.first().map(String::as_str)
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "openai")
    fn name(&self) -> &'static str;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    ///
    /// Returns exactly the candidates the provider produced; an empty
    /// candidate list is reported as an upstream error.
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatCompletion>;

    /// Check if the provider is reachable and the API key is accepted
    async fn health_check(&self) -> AppResult<bool>;
}
