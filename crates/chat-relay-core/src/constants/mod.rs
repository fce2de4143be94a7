// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Defaults, environment variable names, timeouts, and endpoint paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain rather than kept in one flat list.

/// Default values used when neither the request nor the environment supplies one
pub mod defaults {
    /// Instruction stored as the first turn of every conversation
    pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
    /// Default completion length limit
    pub const MAX_TOKENS: u32 = 100;
    /// Default number of candidate replies
    pub const CANDIDATES: u32 = 1;
    /// Default sampling temperature
    pub const TEMPERATURE: f64 = 0.5;
    /// Default completion model
    pub const MODEL: &str = "gpt-3.5-turbo";
    /// Default `OpenAI` API base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default store location (file created next to the working directory)
    pub const DATABASE_URL: &str = "sqlite:./chat_history.db";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Default bind address
    pub const HOST: &str = "127.0.0.1";
    /// Default CORS policy (any origin)
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
}

/// Environment variable names read by `ServerConfig::from_env`
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Store location
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Completion provider credential
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Completion provider base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Completion model
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    /// Upstream request timeout in seconds
    pub const LLM_REQUEST_TIMEOUT_SECS: &str = "LLM_REQUEST_TIMEOUT_SECS";
    /// Comma-separated CORS origins, or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Network timeouts for the completion provider
pub mod timeouts {
    /// TCP connect timeout
    pub const LLM_CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Whole-request timeout unless overridden
    pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 300;
}

/// HTTP endpoint paths
pub mod endpoints {
    /// Chat turn endpoint
    pub const CHAT: &str = "/chat/";
    /// History endpoint (axum path syntax)
    pub const HISTORY: &str = "/history/:user_id";
    /// Health check endpoint
    pub const HEALTH: &str = "/health";
}

/// Service names used in logs and error messages
pub mod service_names {
    /// This server
    pub const CHAT_RELAY_SERVER: &str = "chat-relay-server";
    /// Upstream completion provider
    pub const OPENAI: &str = "OpenAI";
}
