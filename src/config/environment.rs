// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, store location, provider credentials, and CORS policy from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use crate::constants::{defaults, env_vars, timeouts};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Load `.env` from the working directory or its parents, if present
///
/// Variables already set in the process environment are left untouched, so
/// calling this more than once is harmless.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {e}"),
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// Accepts `sqlite:<path>`, `sqlite::memory:`, or a bare file path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for URLs of other database engines or an
    /// empty path.
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if let Some(path_str) = trimmed.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                return Ok(Self::Memory);
            }
            if path_str.is_empty() {
                return Err(AppError::config("SQLite database URL has an empty path"));
            }
            return Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            });
        }
        if trimmed.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL '{trimmed}': only SQLite is supported"
            )));
        }
        if trimmed.is_empty() {
            return Err(AppError::config("Database URL is empty"));
        }
        Ok(Self::SQLite {
            path: PathBuf::from(trimmed),
        })
    }

    /// Render as a `sqlx` connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Whether the store lives only in memory
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./chat_history.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Store location
    pub url: DatabaseUrl,
}

/// Completion provider configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// API credential; `None` lets the provider reject calls with an auth error
    pub api_key: Option<String>,
    /// Base URL of the `OpenAI`-compatible API
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Upper bound on one completion call
    pub request_timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::OPENAI_BASE_URL.to_owned(),
            model: defaults::MODEL.to_owned(),
            request_timeout_secs: timeouts::LLM_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Cross-origin policy
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` or a comma-separated list of origins
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: defaults::CORS_ALLOWED_ORIGINS.to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Store configuration
    pub database: DatabaseConfig,
    /// Completion provider configuration
    pub llm: LlmConfig,
    /// Cross-origin policy
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            database: DatabaseConfig {
                url: DatabaseUrl::default(),
            },
            llm: LlmConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// variables already set in the process environment win.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a numeric variable cannot be parsed,
    /// the database URL is unsupported, or validation fails.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        load_dotenv();

        let api_key = env::var(env_vars::OPENAI_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(
                "{} is not set; chat requests will fail upstream authentication",
                env_vars::OPENAI_API_KEY
            );
        }

        let config = Self {
            host: env_var_or(env_vars::HOST, defaults::HOST),
            http_port: env_parse_or(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    env_vars::DATABASE_URL,
                    defaults::DATABASE_URL,
                ))?,
            },
            llm: LlmConfig {
                api_key,
                base_url: env_var_or(env_vars::OPENAI_BASE_URL, defaults::OPENAI_BASE_URL),
                model: env_var_or(env_vars::OPENAI_MODEL, defaults::MODEL),
                request_timeout_secs: env_parse_or(
                    env_vars::LLM_REQUEST_TIMEOUT_SECS,
                    timeouts::LLM_REQUEST_TIMEOUT_SECS,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(
                    env_vars::CORS_ALLOWED_ORIGINS,
                    defaults::CORS_ALLOWED_ORIGINS,
                ),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero timeout, an empty model name,
    /// or a base URL that is not HTTP(S).
    pub fn validate(&self) -> AppResult<()> {
        if self.llm.request_timeout_secs == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::LLM_REQUEST_TIMEOUT_SECS
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(AppError::config("Completion model name is empty"));
        }
        if !(self.llm.base_url.starts_with("http://") || self.llm.base_url.starts_with("https://"))
        {
            return Err(AppError::config(format!(
                "{} must be an http(s) URL, got '{}'",
                env_vars::OPENAI_BASE_URL,
                self.llm.base_url
            )));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Chat Relay Server Configuration:\n\
             - Listen: {}:{}\n\
             - Database: {}\n\
             - LLM Endpoint: {}\n\
             - LLM Model: {}\n\
             - LLM API Key: {}\n\
             - LLM Timeout: {}s\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.database.url,
            self.llm.base_url,
            self.llm.model,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.llm.request_timeout_secs,
            self.cors.allowed_origins
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, using `default` when it is unset
fn env_parse_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key}: '{raw}' ({e})"))),
        Err(_) => Ok(default),
    }
}
