// ABOUTME: Unified error handling with error codes, kinds, and client-facing bodies
// ABOUTME: AppError carries a fine-grained code while ErrorKind keeps the coarse taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the server returns [`AppResult`]. The error
//! carries an [`ErrorCode`] describing the precise failure and maps onto the
//! coarse [`ErrorKind`] taxonomy (storage, upstream, validation, internal).
//! HTTP handlers flatten everything except validation failures into a single
//! `500` response whose body is `{"detail": <message>}`, so clients cannot
//! tell storage and upstream failures apart while tests still can.

#[cfg(feature = "database-errors")]
mod database;
#[cfg(feature = "http-response")]
mod http;

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request body did not match the expected schema
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // External Services (5000-5999)
    /// Completion provider returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Completion provider could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Completion provider rejected the credential
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Completion provider rate limited the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Configuration could not be loaded or is invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// A query against the store failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// The store itself is unavailable (closed pool, I/O, corruption)
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
}

/// Coarse failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Persistence unavailable or corrupt
    Storage,
    /// Completion provider failure (auth, rate limit, network, malformed response)
    Upstream,
    /// Malformed request body
    Validation,
    /// Anything else (configuration, bugs)
    Internal,
}

impl ErrorCode {
    /// Taxonomy bucket for this code
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InvalidInput => ErrorKind::Validation,
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited => ErrorKind::Upstream,
            Self::DatabaseError | Self::StorageError => ErrorKind::Storage,
            Self::ConfigError | Self::InternalError => ErrorKind::Internal,
        }
    }

    /// HTTP status code reported to clients
    ///
    /// Only validation failures are distinguished; storage and upstream
    /// failures share the generic `500`.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 422,
            ErrorKind::Storage | ErrorKind::Upstream | ErrorKind::Internal => 500,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, returned verbatim as `detail`
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Taxonomy bucket of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Database query failure
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Store unavailable or corrupt
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service could not be reached
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service rejected our credential
    #[must_use]
    pub fn external_auth(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalAuthFailed,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service rate limited us
    #[must_use]
    pub fn external_rate_limited(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalRateLimited,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Underlying error message
    pub detail: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            detail: error.message,
        }
    }
}
