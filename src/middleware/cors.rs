// ABOUTME: CORS middleware configuration for the chat relay HTTP API
// ABOUTME: Builds the tower-http CorsLayer from the configured origin policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::ServerConfig;

/// Configure CORS settings for the server
///
/// `CORS_ALLOWED_ORIGINS="*"` (the default) or an empty value allows any
/// origin, method, and header. A comma-separated list restricts origins to
/// that list and methods to the ones the API serves. Credentials are never
/// allowed; browsers reject credentials combined with a wildcard origin.
///
/// # Examples
///
/// ```bash
/// # Allow all origins
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Allow specific origins
/// export CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let allowed = config.cors.allowed_origins.trim();
    if allowed.is_empty() || allowed == "*" {
        return permissive();
    }

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                HeaderValue::from_str(trimmed)
                    .map_err(|e| warn!("Ignoring invalid CORS origin '{trimmed}': {e}"))
                    .ok()
            }
        })
        .collect();

    if origins.is_empty() {
        warn!("No valid CORS origins configured, allowing any origin");
        return permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers(AllowHeaders::any())
        .allow_methods(AllowMethods::any())
}
