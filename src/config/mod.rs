// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Exposes the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the chat relay server
//!
//! All configuration comes from environment variables (optionally seeded from a
//! `.env` file). Command-line flags in the binary override individual values.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    load_dotenv, CorsConfig, DatabaseConfig, DatabaseUrl, LlmConfig, ServerConfig,
};
