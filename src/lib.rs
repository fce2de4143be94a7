// ABOUTME: Main library entry point for the chat relay server
// ABOUTME: Per-user SQLite chat history in front of an OpenAI chat completions endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Chat Relay Server
//!
//! A small HTTP service that relays chat messages to a large-language-model
//! completion API while keeping each user's conversation in a local SQLite
//! store.
//!
//! ## Request flow
//!
//! `POST /chat/` reads the user's stored turns, seeds a system instruction on
//! the first message, stores the user turn, sends the whole transcript to the
//! provider, stores the first reply, and returns every candidate.
//! `GET /history/{user_id}` returns the stored turns in insertion order.
//!
//! ## Architecture
//!
//! - **Database**: `sqlx` SQLite pool and the append-only [`database::HistoryStore`]
//! - **LLM**: [`llm::LlmProvider`] trait and the `OpenAI` client
//! - **Services**: transcript assembly and per-user chat orchestration
//! - **Routes**: thin axum handlers over the services
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chat_relay_server::config::ServerConfig;
//! use chat_relay_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Chat relay configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Application constants re-exported from the core crate
pub mod constants;

/// SQLite connection management and chat history storage
pub mod database;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Completion provider abstraction and `OpenAI` client
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS)
pub mod middleware;

/// Shared server resources for dependency injection
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Domain services used by the routes
pub mod services;
