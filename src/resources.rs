// ABOUTME: Centralized resource container for dependency injection into route handlers
// ABOUTME: Holds the history database, chat orchestrator, and configuration behind Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and handed to every router as axum state. There are
//! no global singletons: the store handle is acquired here and released by the
//! server after graceful shutdown.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::services::ChatOrchestrator;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Chat history store
    pub database: Arc<Database>,
    /// Chat turn and history service
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Effective configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources around an already-opened database
    #[must_use]
    pub fn new(
        database: Database,
        provider: Arc<dyn LlmProvider>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let orchestrator = Arc::new(ChatOrchestrator::new(database.history(), provider));

        Self {
            database: Arc::new(database),
            orchestrator,
            config,
        }
    }

    /// Open the configured store and build the `OpenAI` provider
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the HTTP client
    /// cannot be built.
    pub async fn from_config(config: Arc<ServerConfig>) -> AppResult<Self> {
        let database = Database::new(&config.database.url).await?;
        let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::from_config(&config.llm)?);
        Ok(Self::new(database, provider, config))
    }
}
