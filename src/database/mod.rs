// ABOUTME: SQLite connection management and schema migration for the chat history store
// ABOUTME: Owns the process-wide pool that is opened at startup and closed at shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! [`Database`] wraps a `sqlx` SQLite pool. It is built once by the server,
//! shared through `ServerResources`, and closed after graceful shutdown. The
//! per-user history operations live on [`HistoryStore`].

mod chat_history;

pub use chat_history::{ChatTurn, HistoryStore};

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Pool size for file-backed stores
const FILE_POOL_MAX_CONNECTIONS: u32 = 5;

/// Handle to the history store's connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the store and run schema migration
    ///
    /// An in-memory store keeps exactly one connection alive for the lifetime
    /// of the pool; every new in-memory connection would be a separate, empty
    /// database.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the database cannot be opened or migrated.
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL '{url}': {e}")))?
            .create_if_missing(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::storage(format!("Failed to open database {url}: {e}")).with_source(e)
        })?;

        let db = Self { pool };
        db.migrate().await?;

        info!("Chat history store ready at {url}");
        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// History operations sharing this pool
    #[must_use]
    pub fn history(&self) -> HistoryStore {
        HistoryStore::new(self.pool.clone())
    }

    /// Create the schema if it does not exist yet
    ///
    /// Safe to call on an existing database; existing rows are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_history_user ON chat_history(user_id, id)",
        )
        .execute(&self.pool)
        .await?;

        debug!("chat_history schema migrated");
        Ok(())
    }

    /// Verify the store answers a trivial query
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Chat history store closed");
    }
}
