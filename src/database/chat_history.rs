// ABOUTME: Per-user append-only log of chat turns stored in SQLite
// ABOUTME: Provides append, ordered read, atomic system-turn seeding, and row counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, MessageRole};

// ============================================================================
// Record Types
// ============================================================================

/// One stored turn, as returned by reads and the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who produced the turn
    pub role: MessageRole,
    /// Message text, stored verbatim
    pub content: String,
}

impl ChatTurn {
    /// Create a new turn
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<ChatTurn> for ChatMessage {
    fn from(turn: ChatTurn) -> Self {
        Self::new(turn.role, turn.content)
    }
}

// ============================================================================
// History Store
// ============================================================================

/// Append-only chat history keyed by user
///
/// Rows are never updated or deleted. Ordering within a user is the
/// autoincrement `id`, so reads return turns in insertion order.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Create a new history store over an already-migrated pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new turn
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the write fails.
    pub async fn append(&self, user_id: &str, role: MessageRole, content: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO chat_history (user_id, role, content) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(role.as_str())
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| with_context(e, "Failed to append chat turn"))?;

        Ok(())
    }

    /// All turns for a user, oldest first
    ///
    /// Returns an empty list for a user that never sent a message.
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the query fails or a stored role is
    /// not recognised.
    pub async fn read_all(&self, user_id: &str) -> AppResult<Vec<ChatTurn>> {
        let rows = sqlx::query(
            "SELECT role, content FROM chat_history WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| with_context(e, "Failed to read chat history"))?;

        rows.iter()
            .map(|row| -> AppResult<ChatTurn> {
                let role: String = row
                    .try_get("role")
                    .map_err(|e| with_context(e, "Failed to decode chat turn role"))?;
                let content: String = row
                    .try_get("content")
                    .map_err(|e| with_context(e, "Failed to decode chat turn content"))?;
                Ok(ChatTurn::new(MessageRole::parse(&role)?, content))
            })
            .collect()
    }

    /// Insert a `system` turn only if the user has no turns yet
    ///
    /// The existence check and the insert are one statement, so two callers
    /// racing on a fresh user cannot both seed. Returns `true` when this call
    /// inserted the turn.
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the write fails.
    pub async fn seed_if_empty(&self, user_id: &str, content: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO chat_history (user_id, role, content)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM chat_history WHERE user_id = $1)
            ",
        )
        .bind(user_id)
        .bind(MessageRole::System.as_str())
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(|e| with_context(e, "Failed to seed chat history"))?;

        Ok(result.rows_affected() == 1)
    }

    /// Number of stored turns for a user
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the query fails.
    pub async fn count(&self, user_id: &str) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM chat_history WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| with_context(e, "Failed to count chat turns"))?;

        Ok(row.get("count"))
    }
}

/// Prefix a sqlx failure with the operation while keeping its storage code
fn with_context(error: sqlx::Error, operation: &str) -> AppError {
    let mut app_error = AppError::from(error);
    app_error.message = format!("{operation}: {}", app_error.message);
    app_error
}
