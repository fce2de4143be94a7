// ABOUTME: Chat orchestration domain service for one request/response turn
// ABOUTME: Assembles the transcript, calls the completion provider, and persists the first reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use super::conversation::ConversationAssembler;
use crate::constants::defaults;
use crate::database::{ChatTurn, HistoryStore};
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatRequest, LlmProvider, MessageRole};

/// Sampling parameters forwarded to the completion provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Maximum tokens per candidate
    pub max_tokens: u32,
    /// Number of candidate replies
    pub candidates: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: defaults::MAX_TOKENS,
            candidates: defaults::CANDIDATES,
            temperature: defaults::TEMPERATURE,
        }
    }
}

/// Outcome of a chat turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// Exactly one candidate came back
    Single(String),
    /// Zero or several candidates, in provider order
    Multiple(Vec<String>),
}

impl ChatReply {
    /// Build from the provider's candidates
    #[must_use]
    pub fn from_candidates(mut candidates: Vec<String>) -> Self {
        if candidates.len() == 1 {
            Self::Single(candidates.remove(0))
        } else {
            Self::Multiple(candidates)
        }
    }

    /// Number of candidates carried
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(candidates) => candidates.len(),
        }
    }

    /// Whether no candidate is carried
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs chat turns and history queries against the store and provider
///
/// Turns for the same user are serialized through a per-user async mutex;
/// turns for different users never wait on each other.
pub struct ChatOrchestrator {
    history: HistoryStore,
    assembler: ConversationAssembler,
    provider: Arc<dyn LlmProvider>,
    user_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ChatOrchestrator {
    /// Create a new orchestrator
    #[must_use]
    pub fn new(history: HistoryStore, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            assembler: ConversationAssembler::new(history.clone()),
            history,
            provider,
            user_locks: DashMap::new(),
        }
    }

    /// The completion provider in use
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Handle one chat message for `user_id`
    ///
    /// Steps: assemble the transcript (seed + user turn), request completions,
    /// persist the first candidate as an `assistant` turn. Only that first
    /// candidate is stored, whatever `params.candidates` is. Writes committed
    /// before a failure stay in place.
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the store fails and an upstream-kind
    /// error if the completion provider fails.
    #[instrument(skip(self, message, params), fields(message_len = message.len()))]
    pub async fn handle_chat(
        &self,
        user_id: &str,
        message: &str,
        params: CompletionParams,
    ) -> AppResult<ChatReply> {
        let lock = UserLock::acquire(&self.user_locks, user_id);
        let result = {
            let _guard = lock.mutex().lock().await;
            self.run_turn(user_id, message, params).await
        };
        drop(lock);

        if let Err(ref e) = result {
            error!(user_id, kind = ?e.kind(), "Chat turn failed: {}", e);
        }
        result
    }

    async fn run_turn(
        &self,
        user_id: &str,
        message: &str,
        params: CompletionParams,
    ) -> AppResult<ChatReply> {
        let transcript = self.assembler.assemble(user_id, message).await?;

        let request = ChatRequest::new(transcript)
            .with_model(self.provider.default_model())
            .with_max_tokens(params.max_tokens)
            .with_candidates(params.candidates)
            .with_temperature(params.temperature);

        let completion = self.provider.complete(&request).await?;

        let first = completion.first().ok_or_else(|| {
            AppError::external_service(self.provider.name(), "API returned no choices")
        })?;
        self.history
            .append(user_id, MessageRole::Assistant, first)
            .await?;

        info!(
            user_id,
            model = %completion.model,
            candidates = completion.choices.len(),
            "Chat turn completed"
        );

        Ok(ChatReply::from_candidates(completion.choices))
    }

    /// Ordered turns for `user_id`; empty for an unknown user
    ///
    /// Read-only: never seeds the system turn.
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the read fails.
    pub async fn get_history(&self, user_id: &str) -> AppResult<Vec<ChatTurn>> {
        let turns = self.history.read_all(user_id).await?;
        debug!(user_id, turns = turns.len(), "Loaded chat history");
        Ok(turns)
    }

    /// Number of users with a live lock entry
    #[must_use]
    pub fn active_user_locks(&self) -> usize {
        self.user_locks.len()
    }
}

/// Handle on one user's turn mutex
///
/// Dropping it removes the map entry once nobody else holds or waits on it,
/// including when the owning future is cancelled mid-turn.
struct UserLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: &'a str,
    mutex: Arc<Mutex<()>>,
}

impl<'a> UserLock<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, user_id: &'a str) -> Self {
        let mutex = Arc::clone(locks.entry(user_id.to_owned()).or_default().value());
        Self {
            locks,
            user_id,
            mutex,
        }
    }

    fn mutex(&self) -> &Mutex<()> {
        &self.mutex
    }
}

impl Drop for UserLock<'_> {
    fn drop(&mut self) {
        // Release our reference first so the count reflects other holders only
        drop(std::mem::take(&mut self.mutex));
        self.locks
            .remove_if(self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
