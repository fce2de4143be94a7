// ABOUTME: Builds the transcript handed to the completion provider
// ABOUTME: Seeds the system turn on a user's first message and persists the incoming user turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::debug;

use crate::constants::defaults;
use crate::database::{ChatTurn, HistoryStore};
use crate::errors::AppResult;
use crate::llm::{ChatMessage, MessageRole};

/// Produces the ordered message list for one chat turn
#[derive(Clone)]
pub struct ConversationAssembler {
    history: HistoryStore,
    system_prompt: String,
}

impl ConversationAssembler {
    /// Create an assembler that seeds new conversations with the default instruction
    #[must_use]
    pub fn new(history: HistoryStore) -> Self {
        Self::with_system_prompt(history, defaults::SYSTEM_PROMPT)
    }

    /// Create an assembler with a custom seed instruction
    #[must_use]
    pub fn with_system_prompt(history: HistoryStore, system_prompt: impl Into<String>) -> Self {
        Self {
            history,
            system_prompt: system_prompt.into(),
        }
    }

    /// Load the user's turns, seed if new, then persist and append `message`
    ///
    /// Performs at most two writes: the seed `system` turn (first message only)
    /// and the `user` turn. Nothing is rolled back if the second write fails.
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if any read or write fails.
    pub async fn assemble(&self, user_id: &str, message: &str) -> AppResult<Vec<ChatMessage>> {
        let mut turns = self.history.read_all(user_id).await?;

        if turns.is_empty() {
            if self.history.seed_if_empty(user_id, &self.system_prompt).await? {
                debug!(user_id, "Seeded system turn for new conversation");
                turns.push(ChatTurn::new(MessageRole::System, self.system_prompt.as_str()));
            } else {
                // Another writer seeded between our read and insert.
                turns = self.history.read_all(user_id).await?;
            }
        }

        self.history
            .append(user_id, MessageRole::User, message)
            .await?;

        let mut transcript: Vec<ChatMessage> = turns.into_iter().map(ChatMessage::from).collect();
        transcript.push(ChatMessage::user(message));

        debug!(
            user_id,
            turns = transcript.len(),
            message_len = message.len(),
            "Assembled transcript"
        );
        Ok(transcript)
    }
}
