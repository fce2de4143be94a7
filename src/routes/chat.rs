// ABOUTME: Chat route handlers for sending messages and reading conversation history
// ABOUTME: Provides POST /chat/ and GET /history/{user_id} on top of the chat orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Chat routes
//!
//! Handlers only translate between JSON bodies and the orchestrator. Any
//! storage or upstream failure becomes `500 {"detail": ...}`; a body that does
//! not match [`ChatRequestBody`] becomes `422 {"detail": ...}`.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{defaults, endpoints},
    database::ChatTurn,
    errors::AppError,
    resources::ServerResources,
    services::{ChatReply, CompletionParams},
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /chat/`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequestBody {
    /// Conversation owner
    pub user_id: String,
    /// New user message
    pub message: String,
    /// Maximum tokens per candidate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: NonZeroU32,
    /// Number of candidate replies
    #[serde(default = "default_candidates")]
    pub n: NonZeroU32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl ChatRequestBody {
    /// Sampling parameters for the orchestrator
    #[must_use]
    pub const fn params(&self) -> CompletionParams {
        CompletionParams {
            max_tokens: self.max_tokens.get(),
            candidates: self.n.get(),
            temperature: self.temperature,
        }
    }
}

fn default_max_tokens() -> NonZeroU32 {
    NonZeroU32::new(defaults::MAX_TOKENS).unwrap_or(NonZeroU32::MIN)
}

fn default_candidates() -> NonZeroU32 {
    NonZeroU32::new(defaults::CANDIDATES).unwrap_or(NonZeroU32::MIN)
}

const fn default_temperature() -> f64 {
    defaults::TEMPERATURE
}

/// Body of a successful `POST /chat/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponseBody {
    /// Exactly one candidate
    Single {
        /// The reply
        response: String,
    },
    /// Any other number of candidates
    Multiple {
        /// The replies in provider order
        responses: Vec<String>,
    },
}

impl From<ChatReply> for ChatResponseBody {
    fn from(reply: ChatReply) -> Self {
        match reply {
            ChatReply::Single(response) => Self::Single { response },
            ChatReply::Multiple(responses) => Self::Multiple { responses },
        }
    }
}

/// Body of `GET /history/{user_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Turns oldest first
    pub conversation_history: Vec<ChatTurn>,
}

// ============================================================================
// Chat Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::CHAT, post(Self::send_message))
            .route(endpoints::HISTORY, get(Self::get_history))
            .with_state(resources)
    }

    /// Run one chat turn
    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<ChatRequestBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = body.map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;

        let reply = resources
            .orchestrator
            .handle_chat(&request.user_id, &request.message, request.params())
            .await?;

        Ok((StatusCode::OK, Json(ChatResponseBody::from(reply))).into_response())
    }

    /// Read a user's conversation
    async fn get_history(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let conversation_history = resources.orchestrator.get_history(&user_id).await?;

        Ok((
            StatusCode::OK,
            Json(HistoryResponse {
                conversation_history,
            }),
        )
            .into_response())
    }
}
