// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Holds transcript assembly and the chat-turn orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin: they deserialize the request, call into a
//! service, and serialize the result. Everything that touches both the store
//! and the completion provider lives here.

/// Chat turn orchestration: transcript, completion, reply persistence
pub mod chat_orchestration;

/// Transcript assembly with lazy system-turn seeding
pub mod conversation;

pub use chat_orchestration::{ChatOrchestrator, ChatReply, CompletionParams};
pub use conversation::ConversationAssembler;
