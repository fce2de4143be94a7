// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Lets server modules write crate::errors::AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling, defined in `chat-relay-core`

pub use chat_relay_core::errors::*;
