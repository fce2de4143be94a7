// ABOUTME: Re-exports application constants from the core crate
// ABOUTME: Defaults, environment variable names, timeouts, and endpoint paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application constants, defined in `chat-relay-core`

pub use chat_relay_core::constants::*;
