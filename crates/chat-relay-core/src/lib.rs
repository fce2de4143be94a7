// ABOUTME: Core types and constants for the chat relay server
// ABOUTME: Foundation crate with the error taxonomy and application-wide defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Chat Relay Core
//!
//! Foundation crate shared by the server crate. It changes rarely, which keeps
//! incremental builds of the server fast.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the coarse `ErrorKind` taxonomy
//! - **constants**: defaults, environment variable names, and endpoint paths

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
