// ABOUTME: Route module organization for the chat relay HTTP endpoints
// ABOUTME: Each domain module exposes a Routes type returning an axum Router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Chat turn and history routes
pub mod chat;
/// Health check route
pub mod health;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
