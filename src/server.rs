// ABOUTME: HTTP server assembly and lifecycle for the chat relay
// ABOUTME: Merges domain routers, applies CORS and tracing layers, serves until a shutdown signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Lifecycle
//!
//! [`build_router`] is used by both the binary and the integration tests, so
//! the tested router is the served router. [`run`] binds the listener, serves
//! until SIGINT or SIGTERM, then closes the store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{ChatRoutes, HealthRoutes};

/// Build the complete application router
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(ChatRoutes::routes(Arc::clone(resources)))
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .layer(setup_cors(&resources.config))
        .layer(TraceLayer::new_for_http())
}

/// Serve on the configured host and port until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound, or
/// the server fails while running.
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", resources.config.host, resources.config.http_port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                resources.config.host, resources.config.http_port
            )
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "HTTP server listening");

    let app = build_router(&resources);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    resources.database.close().await;
    served.context("HTTP server terminated with an error")?;

    info!("Chat relay server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received, draining connections");
}
