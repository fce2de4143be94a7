// ABOUTME: Server binary for the chat relay HTTP API
// ABOUTME: Loads configuration, opens the history store, and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Relay Server Binary
//!
//! Reads configuration from the environment (and `.env`), applies command-line
//! overrides, then serves `POST /chat/`, `GET /history/{user_id}` and
//! `GET /health` until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Result;
use chat_relay_server::{
    config::{DatabaseUrl, ServerConfig},
    constants::endpoints,
    logging,
    resources::ServerResources,
    server,
};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chat-relay-server")]
#[command(about = "Chat relay API - per-user chat history in front of an OpenAI completion endpoint")]
#[command(version)]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override database location (`sqlite:<path>` or `sqlite::memory:`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&database_url)?;
    }

    info!("Starting chat relay server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(Arc::new(config)).await?);
    display_available_endpoints(&resources.config);

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

/// Log every endpoint with its full URL
fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}:{}", config.host, config.http_port);
    info!("=== Available API Endpoints ===");
    info!("  POST {base}{}", endpoints::CHAT);
    info!("  GET  {base}/history/{{user_id}}");
    info!("  GET  {base}{}", endpoints::HEALTH);
}
