//! Duet server entry point.
//!
//! Two-player synchronous interactive fiction: one listener serves the
//! WebSocket game protocol, the story-graph document, and static assets.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use duet_protocol::StoryGraph;
use tracing::{error, info, warn};

use duet_server::config::{self, Args};
use duet_server::net::{self, AppState};
use duet_server::rooms::RoomManager;
use duet_server::{logging, shutdown, ServerError};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config(&args).await?;

    logging::setup_logging(&args, config.logging.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting Duet server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", args.config.display());

    let listen_addr = config::resolve_listen_addr(&config, &args, config::port_from_env())?;

    // Missing story data is not fatal: the server still relays, it just
    // cannot resolve choices authoritatively or serve useful content.
    let data_file = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.story.data_file));
    let story = match StoryGraph::load(&data_file) {
        Ok(graph) => {
            let dangling = graph.validate();
            if dangling > 0 {
                warn!(
                    "Story data {} has {} dangling reference(s)",
                    data_file.display(),
                    dangling
                );
            }
            info!(
                "Loaded {} scene(s) from {}",
                graph.scene_count(),
                data_file.display()
            );
            graph
        }
        Err(e) => {
            warn!(
                "Failed to load story data {}: {} - choice effects will trust clients",
                data_file.display(),
                e
            );
            StoryGraph::empty()
        }
    };
    let story = Arc::new(story);

    let rooms = Arc::new(RoomManager::new(
        story.clone(),
        config.story.player1_start,
        config.story.player2_start,
    ));
    let state = AppState::new(rooms, story);

    let static_dir = args
        .assets
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.story.static_dir));
    let app = net::app(state, static_dir.clone());

    let shutdown_receiver = shutdown::setup_shutdown_handler().await;

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(ServerError::from)?;
    info!("Listening on {}", listener.local_addr()?);
    info!("Serving static assets from {}", static_dir.display());
    info!(
        "Starting scenes: player1={} player2={}",
        config.story.player1_start, config.story.player2_start
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            match result {
                Ok(_) => info!("Server stopped normally"),
                Err(e) => {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = shutdown_receiver => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
