//! HTTP and WebSocket transport.
//!
//! One axum listener carries everything: the `/ws` upgrade endpoint, the
//! read-only story document at `/game-data.json`, and static presentation
//! assets for every other path.

pub mod http;
pub mod ws;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use duet_protocol::StoryGraph;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::rooms::{ConnectionId, RoomManager};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomManager>,
    pub story: Arc<StoryGraph>,
    next_connection_id: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(rooms: Arc<RoomManager>, story: Arc<StoryGraph>) -> Self {
        Self {
            rooms,
            story,
            next_connection_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Allocate a fresh connection id for an upgraded socket.
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_connection_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Build the application router.
pub fn app(state: AppState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/game-data.json", get(http::game_data_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
