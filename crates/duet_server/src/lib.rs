//! # Duet Server
//!
//! A two-player synchronous interactive-fiction server. A room pairs two
//! WebSocket clients, relays branching choices between them, and advances
//! each player's position through a shared story graph.
//!
//! ## Architecture Overview
//!
//! * **Room manager**: process-wide registry of rooms plus the per-room
//!   session state machine (join, ready, start, choice relay, disconnect)
//! * **Transport**: one axum listener carrying the WebSocket endpoint,
//!   the story-graph JSON document, and static presentation assets
//! * **Story graph**: read-only authored content loaded at startup,
//!   used to resolve choice effects authoritatively
//!
//! ## Message Flow
//!
//! 1. Client sends a WebSocket text frame with a `type` discriminator
//! 2. The connection task parses it as a `ClientMessage`
//! 3. The room manager mutates room state under a single lock and enqueues
//!    targeted or broadcast `ServerMessage`s on the occupants' channels
//! 4. Per-connection writer tasks drain those channels into the sockets
//!
//! Nothing past startup is fatal to the process: protocol noise is logged
//! and dropped, capacity errors are answered on the offending connection
//! only, and stale-connection races are silent no-ops.

pub use config::Config;
pub use error::ServerError;
pub use rooms::RoomManager;

pub mod config;
pub mod error;
pub mod logging;
pub mod net;
pub mod rooms;
pub mod shutdown;
