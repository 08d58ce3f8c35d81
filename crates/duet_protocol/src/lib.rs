//! # Duet Protocol
//!
//! Wire messages and story-graph data model shared between the Duet game
//! server and its presentation clients.
//!
//! ## Message Flow
//!
//! 1. Client sends a WebSocket text frame with a `{"type": ...}` discriminator
//! 2. Server parses it as a [`ClientMessage`] and routes by variant
//! 3. Server replies with targeted or broadcast [`ServerMessage`] frames
//!
//! Both directions are closed tagged sum types with exhaustive matching at
//! the transport boundary. Frames with unrecognized tags fail to parse and
//! are logged and dropped by the server rather than silently matching a
//! partial shape.
//!
//! ## Story Graph
//!
//! The [`story`] module holds the read-only story-graph document: scenes
//! with branching choices and terminal ending markers, loaded from the
//! authored `game-data.json`. The server uses it to resolve choice effects
//! authoritatively; clients fetch the same document over plain HTTP.

pub use message::{ClientMessage, RoomPlayer, ServerMessage, SlotId};
pub use story::{Choice, Effects, Ending, Scene, SceneId, StoryError, StoryGraph};

pub mod message;
pub mod story;
