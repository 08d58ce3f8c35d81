//! Room lifecycle and the per-room session state machine.
//!
//! A room pairs exactly two player slots for one story playthrough:
//! `waiting → both present → both ready → started → per-player ending`.
//! The "ended" condition is per-player; the two branches of the story
//! graph terminate independently.
//!
//! All room state lives in process memory behind the [`RoomManager`]'s
//! single lock. Handlers lock, mutate, enqueue outbound sends (non-blocking
//! channel pushes), and unlock, which keeps every operation atomic per
//! registry without per-room locking.

pub mod manager;
pub mod registry;
pub mod room;

pub use manager::RoomManager;
pub use registry::RoomRegistry;
pub use room::{ConnectionHandle, PlayerSlot, Room};

/// Type alias for connection identifiers.
///
/// Connection ids are allocated by the transport layer and uniquely
/// identify a client connection for its lifetime.
pub type ConnectionId = usize;
