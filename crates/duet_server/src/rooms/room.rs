//! Room and player-slot state.

use duet_protocol::{RoomPlayer, SceneId, ServerMessage, SlotId};
use tokio::sync::mpsc;
use tracing::trace;

use super::ConnectionId;

/// Send-only handle to a client connection.
///
/// The handle does not own the connection's lifecycle; it only carries
/// the outbound channel drained by that connection's writer task. Sending
/// to a connection that has gone away is silently dropped: delivery is
/// best-effort, never retried or queued beyond the channel itself.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a message for delivery. Drops silently if the connection's
    /// writer task has exited.
    pub fn send(&self, msg: ServerMessage) {
        if self.tx.send(msg).is_err() {
            trace!(connection = self.id, "dropping message for closed connection");
        }
    }
}

/// One player's seat within a room: identity, connection handle, and
/// story-graph position. Mutated only by messages attributed to the
/// owning connection.
#[derive(Debug)]
pub struct PlayerSlot {
    pub conn: ConnectionHandle,
    pub name: String,
    pub scene_id: SceneId,
    pub ready: bool,
    pub status: String,
    /// The player's own branch reached a terminal scene.
    pub ended: bool,
}

impl PlayerSlot {
    pub fn new(conn: ConnectionHandle, name: String, scene_id: SceneId) -> Self {
        Self {
            conn,
            name,
            scene_id,
            ready: false,
            status: "waiting".to_string(),
            ended: false,
        }
    }

    fn roster_entry(&self) -> RoomPlayer {
        RoomPlayer {
            name: self.name.clone(),
            ready: self.ready,
        }
    }
}

/// The paired-player container coordinating exactly two slots for one
/// story playthrough.
#[derive(Debug)]
pub struct Room {
    code: String,
    slots: [Option<PlayerSlot>; 2],
    started: bool,
}

impl Room {
    pub fn new(code: String) -> Self {
        Self {
            code,
            slots: [None, None],
            started: false,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn set_started(&mut self) {
        self.started = true;
    }

    pub fn slot(&self, id: SlotId) -> Option<&PlayerSlot> {
        self.slots[id.index()].as_ref()
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut PlayerSlot> {
        self.slots[id.index()].as_mut()
    }

    /// First-available seat, slot 1 before slot 2.
    pub fn free_slot(&self) -> Option<SlotId> {
        self.slots
            .iter()
            .position(Option::is_none)
            .and_then(SlotId::from_index)
    }

    pub fn seat(&mut self, id: SlotId, slot: PlayerSlot) {
        self.slots[id.index()] = Some(slot);
    }

    pub fn clear_slot(&mut self, id: SlotId) {
        self.slots[id.index()] = None;
    }

    pub fn occupant_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn both_ready(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.as_ref().is_some_and(|p| p.ready))
    }

    /// Current roster as carried by `roomUpdate`.
    pub fn roster(&self) -> ServerMessage {
        ServerMessage::RoomUpdate {
            player1: self.slot(SlotId::Player1).map(PlayerSlot::roster_entry),
            player2: self.slot(SlotId::Player2).map(PlayerSlot::roster_entry),
        }
    }

    /// Send to every occupant. Closed connections drop silently.
    pub fn broadcast(&self, msg: &ServerMessage) {
        for slot in self.slots.iter().flatten() {
            slot.conn.send(msg.clone());
        }
    }

    /// Send to one occupied seat, if present.
    pub fn send_to(&self, id: SlotId, msg: ServerMessage) {
        if let Some(slot) = self.slot(id) {
            slot.conn.send(msg);
        }
    }
}
