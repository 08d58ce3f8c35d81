//! The room manager: every protocol operation, handled to completion
//! under one lock.
//!
//! Operations never block inside the critical section (all work is
//! in-memory map mutation plus non-blocking channel sends), so holding
//! the single mutex across an entire operation preserves the
//! one-message-at-a-time semantics the protocol assumes, even on a
//! multi-threaded runtime.

use std::sync::Arc;

use duet_protocol::{SceneId, ServerMessage, SlotId, StoryGraph};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::registry::RoomRegistry;
use super::room::{ConnectionHandle, PlayerSlot};
use super::ConnectionId;

/// Room code used when the client supplies an empty one.
const DEFAULT_ROOM: &str = "default";

/// Status label applied after a choice when neither the graph nor the
/// client supplies one.
const STATUS_ACTIVE: &str = "active";

/// Owns the room registry and drives the per-room session state machine.
///
/// Constructed once at process start and shared by handle; connection
/// tasks call into it for every inbound message.
pub struct RoomManager {
    registry: Mutex<RoomRegistry>,
    story: Arc<StoryGraph>,
    player1_start: SceneId,
    player2_start: SceneId,
}

impl RoomManager {
    pub fn new(story: Arc<StoryGraph>, player1_start: SceneId, player2_start: SceneId) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new()),
            story,
            player1_start,
            player2_start,
        }
    }

    fn start_scene(&self, slot: SlotId) -> SceneId {
        match slot {
            SlotId::Player1 => self.player1_start,
            SlotId::Player2 => self.player2_start,
        }
    }

    /// Seat a connection in a room, creating the room on first join.
    ///
    /// The joiner gets `joinedRoom`; once two players are present the
    /// updated roster goes to both. A third join is answered with an
    /// `error` on the joining connection only and mutates nothing.
    pub async fn join(&self, conn: ConnectionHandle, room_code: &str, name: &str) {
        let code = if room_code.is_empty() {
            DEFAULT_ROOM
        } else {
            room_code
        };

        let mut registry = self.registry.lock().await;

        if registry.seat_of(conn.id()).is_some() {
            debug!(connection = conn.id(), "join ignored: already seated");
            return;
        }

        let room = registry.get_or_create(code);
        let Some(slot) = room.free_slot() else {
            conn.send(ServerMessage::Error {
                message: "Room is full".to_string(),
            });
            debug!(room = code, connection = conn.id(), "rejected join: room full");
            return;
        };

        let conn_id = conn.id();
        conn.send(ServerMessage::JoinedRoom {
            room_code: code.to_string(),
            player_number: slot.number(),
            player_name: name.to_string(),
        });
        room.seat(
            slot,
            PlayerSlot::new(conn, name.to_string(), self.start_scene(slot)),
        );
        info!(room = code, player = name, slot = %slot, "player joined");

        if room.occupant_count() == 2 {
            let roster = room.roster();
            room.broadcast(&roster);
        }

        registry.bind_seat(conn_id, code.to_string(), slot);
    }

    /// Mark the sender's slot ready and broadcast the roster. Repeat
    /// calls re-broadcast identical content; a seatless sender is a
    /// silent no-op.
    pub async fn set_ready(&self, conn: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(seat) = registry.seat_of(conn).cloned() else {
            debug!(connection = conn, "playerReady ignored: no seat");
            return;
        };
        let Some(room) = registry.get_mut(&seat.room_code) else {
            return;
        };

        if let Some(slot) = room.slot_mut(seat.slot) {
            slot.ready = true;
            info!(room = %seat.room_code, slot = %seat.slot, "player ready");
        }
        let roster = room.roster();
        room.broadcast(&roster);
    }

    /// Start the game iff both slots are occupied, both ready, and the
    /// room has not already started. On success broadcasts `gameStart`,
    /// then sends each player their own starting scene individually,
    /// since the two entry points differ.
    pub async fn start(&self, conn: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(seat) = registry.seat_of(conn).cloned() else {
            debug!(connection = conn, "startGame ignored: no seat");
            return;
        };
        let Some(room) = registry.get_mut(&seat.room_code) else {
            return;
        };

        if room.started() || !room.both_ready() {
            debug!(
                room = %seat.room_code,
                started = room.started(),
                "startGame ignored"
            );
            return;
        }

        room.set_started();
        room.broadcast(&ServerMessage::GameStart);
        for slot_id in [SlotId::Player1, SlotId::Player2] {
            if let Some(slot) = room.slot(slot_id) {
                let scene_id = slot.scene_id;
                room.send_to(slot_id, ServerMessage::LoadScene { scene_id });
            }
        }
        info!(room = %room.code(), "game started");
    }

    /// Record a choice from the sender's slot and relay it.
    ///
    /// Effects are resolved against the server-held story graph when
    /// `(scene, choice)` is known there; the client-supplied effects are
    /// the fallback for content the server copy does not carry. The
    /// sender gets `loadScene` (plus `gameOver` when the resolved target
    /// is terminal); the partner, if seated, gets exactly one
    /// `partnerChoice` notice and does not advance.
    #[allow(clippy::too_many_arguments)]
    pub async fn make_choice(
        &self,
        conn: ConnectionId,
        scene_id: SceneId,
        choice_index: u32,
        choice_text: &str,
        client_next: SceneId,
        client_status: Option<String>,
    ) {
        let mut registry = self.registry.lock().await;
        let Some(seat) = registry.seat_of(conn).cloned() else {
            debug!(connection = conn, "makeChoice ignored: no seat");
            return;
        };
        let Some(room) = registry.get_mut(&seat.room_code) else {
            return;
        };

        let (next, status) = match self.story.resolve(scene_id, choice_index) {
            Some(choice) => {
                if choice.effects.next_scene_id != client_next {
                    warn!(
                        scene = scene_id,
                        choice = choice_index,
                        client = client_next,
                        authoritative = choice.effects.next_scene_id,
                        "client-supplied next scene disagrees with story graph"
                    );
                }
                (
                    choice.effects.next_scene_id,
                    choice.effects.status.clone().or(client_status),
                )
            }
            // Scene unknown to the server copy of the graph: trust the
            // client's resolution.
            None => (client_next, client_status),
        };
        let status = status.unwrap_or_else(|| STATUS_ACTIVE.to_string());

        let ending = self
            .story
            .scene(next)
            .filter(|s| s.is_terminal())
            .and_then(|s| s.endings.as_ref())
            .and_then(|e| e.first().cloned());

        let Some(slot) = room.slot_mut(seat.slot) else {
            return;
        };
        slot.scene_id = next;
        slot.status = status;
        if ending.is_some() {
            slot.ended = true;
        }

        room.send_to(seat.slot, ServerMessage::LoadScene { scene_id: next });
        if let Some(ending_id) = ending {
            info!(room = %room.code(), slot = %seat.slot, ending = %ending_id, "branch ended");
            room.send_to(seat.slot, ServerMessage::GameOver { ending_id });
        }

        room.send_to(
            seat.slot.partner(),
            ServerMessage::PartnerChoice {
                player_slot: seat.slot,
                choice: choice_text.to_string(),
            },
        );
        debug!(room = %room.code(), slot = %seat.slot, next, "choice recorded");
    }

    /// Clear the disconnecting connection's slot, notify the remaining
    /// occupant, and delete the room once both slots are empty.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(seat) = registry.unbind_seat(conn) else {
            return;
        };
        let Some(room) = registry.get_mut(&seat.room_code) else {
            return;
        };

        room.clear_slot(seat.slot);
        room.broadcast(&ServerMessage::PlayerLeft { slot: seat.slot });
        info!(room = %room.code(), slot = %seat.slot, "player left");

        if room.is_empty() {
            registry.remove(&seat.room_code);
            info!(room = %seat.room_code, "room deleted");
        }
    }

    /// Lookup without creation, for observability and tests.
    pub async fn room_exists(&self, code: &str) -> bool {
        self.registry.lock().await.get(code).is_some()
    }

    pub async fn room_count(&self) -> usize {
        self.registry.lock().await.room_count()
    }
}
