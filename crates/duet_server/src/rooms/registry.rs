//! Process-wide room registry and connection seating index.

use std::collections::HashMap;

use duet_protocol::SlotId;

use super::room::Room;
use super::ConnectionId;

/// Where a connection is seated: room code plus slot index. Stored
/// explicitly per connection instead of being captured in handler
/// closures, so every operation looks its seat up the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub room_code: String,
    pub slot: SlotId,
}

/// Mapping from room code to room state, plus the connection seating
/// index. Rooms are created on demand and removed when empty; a later
/// join with a removed code builds a fresh room.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    seats: HashMap<ConnectionId, Seat>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing room or creates an empty one. Never fails.
    pub fn get_or_create(&mut self, code: &str) -> &mut Room {
        self.rooms
            .entry(code.to_string())
            .or_insert_with(|| Room::new(code.to_string()))
    }

    /// Lookup without creation.
    pub fn get(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Idempotent delete.
    pub fn remove(&mut self, code: &str) {
        self.rooms.remove(code);
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Record where a connection is seated.
    pub fn bind_seat(&mut self, conn: ConnectionId, room_code: String, slot: SlotId) {
        self.seats.insert(conn, Seat { room_code, slot });
    }

    /// Forget a connection's seat, returning it if one was bound.
    pub fn unbind_seat(&mut self, conn: ConnectionId) -> Option<Seat> {
        self.seats.remove(&conn)
    }

    pub fn seat_of(&self, conn: ConnectionId) -> Option<&Seat> {
        self.seats.get(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::super::room::{ConnectionHandle, PlayerSlot};
    use super::*;

    fn seat_player(registry: &mut RoomRegistry, code: &str, conn: ConnectionId, name: &str) {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let room = registry.get_or_create(code);
        let slot = room.free_slot().unwrap();
        room.seat(
            slot,
            PlayerSlot::new(ConnectionHandle::new(conn, tx), name.into(), 1),
        );
    }

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let mut registry = RoomRegistry::new();
        assert!(registry.get("default").is_none());

        registry.get_or_create("default");
        assert_eq!(registry.room_count(), 1);

        // Second call returns the same room, not a fresh one.
        seat_player(&mut registry, "default", 1, "Alice");
        assert_eq!(registry.get_or_create("default").occupant_count(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = RoomRegistry::new();
        registry.get_or_create("default");

        registry.remove("default");
        assert!(registry.get("default").is_none());

        // No-op on an absent room.
        registry.remove("default");
        registry.remove("never-existed");
    }

    #[test]
    fn removed_code_yields_fresh_room() {
        let mut registry = RoomRegistry::new();
        seat_player(&mut registry, "default", 1, "Alice");
        registry.remove("default");

        assert_eq!(registry.get_or_create("default").occupant_count(), 0);
    }

    #[test]
    fn seat_binding_round_trip() {
        let mut registry = RoomRegistry::new();
        registry.bind_seat(7, "default".into(), SlotId::Player2);

        let seat = registry.seat_of(7).unwrap();
        assert_eq!(seat.room_code, "default");
        assert_eq!(seat.slot, SlotId::Player2);

        let removed = registry.unbind_seat(7).unwrap();
        assert_eq!(removed.slot, SlotId::Player2);
        assert!(registry.seat_of(7).is_none());
        assert!(registry.unbind_seat(7).is_none());
    }
}
