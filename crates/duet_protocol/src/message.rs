//! Wire message definitions for client-server communication.
//!
//! All frames are flat JSON records with a `type` discriminator field.
//! Field names follow the client convention (camelCase) on the wire.

use serde::{Deserialize, Serialize};

use crate::story::SceneId;

/// One of the two player seats in a room, as spelled on the wire
/// (`"player1"` / `"player2"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    Player1,
    Player2,
}

impl SlotId {
    /// Zero-based slot index (slot 1 is index 0).
    pub fn index(self) -> usize {
        match self {
            SlotId::Player1 => 0,
            SlotId::Player2 => 1,
        }
    }

    /// One-based player number as reported in `joinedRoom`.
    pub fn number(self) -> u8 {
        match self {
            SlotId::Player1 => 1,
            SlotId::Player2 => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SlotId::Player1),
            1 => Some(SlotId::Player2),
            _ => None,
        }
    }

    /// The other seat in the room.
    pub fn partner(self) -> Self {
        match self {
            SlotId::Player1 => SlotId::Player2,
            SlotId::Player2 => SlotId::Player1,
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotId::Player1 => write!(f, "player1"),
            SlotId::Player2 => write!(f, "player2"),
        }
    }
}

/// A message sent from a client to the server.
///
/// Frames whose `type` tag matches none of these variants fail to parse;
/// the server logs and drops them without closing the connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request a seat in a room, creating the room if needed.
    #[serde(rename = "joinRoom", rename_all = "camelCase")]
    JoinRoom { room_code: String, name: String },

    /// Mark the sender's slot as ready to start.
    #[serde(rename = "playerReady")]
    PlayerReady,

    /// Request the game start (only honored once both slots are ready).
    #[serde(rename = "startGame")]
    StartGame,

    /// Report a choice taken on the sender's current scene. The effects
    /// fields are client-resolved; the server re-resolves them against its
    /// own story graph when it can (see the rooms module).
    #[serde(rename = "makeChoice", rename_all = "camelCase")]
    MakeChoice {
        scene_id: SceneId,
        choice_index: u32,
        choice_text: String,
        next_scene_id: SceneId,
        #[serde(default)]
        status: Option<String>,
    },
}

impl ClientMessage {
    /// Parse a raw text frame. The error carries enough context to log;
    /// callers treat failures as protocol noise, not faults.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Name and readiness of one occupant, as carried by `roomUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPlayer {
    pub name: String,
    pub ready: bool,
}

/// A message sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Seat assignment confirmation for the joining connection.
    #[serde(rename = "joinedRoom", rename_all = "camelCase")]
    JoinedRoom {
        room_code: String,
        player_number: u8,
        player_name: String,
    },

    /// Room roster broadcast after joins and ready-ups.
    #[serde(rename = "roomUpdate")]
    RoomUpdate {
        player1: Option<RoomPlayer>,
        player2: Option<RoomPlayer>,
    },

    /// Both players are ready and the game has begun.
    #[serde(rename = "gameStart")]
    GameStart,

    /// Instruction for the receiving client to display a scene. Sent
    /// individually, never broadcast: the two players follow divergent
    /// branches.
    #[serde(rename = "loadScene", rename_all = "camelCase")]
    LoadScene { scene_id: SceneId },

    /// Lightweight notice that the partner took a choice. Descriptive
    /// text only; the receiving client does not advance on it.
    #[serde(rename = "partnerChoice", rename_all = "camelCase")]
    PartnerChoice { player_slot: SlotId, choice: String },

    /// The other occupant disconnected.
    #[serde(rename = "playerLeft")]
    PlayerLeft { slot: SlotId },

    /// The receiving player's own branch reached a terminal scene.
    #[serde(rename = "gameOver", rename_all = "camelCase")]
    GameOver { ending_id: String },

    /// Operation-scoped failure, e.g. joining a full room.
    #[serde(rename = "error")]
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_room_parses_wire_fields() {
        let msg = ClientMessage::parse(r#"{"type":"joinRoom","roomCode":"default","name":"Alice"}"#)
            .unwrap();
        match msg {
            ClientMessage::JoinRoom { room_code, name } => {
                assert_eq!(room_code, "default");
                assert_eq!(name, "Alice");
            }
            other => panic!("expected JoinRoom, got {other:?}"),
        }
    }

    #[test]
    fn player_ready_is_bare_tag() {
        let msg = ClientMessage::parse(r#"{"type":"playerReady"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::PlayerReady));
    }

    #[test]
    fn make_choice_status_optional() {
        let msg = ClientMessage::parse(
            r#"{"type":"makeChoice","sceneId":3,"choiceIndex":1,"choiceText":"Run","nextSceneId":7}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::MakeChoice {
                scene_id,
                choice_index,
                next_scene_id,
                status,
                ..
            } => {
                assert_eq!(scene_id, 3);
                assert_eq!(choice_index, 1);
                assert_eq!(next_scene_id, 7);
                assert!(status.is_none());
            }
            other => panic!("expected MakeChoice, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = ClientMessage::parse(r#"{"type":"teleport","x":1}"#).unwrap_err();
        assert!(err.to_string().contains("teleport"));
    }

    #[test]
    fn malformed_frame_rejected() {
        assert!(ClientMessage::parse("not json").is_err());
    }

    #[test]
    fn server_messages_tagged_camel_case() {
        let json = serde_json::to_string(&ServerMessage::JoinedRoom {
            room_code: "default".into(),
            player_number: 2,
            player_name: "Bob".into(),
        })
        .unwrap();
        assert!(json.contains(r#""type":"joinedRoom""#));
        assert!(json.contains(r#""roomCode":"default""#));
        assert!(json.contains(r#""playerNumber":2"#));

        let json = serde_json::to_string(&ServerMessage::LoadScene { scene_id: 50 }).unwrap();
        assert_eq!(json, r#"{"type":"loadScene","sceneId":50}"#);
    }

    #[test]
    fn room_update_carries_optional_slots() {
        let json = serde_json::to_string(&ServerMessage::RoomUpdate {
            player1: Some(RoomPlayer {
                name: "Alice".into(),
                ready: true,
            }),
            player2: None,
        })
        .unwrap();
        assert!(json.contains(r#""player1":{"name":"Alice","ready":true}"#));
        assert!(json.contains(r#""player2":null"#));
    }

    #[test]
    fn slot_id_wire_spelling() {
        assert_eq!(serde_json::to_string(&SlotId::Player1).unwrap(), r#""player1""#);
        assert_eq!(SlotId::Player2.number(), 2);
        assert_eq!(SlotId::Player1.partner(), SlotId::Player2);
        assert_eq!(SlotId::from_index(1), Some(SlotId::Player2));
        assert_eq!(SlotId::from_index(2), None);
    }
}
