//! Events emitted by puppet implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::ScanStatus;

/// An event pushed by a puppet to its subscribers.
///
/// Events carry ids, not full payloads; subscribers fetch the details they
/// need through the puppet's payload accessors. The serialized form tags each
/// variant with a kebab-case `type` field matching [`PuppetEvent::name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PuppetEvent {
    /// The puppet finished logging in as `user_id`.
    Login { user_id: String },
    /// The puppet logged out.
    Logout {
        user_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    /// The puppet hit an internal error.
    Error { message: String },
    /// A new message arrived.
    Message { message_id: String },
    /// A friendship event happened.
    Friendship { friendship_id: String },
    /// The logged-in account was invited to a room.
    RoomInvite { invitation_id: String },
    /// Contacts joined a room.
    RoomJoin {
        room_id: String,
        invitee_ids: Vec<String>,
        inviter_id: String,
        #[serde(default)]
        timestamp_ms: Option<i64>,
    },
    /// Contacts left (or were removed from) a room.
    RoomLeave {
        room_id: String,
        leaver_ids: Vec<String>,
        /// The contact that removed them, absent when they left on their own.
        #[serde(default)]
        operator_id: Option<String>,
        #[serde(default)]
        timestamp_ms: Option<i64>,
    },
    /// A room's topic changed.
    RoomTopic {
        room_id: String,
        new_topic: String,
        old_topic: String,
        changer_id: String,
        #[serde(default)]
        timestamp_ms: Option<i64>,
    },
    /// A login QR code was issued or its scan state changed.
    Scan {
        qrcode: String,
        status: ScanStatus,
    },
    /// Periodic liveness signal from the client.
    Heartbeat { data: Value },
}

impl PuppetEvent {
    /// The kebab-case event name, identical to the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            PuppetEvent::Login { .. } => "login",
            PuppetEvent::Logout { .. } => "logout",
            PuppetEvent::Error { .. } => "error",
            PuppetEvent::Message { .. } => "message",
            PuppetEvent::Friendship { .. } => "friendship",
            PuppetEvent::RoomInvite { .. } => "room-invite",
            PuppetEvent::RoomJoin { .. } => "room-join",
            PuppetEvent::RoomLeave { .. } => "room-leave",
            PuppetEvent::RoomTopic { .. } => "room-topic",
            PuppetEvent::Scan { .. } => "scan",
            PuppetEvent::Heartbeat { .. } => "heartbeat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matches_serialized_tag() {
        let events = [
            PuppetEvent::Login { user_id: "u1".into() },
            PuppetEvent::Logout { user_id: "u1".into(), reason: None },
            PuppetEvent::Error { message: "boom".into() },
            PuppetEvent::Message { message_id: "m1".into() },
            PuppetEvent::Friendship { friendship_id: "f1".into() },
            PuppetEvent::RoomInvite { invitation_id: "i1".into() },
            PuppetEvent::RoomJoin {
                room_id: "r1".into(),
                invitee_ids: vec!["u2".into()],
                inviter_id: "u1".into(),
                timestamp_ms: None,
            },
            PuppetEvent::RoomLeave {
                room_id: "r1".into(),
                leaver_ids: vec!["u2".into()],
                operator_id: None,
                timestamp_ms: None,
            },
            PuppetEvent::RoomTopic {
                room_id: "r1".into(),
                new_topic: "new".into(),
                old_topic: "old".into(),
                changer_id: "u1".into(),
                timestamp_ms: None,
            },
            PuppetEvent::Scan {
                qrcode: "https://login.example/qr".into(),
                status: ScanStatus::Waiting,
            },
            PuppetEvent::Heartbeat { data: serde_json::json!({"beat": 1}) },
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.name(), "tag mismatch for {event:?}");
        }
    }

    #[test]
    fn scan_event_round_trips() {
        let event = PuppetEvent::Scan {
            qrcode: "qr-data".into(),
            status: ScanStatus::Scanned,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PuppetEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
