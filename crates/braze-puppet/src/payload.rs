//! Payload types exchanged with puppet implementations.
//!
//! Payloads are flat data records keyed by client-side ids. Follow-up detail
//! (a contact's avatar, a room's topic, a message's attachment) is fetched
//! through the corresponding [`Puppet`](crate::Puppet) call rather than
//! embedded here, mirroring how the underlying clients expose their data.

use serde::{Deserialize, Serialize};

/// A contact as the client reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub id: String,
    /// Display name.
    pub name: String,
}

impl ContactPayload {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A room (group conversation) as the client reports it.
///
/// The topic is intentionally absent: reading it may be a network round-trip
/// on the client side and goes through
/// [`Puppet::room_topic`](crate::Puppet::room_topic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPayload {
    pub id: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

impl RoomPayload {
    pub fn new(id: impl Into<String>, member_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            member_ids,
        }
    }
}

/// Numeric message type codes used by the client protocol.
///
/// The set is closed; codes outside it fold into `Unknown`, which downstream
/// translation drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MessageType {
    Unknown,
    Attachment,
    Audio,
    Contact,
    ChatHistory,
    Emoticon,
    Image,
    Text,
    Location,
    MiniProgram,
    GroupNote,
    Transfer,
    RedEnvelope,
    Recalled,
    Url,
    Video,
    Post,
}

impl From<u8> for MessageType {
    fn from(code: u8) -> Self {
        match code {
            1 => MessageType::Attachment,
            2 => MessageType::Audio,
            3 => MessageType::Contact,
            4 => MessageType::ChatHistory,
            5 => MessageType::Emoticon,
            6 => MessageType::Image,
            7 => MessageType::Text,
            8 => MessageType::Location,
            9 => MessageType::MiniProgram,
            10 => MessageType::GroupNote,
            11 => MessageType::Transfer,
            12 => MessageType::RedEnvelope,
            13 => MessageType::Recalled,
            14 => MessageType::Url,
            15 => MessageType::Video,
            16 => MessageType::Post,
            _ => MessageType::Unknown,
        }
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Unknown => 0,
            MessageType::Attachment => 1,
            MessageType::Audio => 2,
            MessageType::Contact => 3,
            MessageType::ChatHistory => 4,
            MessageType::Emoticon => 5,
            MessageType::Image => 6,
            MessageType::Text => 7,
            MessageType::Location => 8,
            MessageType::MiniProgram => 9,
            MessageType::GroupNote => 10,
            MessageType::Transfer => 11,
            MessageType::RedEnvelope => 12,
            MessageType::Recalled => 13,
            MessageType::Url => 14,
            MessageType::Video => 15,
            MessageType::Post => 16,
        }
    }
}

/// A message as the client reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: String,
    pub message_type: MessageType,
    /// Sender's contact id.
    pub talker_id: String,
    /// Room id for group messages, absent for one-to-one messages.
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Mentioned contact ids, in the order the client reports them.
    #[serde(default)]
    pub mention_ids: Vec<String>,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: i64,
}

/// Search filter for [`Puppet::message_search`](crate::Puppet::message_search).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageQuery {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub talker_id: Option<String>,
}

/// A shared hyperlink card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlLinkPayload {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Numeric friendship event codes used by the client protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum FriendshipType {
    Unknown,
    /// The peer confirmed the relationship (code 1).
    Confirm,
    /// An incoming friend request (code 2).
    Receive,
    /// The peer requires verification (code 3).
    Verify,
}

impl From<u8> for FriendshipType {
    fn from(code: u8) -> Self {
        match code {
            1 => FriendshipType::Confirm,
            2 => FriendshipType::Receive,
            3 => FriendshipType::Verify,
            _ => FriendshipType::Unknown,
        }
    }
}

impl From<FriendshipType> for u8 {
    fn from(value: FriendshipType) -> Self {
        match value {
            FriendshipType::Unknown => 0,
            FriendshipType::Confirm => 1,
            FriendshipType::Receive => 2,
            FriendshipType::Verify => 3,
        }
    }
}

/// A friendship event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendshipPayload {
    pub id: String,
    /// The contact on the other side of the relationship.
    pub contact_id: String,
    /// Greeting text attached to a request.
    #[serde(default)]
    pub hello: Option<String>,
    pub kind: FriendshipType,
}

/// A pending room invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInvitationPayload {
    pub id: String,
    pub inviter_id: String,
    /// Topic of the prospective room; the room id does not exist before the
    /// invitation is accepted.
    pub topic: String,
}

/// QR code scan status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ScanStatus {
    Unknown,
    Cancel,
    Waiting,
    Scanned,
    Confirmed,
    Timeout,
}

impl From<u8> for ScanStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => ScanStatus::Cancel,
            2 => ScanStatus::Waiting,
            3 => ScanStatus::Scanned,
            4 => ScanStatus::Confirmed,
            5 => ScanStatus::Timeout,
            _ => ScanStatus::Unknown,
        }
    }
}

impl From<ScanStatus> for u8 {
    fn from(value: ScanStatus) -> Self {
        match value {
            ScanStatus::Unknown => 0,
            ScanStatus::Cancel => 1,
            ScanStatus::Waiting => 2,
            ScanStatus::Scanned => 3,
            ScanStatus::Confirmed => 4,
            ScanStatus::Timeout => 5,
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ScanStatus::Unknown => "unknown",
            ScanStatus::Cancel => "cancel",
            ScanStatus::Waiting => "waiting",
            ScanStatus::Scanned => "scanned",
            ScanStatus::Confirmed => "confirmed",
            ScanStatus::Timeout => "timeout",
        };
        f.write_str(text)
    }
}
