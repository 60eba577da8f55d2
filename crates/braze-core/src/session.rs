//! Sparse session records dispatched into the host pipeline.
//!
//! A [`Session`] is built fresh for each triggering event and never mutated
//! after dispatch. Only the fields relevant to the event are set; everything
//! except the session type is optional and omitted from serialized output
//! when absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::Element;
use crate::entity::User;

/// The closed set of session types this layer emits.
///
/// Namespaced passthrough names (for example `wechat/scan`) are carried by
/// [`SessionType::Passthrough`]; conversion from a string is total, so parsing
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionType {
    Message,
    MessageSent,
    MessageDeleted,
    FriendRequest,
    FriendAdded,
    GuildRequest,
    GuildAdded,
    GuildMemberAdded,
    GuildDeleted,
    GuildMemberDeleted,
    /// A low-level event relayed verbatim under a namespaced name.
    Passthrough(String),
}

impl SessionType {
    /// Returns the wire string for this session type.
    pub fn as_str(&self) -> &str {
        match self {
            SessionType::Message => "message",
            SessionType::MessageSent => "message-sent",
            SessionType::MessageDeleted => "message-deleted",
            SessionType::FriendRequest => "friend-request",
            SessionType::FriendAdded => "friend-added",
            SessionType::GuildRequest => "guild-request",
            SessionType::GuildAdded => "guild-added",
            SessionType::GuildMemberAdded => "guild-member-added",
            SessionType::GuildDeleted => "guild-deleted",
            SessionType::GuildMemberDeleted => "guild-member-deleted",
            SessionType::Passthrough(name) => name,
        }
    }
}

impl From<String> for SessionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "message" => SessionType::Message,
            "message-sent" => SessionType::MessageSent,
            "message-deleted" => SessionType::MessageDeleted,
            "friend-request" => SessionType::FriendRequest,
            "friend-added" => SessionType::FriendAdded,
            "guild-request" => SessionType::GuildRequest,
            "guild-added" => SessionType::GuildAdded,
            "guild-member-added" => SessionType::GuildMemberAdded,
            "guild-deleted" => SessionType::GuildDeleted,
            "guild-member-deleted" => SessionType::GuildMemberDeleted,
            _ => SessionType::Passthrough(value),
        }
    }
}

impl From<SessionType> for String {
    fn from(value: SessionType) -> Self {
        match value {
            SessionType::Passthrough(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dispatched event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "type")]
    pub kind: SessionType,
    /// `group` / `private` on messages, `active` / `passive` on membership
    /// changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsubtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    /// Unix timestamp in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Original arguments of a passthrough event, unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Session {
    /// Creates an empty session of the given type.
    pub fn new(kind: SessionType) -> Self {
        Self {
            kind,
            subtype: None,
            subsubtype: None,
            platform: None,
            self_id: None,
            user_id: None,
            username: None,
            nickname: None,
            avatar: None,
            message_id: None,
            content: None,
            elements: None,
            channel_id: None,
            channel_name: None,
            guild_id: None,
            guild_name: None,
            operator_id: None,
            target_id: None,
            author: None,
            timestamp: None,
            data: None,
        }
    }

    /// Copies a user's identity fields into the session.
    pub fn with_user(mut self, user: &User) -> Self {
        self.user_id = Some(user.user_id.clone());
        self.username = user.username.clone();
        self.nickname = user.nickname.clone();
        self.avatar = user.avatar.clone();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_type_string_round_trip() {
        for (kind, text) in [
            (SessionType::Message, "message"),
            (SessionType::GuildMemberAdded, "guild-member-added"),
            (SessionType::FriendRequest, "friend-request"),
        ] {
            assert_eq!(kind.as_str(), text);
            assert_eq!(SessionType::from(text.to_string()), kind);
        }
    }

    #[test]
    fn unknown_session_type_becomes_passthrough() {
        let kind = SessionType::from("wechat/scan".to_string());
        assert_eq!(kind, SessionType::Passthrough("wechat/scan".into()));
        assert_eq!(kind.as_str(), "wechat/scan");
    }

    #[test]
    fn session_serializes_only_set_fields() {
        let session = Session {
            user_id: Some("u1".into()),
            channel_id: Some("private:u1".into()),
            timestamp: Some(1000),
            ..Session::new(SessionType::FriendAdded)
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "friend-added",
                "userId": "u1",
                "channelId": "private:u1",
                "timestamp": 1000,
            })
        );
    }

    #[test]
    fn with_user_copies_identity_fields() {
        let user = User {
            user_id: "u1".into(),
            username: Some("alice".into()),
            nickname: Some("alice".into()),
            avatar: None,
            is_bot: None,
        };
        let session = Session::new(SessionType::FriendRequest).with_user(&user);
        assert_eq!(session.user_id.as_deref(), Some("u1"));
        assert_eq!(session.username.as_deref(), Some("alice"));
        assert_eq!(session.avatar, None);
    }
}
