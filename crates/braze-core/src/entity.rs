//! Universal entity shapes.
//!
//! Every adapter populates these platform-agnostic records when answering
//! host-side queries. Field names follow the host framework's camelCase wire
//! convention; absent optional fields are omitted from serialized output.

use serde::{Deserialize, Serialize};

use crate::element::{Element, render};

/// Channel-id prefix marking a one-to-one conversation.
///
/// A private channel id is the literal `"private:" + userId`; a group channel
/// id is the bare room id. Consumers parse the prefix symmetrically with
/// [`private_channel_id`] and [`parse_private_channel_id`].
pub const PRIVATE_PREFIX: &str = "private:";

/// Builds the channel id for a one-to-one conversation with `user_id`.
pub fn private_channel_id(user_id: &str) -> String {
    format!("{PRIVATE_PREFIX}{user_id}")
}

/// Recovers the user id from a private channel id, or `None` for group ids.
pub fn parse_private_channel_id(channel_id: &str) -> Option<&str> {
    channel_id.strip_prefix(PRIVATE_PREFIX)
}

/// A platform user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Fully resolved remote URL or base64 data URL, never a binary handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<bool>,
}

impl User {
    /// Creates a user with only the id set.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// A guild. Adapters for platforms without a guild concept model each group
/// conversation as one guild holding one channel of the same id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    pub guild_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_name: Option<String>,
}

/// A channel inside a guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

/// A guild member: the member's user record plus any guild-local name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Message subtype for one-to-one conversations.
pub const SUBTYPE_PRIVATE: &str = "private";
/// Message subtype for group conversations.
pub const SUBTYPE_GROUP: &str = "group";

/// A universal message.
///
/// `content` is the flattened string rendering of `elements`; `channel_id`
/// follows the [`PRIVATE_PREFIX`] convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub user_id: String,
    pub author: User,
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    /// [`SUBTYPE_GROUP`] or [`SUBTYPE_PRIVATE`].
    pub subtype: String,
    pub elements: Vec<Element>,
    pub content: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

impl Message {
    /// Recomputes `content` from `elements`.
    pub fn rendered(mut self) -> Self {
        self.content = render(&self.elements);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_channel_id_round_trip() {
        let channel = private_channel_id("u-42");
        assert_eq!(channel, "private:u-42");
        assert_eq!(parse_private_channel_id(&channel), Some("u-42"));
        assert_eq!(parse_private_channel_id("room-1"), None);
    }

    #[test]
    fn user_serializes_sparse_camel_case() {
        let user = User {
            user_id: "u1".into(),
            username: Some("alice".into()),
            ..User::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "userId": "u1", "username": "alice" })
        );
    }

    #[test]
    fn message_renders_content_from_elements() {
        let message = Message {
            message_id: "m1".into(),
            user_id: "u1".into(),
            author: User::new("u1"),
            channel_id: "room-1".into(),
            guild_id: Some("room-1".into()),
            subtype: SUBTYPE_GROUP.into(),
            elements: vec![Element::text("hello")],
            content: String::new(),
            timestamp: 0,
        }
        .rendered();
        assert_eq!(message.content, "hello");
    }
}
