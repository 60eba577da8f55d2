//! Bot trait and related types.
//!
//! A [`Bot`] is the host framework's view of one live platform connection.
//! The trait carries the full operation surface; every operation has a
//! default body returning [`ApiError::Unsupported`], so an adapter implements
//! exactly the operations its platform can serve and intentionally overrides
//! the rest (for example as silent no-ops) where the platform contract calls
//! for it.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::Element;
use crate::entity::{Channel, Guild, GuildMember, Message, User};

/// Connection lifecycle of a bot.
///
/// Transitions are driven entirely by the platform client's lifecycle events:
/// `Disconnected → Connecting → Online → Offline`. Error transitions land on
/// `Offline` with the error recorded by the adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BotStatus {
    #[default]
    Disconnected,
    Connecting,
    Online,
    Offline,
}

impl BotStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, BotStatus::Online)
    }
}

impl std::fmt::Display for BotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BotStatus::Disconnected => "disconnected",
            BotStatus::Connecting => "connecting",
            BotStatus::Online => "online",
            BotStatus::Offline => "offline",
        };
        f.write_str(text)
    }
}

/// Result type for bot operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type for bot operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bot is not connected.
    #[error("bot is not connected")]
    NotConnected,

    /// The operation exists in the contract but the platform cannot serve it.
    #[error("operation `{operation}` is not supported on this platform")]
    Unsupported { operation: &'static str },

    /// An underlying client call failed.
    #[error("client call failed: {reason}")]
    Client { reason: String },

    /// Failed to serialize or deserialize a payload.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn unsupported(operation: &'static str) -> Self {
        ApiError::Unsupported { operation }
    }

    pub fn client(reason: impl Into<String>) -> Self {
        ApiError::Client {
            reason: reason.into(),
        }
    }
}

/// The host framework's bot contract.
///
/// Lookup operations answer "entity does not exist" with `Ok(None)` or an
/// empty list, never with an error. Identity accessors are synchronous reads
/// of state the adapter maintains from lifecycle events.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Returns the platform name (e.g. "wechat").
    fn platform(&self) -> &str;

    /// Returns the logged-in account id, if any.
    fn self_id(&self) -> Option<String>;

    /// Returns the logged-in account's display name, if known.
    fn username(&self) -> Option<String>;

    /// Returns the logged-in account's avatar URL, if known.
    fn avatar(&self) -> Option<String>;

    /// Returns the current connection status.
    fn status(&self) -> BotStatus;

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Sends elements to a channel, returning the ids of the sent messages.
    async fn send_message(
        &self,
        _channel_id: &str,
        _elements: &[Element],
    ) -> ApiResult<Vec<String>> {
        Err(ApiError::unsupported("send_message"))
    }

    /// Sends elements to a user's private channel.
    async fn send_private_message(
        &self,
        _user_id: &str,
        _elements: &[Element],
    ) -> ApiResult<Vec<String>> {
        Err(ApiError::unsupported("send_private_message"))
    }

    async fn get_message(
        &self,
        _channel_id: &str,
        _message_id: &str,
    ) -> ApiResult<Option<Message>> {
        Err(ApiError::unsupported("get_message"))
    }

    async fn get_message_list(&self, _channel_id: &str) -> ApiResult<Vec<Message>> {
        Err(ApiError::unsupported("get_message_list"))
    }

    async fn edit_message(
        &self,
        _channel_id: &str,
        _message_id: &str,
        _elements: &[Element],
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("edit_message"))
    }

    async fn delete_message(&self, _channel_id: &str, _message_id: &str) -> ApiResult<()> {
        Err(ApiError::unsupported("delete_message"))
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    async fn get_self(&self) -> ApiResult<Option<User>> {
        Err(ApiError::unsupported("get_self"))
    }

    async fn get_user(&self, _user_id: &str) -> ApiResult<Option<User>> {
        Err(ApiError::unsupported("get_user"))
    }

    async fn get_friend_list(&self) -> ApiResult<Vec<User>> {
        Err(ApiError::unsupported("get_friend_list"))
    }

    async fn delete_friend(&self, _user_id: &str) -> ApiResult<()> {
        Err(ApiError::unsupported("delete_friend"))
    }

    // ------------------------------------------------------------------
    // Guilds and channels
    // ------------------------------------------------------------------

    async fn get_guild(&self, _guild_id: &str) -> ApiResult<Option<Guild>> {
        Err(ApiError::unsupported("get_guild"))
    }

    async fn get_guild_list(&self) -> ApiResult<Vec<Guild>> {
        Err(ApiError::unsupported("get_guild_list"))
    }

    async fn get_channel(&self, _channel_id: &str) -> ApiResult<Option<Channel>> {
        Err(ApiError::unsupported("get_channel"))
    }

    async fn get_channel_list(&self, _guild_id: &str) -> ApiResult<Vec<Channel>> {
        Err(ApiError::unsupported("get_channel_list"))
    }

    async fn mute_channel(
        &self,
        _channel_id: &str,
        _guild_id: Option<&str>,
        _enable: bool,
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("mute_channel"))
    }

    // ------------------------------------------------------------------
    // Guild members
    // ------------------------------------------------------------------

    async fn get_guild_member(
        &self,
        _guild_id: &str,
        _user_id: &str,
    ) -> ApiResult<Option<GuildMember>> {
        Err(ApiError::unsupported("get_guild_member"))
    }

    async fn get_guild_member_list(&self, _guild_id: &str) -> ApiResult<Vec<GuildMember>> {
        Err(ApiError::unsupported("get_guild_member_list"))
    }

    async fn kick_guild_member(
        &self,
        _guild_id: &str,
        _user_id: &str,
        _permanent: bool,
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("kick_guild_member"))
    }

    async fn mute_guild_member(
        &self,
        _guild_id: &str,
        _user_id: &str,
        _duration_ms: i64,
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("mute_guild_member"))
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Handles a pending friend request, keyed by the id the corresponding
    /// `friend-request` session carried as `messageId`.
    async fn handle_friend_request(
        &self,
        _message_id: &str,
        _approve: bool,
        _comment: Option<&str>,
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("handle_friend_request"))
    }

    /// Handles a pending guild join request, keyed by the id the
    /// corresponding `guild-request` session carried as `messageId`.
    async fn handle_guild_request(
        &self,
        _message_id: &str,
        _approve: bool,
        _comment: Option<&str>,
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("handle_guild_request"))
    }

    async fn handle_guild_member_request(
        &self,
        _message_id: &str,
        _approve: bool,
        _comment: Option<&str>,
    ) -> ApiResult<()> {
        Err(ApiError::unsupported("handle_guild_member_request"))
    }

    /// Returns self as an `Arc<dyn Any>` for safe downcasting.
    ///
    /// Implementors should simply return `self`.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A boxed bot trait object.
pub type BoxedBot = Arc<dyn Bot>;

/// Attempts to downcast a [`BoxedBot`] to a concrete bot type, giving access
/// to platform-specific methods.
pub fn downcast_bot<T: Bot + 'static>(bot: BoxedBot) -> Option<Arc<T>> {
    let any_arc = bot.as_any();
    Arc::downcast::<T>(any_arc).ok()
}
