//! The host-facing bot implementation.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use parking_lot::RwLock;
use tracing::{debug, info, trace, warn};

use braze_core::{
    ApiError, ApiResult, Bot, BotStatus, Channel, Element, Guild, GuildMember, Message, User,
    parse_private_channel_id, private_channel_id,
};
use braze_puppet::{BoxedPuppet, MessageQuery, Puppet, PuppetError, Recipient, UrlLinkPayload};

use crate::PLATFORM;
use crate::adapt::{adapt_contact, adapt_message, adapt_room, file_box_for_url, lookup_user};
use crate::config::WechatConfig;

#[derive(Default)]
struct Identity {
    self_id: Option<String>,
    username: Option<String>,
    avatar: Option<String>,
    status: BotStatus,
    last_error: Option<String>,
}

/// [`Bot`] implementation over one puppet connection.
///
/// Identity fields are written only by the lifecycle events the bridge
/// forwards (login, logout, error) and read by the host at any time; the lock
/// is never held across an await.
pub struct WechatBot {
    config: WechatConfig,
    puppet: BoxedPuppet,
    identity: RwLock<Identity>,
}

impl WechatBot {
    pub(crate) fn new(config: WechatConfig, puppet: BoxedPuppet) -> Self {
        Self {
            config,
            puppet,
            identity: RwLock::new(Identity::default()),
        }
    }

    pub fn config(&self) -> &WechatConfig {
        &self.config
    }

    pub(crate) fn puppet(&self) -> &BoxedPuppet {
        &self.puppet
    }

    /// The error carried by the last offline transition, if any.
    pub fn last_error(&self) -> Option<String> {
        self.identity.read().last_error.clone()
    }

    pub(crate) fn mark_connecting(&self) {
        self.identity.write().status = BotStatus::Connecting;
    }

    pub(crate) fn mark_offline(&self) {
        self.identity.write().status = BotStatus::Offline;
    }

    pub(crate) async fn handle_login(&self, user_id: &str) {
        {
            let mut identity = self.identity.write();
            identity.self_id = Some(user_id.to_string());
            identity.status = BotStatus::Online;
            identity.last_error = None;
        }
        // Best effort: the client may not have the own-contact payload cached
        // yet this early in the login.
        match lookup_user(self.puppet.as_ref(), user_id).await {
            Ok(user) => {
                let mut identity = self.identity.write();
                identity.username = user.username;
                identity.avatar = user.avatar;
            }
            Err(error) => debug!(user_id, %error, "could not enrich login identity"),
        }
        info!(user_id, "logged in");
    }

    pub(crate) fn handle_logout(&self, user_id: &str, reason: Option<&str>) {
        self.identity.write().status = BotStatus::Offline;
        info!(user_id, reason = reason.unwrap_or(""), "logged out");
    }

    pub(crate) fn handle_error(&self, message: &str) {
        let mut identity = self.identity.write();
        identity.status = BotStatus::Offline;
        identity.last_error = Some(message.to_string());
        warn!(error = message, "client reported an error");
    }

    fn recipient_for(channel_id: &str) -> Recipient {
        match parse_private_channel_id(channel_id) {
            Some(user_id) => Recipient::Contact(user_id.to_string()),
            None => Recipient::Room(channel_id.to_string()),
        }
    }
}

fn client_error(error: PuppetError) -> ApiError {
    ApiError::client(error.to_string())
}

/// Sends the accumulated text run, if any, as one text message.
async fn flush_text(
    puppet: &dyn Puppet,
    recipient: &Recipient,
    text: &mut String,
    mentions: &mut Vec<String>,
    sent_ids: &mut Vec<String>,
) -> ApiResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    let id = puppet
        .message_send_text(recipient, text, mentions)
        .await
        .map_err(client_error)?;
    sent_ids.extend(id);
    text.clear();
    mentions.clear();
    Ok(())
}

#[async_trait]
impl Bot for WechatBot {
    fn platform(&self) -> &str {
        PLATFORM
    }

    fn self_id(&self) -> Option<String> {
        self.identity.read().self_id.clone()
    }

    fn username(&self) -> Option<String> {
        self.identity.read().username.clone()
    }

    fn avatar(&self) -> Option<String> {
        self.identity.read().avatar.clone()
    }

    fn status(&self) -> BotStatus {
        self.identity.read().status
    }

    async fn send_message(&self, channel_id: &str, elements: &[Element]) -> ApiResult<Vec<String>> {
        let recipient = Self::recipient_for(channel_id);
        let puppet = self.puppet.as_ref();
        let mut sent_ids = Vec::new();
        let mut text = String::new();
        let mut mentions: Vec<String> = Vec::new();

        for element in elements {
            match element {
                Element::Text { content } => text.push_str(content),
                Element::Mention { user_id, name } => {
                    text.push('@');
                    text.push_str(name.as_deref().unwrap_or(user_id));
                    text.push(' ');
                    mentions.push(user_id.clone());
                }
                Element::Image { url, name }
                | Element::Audio { url, name }
                | Element::Video { url, name }
                | Element::File { url, name } => {
                    flush_text(puppet, &recipient, &mut text, &mut mentions, &mut sent_ids).await?;
                    let file = file_box_for_url(url, name.as_deref());
                    let id = puppet
                        .message_send_file(&recipient, &file)
                        .await
                        .map_err(client_error)?;
                    sent_ids.extend(id);
                }
                Element::Link {
                    href,
                    title,
                    description,
                    thumbnail,
                } => {
                    flush_text(puppet, &recipient, &mut text, &mut mentions, &mut sent_ids).await?;
                    let link = UrlLinkPayload {
                        url: href.clone(),
                        title: title.clone(),
                        description: description.clone(),
                        thumbnail_url: thumbnail.clone(),
                    };
                    let id = puppet
                        .message_send_url(&recipient, &link)
                        .await
                        .map_err(client_error)?;
                    sent_ids.extend(id);
                }
                Element::ContactCard { id, .. } => {
                    flush_text(puppet, &recipient, &mut text, &mut mentions, &mut sent_ids).await?;
                    let sent = puppet
                        .message_send_contact(&recipient, id)
                        .await
                        .map_err(client_error)?;
                    sent_ids.extend(sent);
                }
            }
        }
        flush_text(puppet, &recipient, &mut text, &mut mentions, &mut sent_ids).await?;

        debug!(channel = channel_id, count = sent_ids.len(), "sent message");
        Ok(sent_ids)
    }

    async fn send_private_message(
        &self,
        user_id: &str,
        elements: &[Element],
    ) -> ApiResult<Vec<String>> {
        self.send_message(&private_channel_id(user_id), elements).await
    }

    async fn get_message(
        &self,
        _channel_id: &str,
        message_id: &str,
    ) -> ApiResult<Option<Message>> {
        let Some(payload) = self
            .puppet
            .message_payload(message_id)
            .await
            .map_err(client_error)?
        else {
            return Ok(None);
        };
        Ok(adapt_message(self.puppet.as_ref(), &payload).await)
    }

    async fn get_message_list(&self, channel_id: &str) -> ApiResult<Vec<Message>> {
        let query = match parse_private_channel_id(channel_id) {
            Some(user_id) => MessageQuery {
                room_id: None,
                talker_id: Some(user_id.to_string()),
            },
            None => MessageQuery {
                room_id: Some(channel_id.to_string()),
                talker_id: None,
            },
        };
        let ids = self
            .puppet
            .message_search(&query)
            .await
            .map_err(client_error)?;
        let mut messages = Vec::new();
        for id in ids {
            let Some(payload) = self
                .puppet
                .message_payload(&id)
                .await
                .map_err(client_error)?
            else {
                continue;
            };
            if let Some(message) = adapt_message(self.puppet.as_ref(), &payload).await {
                messages.push(message);
            }
        }
        Ok(messages)
    }

    async fn edit_message(
        &self,
        _channel_id: &str,
        message_id: &str,
        _elements: &[Element],
    ) -> ApiResult<()> {
        trace!(id = message_id, "edit_message ignored");
        Ok(())
    }

    async fn delete_message(&self, _channel_id: &str, message_id: &str) -> ApiResult<()> {
        trace!(id = message_id, "delete_message ignored");
        Ok(())
    }

    async fn get_self(&self) -> ApiResult<Option<User>> {
        let Some(self_id) = self.self_id() else {
            return Ok(None);
        };
        self.get_user(&self_id).await
    }

    async fn get_user(&self, user_id: &str) -> ApiResult<Option<User>> {
        let Some(contact) = self
            .puppet
            .contact_payload(user_id)
            .await
            .map_err(client_error)?
        else {
            return Ok(None);
        };
        Ok(Some(adapt_contact(self.puppet.as_ref(), &contact).await))
    }

    async fn get_friend_list(&self) -> ApiResult<Vec<User>> {
        let ids = self.puppet.contact_list().await.map_err(client_error)?;
        try_join_all(ids.iter().map(|id| lookup_user(self.puppet.as_ref(), id)))
            .await
            .map_err(client_error)
    }

    async fn delete_friend(&self, user_id: &str) -> ApiResult<()> {
        trace!(id = user_id, "delete_friend ignored");
        Ok(())
    }

    async fn get_guild(&self, guild_id: &str) -> ApiResult<Option<Guild>> {
        let Some(payload) = self
            .puppet
            .room_payload(guild_id)
            .await
            .map_err(client_error)?
        else {
            return Ok(None);
        };
        let (guild, _) = adapt_room(self.puppet.as_ref(), &payload)
            .await
            .map_err(client_error)?;
        Ok(Some(guild))
    }

    async fn get_guild_list(&self) -> ApiResult<Vec<Guild>> {
        let ids = self.puppet.room_list().await.map_err(client_error)?;
        let mut guilds = Vec::new();
        for id in ids {
            let Some(payload) = self
                .puppet
                .room_payload(&id)
                .await
                .map_err(client_error)?
            else {
                continue;
            };
            let (guild, _) = adapt_room(self.puppet.as_ref(), &payload)
                .await
                .map_err(client_error)?;
            guilds.push(guild);
        }
        Ok(guilds)
    }

    /// One channel per guild, same id: delegates to the guild lookup.
    async fn get_channel(&self, channel_id: &str) -> ApiResult<Option<Channel>> {
        Ok(self.get_guild(channel_id).await?.map(|guild| Channel {
            channel_id: guild.guild_id,
            channel_name: guild.guild_name,
        }))
    }

    async fn get_channel_list(&self, guild_id: &str) -> ApiResult<Vec<Channel>> {
        Ok(self.get_channel(guild_id).await?.into_iter().collect())
    }

    async fn mute_channel(
        &self,
        channel_id: &str,
        _guild_id: Option<&str>,
        _enable: bool,
    ) -> ApiResult<()> {
        trace!(id = channel_id, "mute_channel ignored");
        Ok(())
    }

    async fn get_guild_member(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> ApiResult<Option<GuildMember>> {
        let Some(room) = self
            .puppet
            .room_payload(guild_id)
            .await
            .map_err(client_error)?
        else {
            return Ok(None);
        };
        if !room.member_ids.iter().any(|id| id == user_id) {
            return Ok(None);
        }
        let Some(contact) = self
            .puppet
            .contact_payload(user_id)
            .await
            .map_err(client_error)?
        else {
            return Ok(None);
        };
        let user = adapt_contact(self.puppet.as_ref(), &contact).await;
        Ok(Some(GuildMember {
            name: user.nickname.clone(),
            user: Some(user),
        }))
    }

    async fn get_guild_member_list(&self, guild_id: &str) -> ApiResult<Vec<GuildMember>> {
        let Some(room) = self
            .puppet
            .room_payload(guild_id)
            .await
            .map_err(client_error)?
        else {
            return Ok(Vec::new());
        };
        let users = try_join_all(
            room.member_ids
                .iter()
                .map(|id| lookup_user(self.puppet.as_ref(), id)),
        )
        .await
        .map_err(client_error)?;
        Ok(users
            .into_iter()
            .map(|user| GuildMember {
                name: user.nickname.clone(),
                user: Some(user),
            })
            .collect())
    }

    async fn kick_guild_member(
        &self,
        _guild_id: &str,
        user_id: &str,
        _permanent: bool,
    ) -> ApiResult<()> {
        trace!(id = user_id, "kick_guild_member ignored");
        Ok(())
    }

    async fn mute_guild_member(
        &self,
        _guild_id: &str,
        user_id: &str,
        _duration_ms: i64,
    ) -> ApiResult<()> {
        trace!(id = user_id, "mute_guild_member ignored");
        Ok(())
    }

    async fn handle_friend_request(
        &self,
        message_id: &str,
        approve: bool,
        _comment: Option<&str>,
    ) -> ApiResult<()> {
        if approve {
            self.puppet
                .friendship_accept(message_id)
                .await
                .map_err(client_error)?;
        } else {
            // The client exposes no decline primitive.
            trace!(id = message_id, "friend request decline ignored");
        }
        Ok(())
    }

    async fn handle_guild_request(
        &self,
        message_id: &str,
        approve: bool,
        _comment: Option<&str>,
    ) -> ApiResult<()> {
        if approve {
            self.puppet
                .room_invitation_accept(message_id)
                .await
                .map_err(client_error)?;
        } else {
            trace!(id = message_id, "room invitation decline ignored");
        }
        Ok(())
    }

    async fn handle_guild_member_request(
        &self,
        message_id: &str,
        _approve: bool,
        _comment: Option<&str>,
    ) -> ApiResult<()> {
        trace!(id = message_id, "handle_guild_member_request ignored");
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
