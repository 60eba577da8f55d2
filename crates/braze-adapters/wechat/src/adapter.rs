//! Adapter lifecycle and the puppet-to-session event bridge.
//!
//! [`WechatAdapter`] owns one puppet connection and one [`WechatBot`]. While
//! started, a pump task drains the puppet's event bus and turns each event
//! into zero or more [`Session`]s, which it hands to the dispatcher.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::try_join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use braze_core::{Bot, BoxedBot, Dispatcher, Message, Session, SessionType, private_channel_id};
use braze_puppet::{
    BoxedPuppet, FriendshipType, MessageType, Puppet, PuppetEvent, PuppetRegistry, PuppetResult,
    Subscription,
};

use crate::PLATFORM;
use crate::adapt::{adapt_message, lookup_user};
use crate::bot::WechatBot;
use crate::config::WechatConfig;

/// Low-level events relayed to handlers as namespaced passthrough sessions
/// instead of (or in addition to) a typed session.
pub const PASSTHROUGH_EVENTS: [&str; 4] = ["scan", "room-topic", "heartbeat", "error"];

/// One adapter instance per account.
pub struct WechatAdapter {
    bot: Arc<WechatBot>,
    dispatcher: Arc<Dispatcher>,
    shutdown: CancellationToken,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl WechatAdapter {
    pub fn new(config: WechatConfig, puppet: BoxedPuppet, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            bot: Arc::new(WechatBot::new(config, puppet)),
            dispatcher,
            shutdown: CancellationToken::new(),
            pump: Mutex::new(None),
        }
    }

    /// Builds the adapter with a puppet created from `config.puppet` through
    /// the registry.
    pub fn from_registry(
        config: WechatConfig,
        registry: &PuppetRegistry,
        dispatcher: Arc<Dispatcher>,
    ) -> PuppetResult<Self> {
        let puppet = registry.create(&config.puppet, config.puppet_options.clone())?;
        Ok(Self::new(config, puppet, dispatcher))
    }

    pub fn bot(&self) -> Arc<WechatBot> {
        self.bot.clone()
    }

    pub(crate) fn bridge(&self) -> EventBridge {
        EventBridge {
            bot: self.bot.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }

    /// Subscribes to the puppet's events and connects it.
    ///
    /// The pump is spawned before the client starts so that nothing emitted
    /// during the connection handshake is lost.
    pub async fn start(&self) -> PuppetResult<()> {
        self.bot.mark_connecting();
        let subscription = self.bot.puppet().event_bus().subscribe();
        let handle = tokio::spawn(self.bridge().pump(subscription, self.shutdown.clone()));
        *self.pump.lock() = Some(handle);

        info!(
            name = %self.bot.config().name,
            puppet = self.bot.puppet().name(),
            "starting adapter"
        );
        if let Err(error) = self.bot.puppet().start().await {
            self.shutdown.cancel();
            self.bot.mark_offline();
            return Err(error);
        }
        Ok(())
    }

    /// Stops the pump, disconnects the puppet and marks the bot offline.
    pub async fn stop(&self) -> PuppetResult<()> {
        self.shutdown.cancel();
        let pump = self.pump.lock().take();
        if let Some(handle) = pump {
            if let Err(error) = handle.await {
                warn!(%error, "event pump did not shut down cleanly");
            }
        }
        self.bot.puppet().stop().await?;
        self.bot.mark_offline();
        info!(name = %self.bot.config().name, "adapter stopped");
        Ok(())
    }
}

/// The translation half of the adapter, clonable into the pump task.
pub(crate) struct EventBridge {
    bot: Arc<WechatBot>,
    dispatcher: Arc<Dispatcher>,
}

impl EventBridge {
    pub(crate) async fn pump(self, mut subscription: Subscription, shutdown: CancellationToken) {
        debug!("event pump running");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                event = subscription.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
            }
        }
        subscription.unsubscribe();
        debug!("event pump finished");
    }

    /// Translates one event and dispatches every resulting session.
    ///
    /// The arrival time is captured first so that all sessions fanned out
    /// from one event share the same fallback timestamp.
    pub(crate) async fn handle_event(&self, event: PuppetEvent) {
        let received_at = now_ms();
        let mut sessions = match self.build_sessions(&event).await {
            Ok(sessions) => sessions,
            Err(error) => {
                warn!(event = event.name(), %error, "failed to translate event");
                Vec::new()
            }
        };
        if let Some(session) = passthrough_session(&event) {
            sessions.push(session);
        }
        let bot: BoxedBot = self.bot.clone();
        for mut session in sessions {
            self.finalize_session(&mut session, received_at);
            self.dispatcher.dispatch(&session, &bot).await;
        }
    }

    fn finalize_session(&self, session: &mut Session, received_at: i64) {
        session.timestamp.get_or_insert(received_at);
        session.platform.get_or_insert_with(|| PLATFORM.to_string());
        if session.self_id.is_none() {
            session.self_id = self.bot.self_id();
        }
    }

    async fn build_sessions(&self, event: &PuppetEvent) -> PuppetResult<Vec<Session>> {
        match event {
            PuppetEvent::Login { user_id } => {
                self.bot.handle_login(user_id).await;
                Ok(Vec::new())
            }
            PuppetEvent::Logout { user_id, reason } => {
                self.bot.handle_logout(user_id, reason.as_deref());
                Ok(Vec::new())
            }
            PuppetEvent::Error { message } => {
                self.bot.handle_error(message);
                Ok(Vec::new())
            }
            PuppetEvent::Scan { qrcode, status } => {
                info!(%status, qrcode = qrcode.as_str(), "scan status changed");
                Ok(Vec::new())
            }
            PuppetEvent::Heartbeat { .. } | PuppetEvent::RoomTopic { .. } => {
                trace!(event = event.name(), "relayed as passthrough only");
                Ok(Vec::new())
            }
            PuppetEvent::Message { message_id } => self.build_message(message_id).await,
            PuppetEvent::Friendship { friendship_id } => {
                self.build_friendship(friendship_id).await
            }
            PuppetEvent::RoomInvite { invitation_id } => {
                self.build_room_invite(invitation_id).await
            }
            PuppetEvent::RoomJoin {
                room_id,
                invitee_ids,
                inviter_id,
                timestamp_ms,
            } => {
                self.build_room_join(room_id, invitee_ids, inviter_id, *timestamp_ms)
                    .await
            }
            PuppetEvent::RoomLeave {
                room_id,
                leaver_ids,
                operator_id,
                timestamp_ms,
            } => {
                self.build_room_leave(room_id, leaver_ids, operator_id.as_deref(), *timestamp_ms)
                    .await
            }
        }
    }

    async fn build_message(&self, message_id: &str) -> PuppetResult<Vec<Session>> {
        let puppet = self.bot.puppet();
        let Some(payload) = puppet.message_payload(message_id).await? else {
            debug!(id = message_id, "message payload missing");
            return Ok(Vec::new());
        };
        let Some(message) = adapt_message(puppet.as_ref(), &payload).await else {
            debug!(
                id = message_id,
                kind = u8::from(payload.message_type),
                "message not translatable"
            );
            return Ok(Vec::new());
        };

        let kind = if payload.message_type == MessageType::Recalled {
            SessionType::MessageDeleted
        } else if self.bot.self_id().as_deref() == Some(message.user_id.as_str()) {
            SessionType::MessageSent
        } else {
            SessionType::Message
        };
        let Message {
            message_id,
            author,
            channel_id,
            guild_id,
            subtype,
            elements,
            content,
            timestamp,
            ..
        } = message;
        let session = Session {
            subtype: Some(subtype.clone()),
            subsubtype: Some(subtype),
            message_id: Some(message_id),
            content: Some(content),
            elements: Some(elements),
            channel_id: Some(channel_id),
            guild_id,
            timestamp: Some(timestamp),
            author: Some(author.clone()),
            ..Session::new(kind).with_user(&author)
        };
        Ok(vec![session])
    }

    async fn build_friendship(&self, friendship_id: &str) -> PuppetResult<Vec<Session>> {
        let puppet = self.bot.puppet();
        let Some(payload) = puppet.friendship_payload(friendship_id).await? else {
            debug!(id = friendship_id, "friendship payload missing");
            return Ok(Vec::new());
        };
        let kind = match payload.kind {
            FriendshipType::Receive => SessionType::FriendRequest,
            FriendshipType::Confirm => SessionType::FriendAdded,
            other => {
                debug!(
                    id = friendship_id,
                    kind = u8::from(other),
                    "friendship type not dispatched"
                );
                return Ok(Vec::new());
            }
        };
        let user = lookup_user(puppet.as_ref(), &payload.contact_id).await?;
        let session = Session {
            message_id: Some(payload.id),
            content: payload.hello,
            channel_id: Some(private_channel_id(&payload.contact_id)),
            ..Session::new(kind).with_user(&user)
        };
        Ok(vec![session])
    }

    async fn build_room_invite(&self, invitation_id: &str) -> PuppetResult<Vec<Session>> {
        let puppet = self.bot.puppet();
        let Some(payload) = puppet.room_invitation_payload(invitation_id).await? else {
            debug!(id = invitation_id, "room invitation payload missing");
            return Ok(Vec::new());
        };
        let inviter = lookup_user(puppet.as_ref(), &payload.inviter_id).await?;
        // The room does not exist yet, so the topic stands in for every
        // scope id until the invitation is accepted.
        let session = Session {
            message_id: Some(payload.id),
            channel_id: Some(payload.topic.clone()),
            channel_name: Some(payload.topic.clone()),
            guild_id: Some(payload.topic.clone()),
            guild_name: Some(payload.topic),
            ..Session::new(SessionType::GuildRequest).with_user(&inviter)
        };
        Ok(vec![session])
    }

    async fn build_room_join(
        &self,
        room_id: &str,
        invitee_ids: &[String],
        inviter_id: &str,
        timestamp_ms: Option<i64>,
    ) -> PuppetResult<Vec<Session>> {
        let puppet = self.bot.puppet();
        let self_id = self.bot.self_id();
        let users = try_join_all(
            invitee_ids
                .iter()
                .map(|id| lookup_user(puppet.as_ref(), id)),
        )
        .await?;
        let sessions = invitee_ids
            .iter()
            .zip(users)
            .map(|(invitee_id, user)| {
                let kind = if self_id.as_deref() == Some(invitee_id.as_str()) {
                    SessionType::GuildAdded
                } else {
                    SessionType::GuildMemberAdded
                };
                let subtype = if invitee_id == inviter_id { "active" } else { "passive" };
                Session {
                    subtype: Some(subtype.to_string()),
                    channel_id: Some(room_id.to_string()),
                    guild_id: Some(room_id.to_string()),
                    operator_id: Some(inviter_id.to_string()),
                    target_id: Some(invitee_id.clone()),
                    timestamp: timestamp_ms,
                    ..Session::new(kind).with_user(&user)
                }
            })
            .collect();
        Ok(sessions)
    }

    async fn build_room_leave(
        &self,
        room_id: &str,
        leaver_ids: &[String],
        operator_id: Option<&str>,
        timestamp_ms: Option<i64>,
    ) -> PuppetResult<Vec<Session>> {
        let puppet = self.bot.puppet();
        let self_id = self.bot.self_id();
        let users = try_join_all(
            leaver_ids
                .iter()
                .map(|id| lookup_user(puppet.as_ref(), id)),
        )
        .await?;
        let sessions = leaver_ids
            .iter()
            .zip(users)
            .map(|(leaver_id, user)| {
                let kind = if self_id.as_deref() == Some(leaver_id.as_str()) {
                    SessionType::GuildDeleted
                } else {
                    SessionType::GuildMemberDeleted
                };
                let active = operator_id.is_none_or(|id| id == leaver_id.as_str());
                let subtype = if active { "active" } else { "passive" };
                Session {
                    subtype: Some(subtype.to_string()),
                    channel_id: Some(room_id.to_string()),
                    guild_id: Some(room_id.to_string()),
                    operator_id: operator_id.map(str::to_string),
                    target_id: Some(leaver_id.clone()),
                    timestamp: timestamp_ms,
                    ..Session::new(kind).with_user(&user)
                }
            })
            .collect();
        Ok(sessions)
    }
}

/// Wraps a low-level event into a `wechat/<name>` session carrying the
/// event's own fields, minus the tag, under `data`.
fn passthrough_session(event: &PuppetEvent) -> Option<Session> {
    let name = event.name();
    if !PASSTHROUGH_EVENTS.contains(&name) {
        return None;
    }
    let mut data = serde_json::to_value(event).ok()?;
    if let Some(fields) = data.as_object_mut() {
        fields.remove("type");
    }
    Some(Session {
        data: Some(data),
        ..Session::new(SessionType::Passthrough(format!("{PLATFORM}/{name}")))
    })
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use braze_core::BotStatus;
    use braze_puppet::{
        ContactPayload, FriendshipPayload, MessagePayload, RoomInvitationPayload, ScanStatus,
    };
    use braze_puppet_mock::MockPuppet;

    #[derive(Default)]
    struct RecordingHandler {
        sessions: Mutex<Vec<Session>>,
    }

    impl RecordingHandler {
        fn recorded(&self) -> Vec<Session> {
            self.sessions.lock().clone()
        }
    }

    #[async_trait]
    impl braze_core::SessionHandler for RecordingHandler {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn handle(&self, session: &Session, _bot: &BoxedBot) {
            self.sessions.lock().push(session.clone());
        }
    }

    struct Fixture {
        adapter: WechatAdapter,
        puppet: Arc<MockPuppet>,
        handler: Arc<RecordingHandler>,
    }

    fn fixture() -> Fixture {
        let puppet = Arc::new(MockPuppet::new());
        let handler = Arc::new(RecordingHandler::default());
        let dispatcher = Arc::new(Dispatcher::new().with(handler.clone()));
        let adapter = WechatAdapter::new(WechatConfig::new("test"), puppet.clone(), dispatcher);
        Fixture { adapter, puppet, handler }
    }

    fn message_payload(id: &str, kind: MessageType, room: Option<&str>) -> MessagePayload {
        MessagePayload {
            id: id.into(),
            message_type: kind,
            talker_id: "u1".into(),
            room_id: room.map(Into::into),
            text: Some("hello".into()),
            mention_ids: Vec::new(),
            timestamp_ms: 5000,
        }
    }

    async fn login(fixture: &Fixture, self_id: &str) {
        fixture
            .adapter
            .bridge()
            .handle_event(PuppetEvent::Login { user_id: self_id.into() })
            .await;
    }

    #[tokio::test]
    async fn login_and_logout_drive_bot_status_without_sessions() {
        let f = fixture();
        login(&f, "self-1").await;
        assert_eq!(f.adapter.bot().status(), BotStatus::Online);
        assert_eq!(f.adapter.bot().self_id().as_deref(), Some("self-1"));

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Logout {
                user_id: "self-1".into(),
                reason: Some("kicked".into()),
            })
            .await;
        assert_eq!(f.adapter.bot().status(), BotStatus::Offline);
        assert!(f.handler.recorded().is_empty());
    }

    #[tokio::test]
    async fn group_message_becomes_a_message_session() {
        let f = fixture();
        f.puppet.put_contact(ContactPayload::new("u1", "Ada"));
        f.puppet
            .put_message(message_payload("m1", MessageType::Text, Some("room-1")));
        login(&f, "self-1").await;

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Message { message_id: "m1".into() })
            .await;

        let sessions = f.handler.recorded();
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.kind, SessionType::Message);
        assert_eq!(session.subtype.as_deref(), Some("group"));
        assert_eq!(session.subsubtype.as_deref(), Some("group"));
        assert_eq!(session.channel_id.as_deref(), Some("room-1"));
        assert_eq!(session.guild_id.as_deref(), Some("room-1"));
        assert_eq!(session.user_id.as_deref(), Some("u1"));
        assert_eq!(session.nickname.as_deref(), Some("Ada"));
        assert_eq!(session.content.as_deref(), Some("hello"));
        assert_eq!(session.timestamp, Some(5000));
        assert_eq!(session.platform.as_deref(), Some("wechat"));
        assert_eq!(session.self_id.as_deref(), Some("self-1"));
        assert_eq!(
            session.author.as_ref().map(|a| a.user_id.as_str()),
            Some("u1")
        );
    }

    #[tokio::test]
    async fn direct_message_uses_the_private_channel() {
        let f = fixture();
        f.puppet
            .put_message(message_payload("m1", MessageType::Text, None));

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Message { message_id: "m1".into() })
            .await;

        let sessions = f.handler.recorded();
        assert_eq!(sessions[0].subtype.as_deref(), Some("private"));
        assert_eq!(sessions[0].channel_id.as_deref(), Some("private:u1"));
        assert_eq!(sessions[0].guild_id, None);
    }

    #[tokio::test]
    async fn own_message_dispatches_as_message_sent() {
        let f = fixture();
        login(&f, "u1").await;
        f.puppet
            .put_message(message_payload("m1", MessageType::Text, Some("room-1")));

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Message { message_id: "m1".into() })
            .await;

        assert_eq!(f.handler.recorded()[0].kind, SessionType::MessageSent);
    }

    #[tokio::test]
    async fn recalled_message_dispatches_as_message_deleted() {
        let f = fixture();
        f.puppet
            .put_message(message_payload("m1", MessageType::Recalled, Some("room-1")));

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Message { message_id: "m1".into() })
            .await;

        let sessions = f.handler.recorded();
        assert_eq!(sessions[0].kind, SessionType::MessageDeleted);
        assert_eq!(sessions[0].elements.as_deref(), Some(&[][..]));
    }

    #[tokio::test]
    async fn untranslatable_messages_dispatch_nothing() {
        let f = fixture();
        f.puppet
            .put_message(message_payload("m1", MessageType::MiniProgram, None));

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Message { message_id: "m1".into() })
            .await;
        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Message { message_id: "m404".into() })
            .await;

        assert!(f.handler.recorded().is_empty());
    }

    #[tokio::test]
    async fn friendship_sessions_follow_the_relationship_kind() {
        let f = fixture();
        f.puppet.put_contact(ContactPayload::new("u2", "Bob"));
        f.puppet.put_friendship(FriendshipPayload {
            id: "f1".into(),
            contact_id: "u2".into(),
            hello: Some("hi, add me".into()),
            kind: FriendshipType::Receive,
        });
        f.puppet.put_friendship(FriendshipPayload {
            id: "f2".into(),
            contact_id: "u2".into(),
            hello: None,
            kind: FriendshipType::Confirm,
        });
        f.puppet.put_friendship(FriendshipPayload {
            id: "f3".into(),
            contact_id: "u2".into(),
            hello: None,
            kind: FriendshipType::Verify,
        });

        for id in ["f1", "f2", "f3"] {
            f.adapter
                .bridge()
                .handle_event(PuppetEvent::Friendship { friendship_id: id.into() })
                .await;
        }

        let sessions = f.handler.recorded();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].kind, SessionType::FriendRequest);
        assert_eq!(sessions[0].message_id.as_deref(), Some("f1"));
        assert_eq!(sessions[0].content.as_deref(), Some("hi, add me"));
        assert_eq!(sessions[0].channel_id.as_deref(), Some("private:u2"));
        assert_eq!(sessions[0].nickname.as_deref(), Some("Bob"));
        assert_eq!(sessions[1].kind, SessionType::FriendAdded);
        assert_eq!(sessions[1].content, None);
    }

    #[tokio::test]
    async fn room_invitation_fills_every_scope_field_with_the_topic() {
        let f = fixture();
        f.puppet.put_contact(ContactPayload::new("u2", "Bob"));
        f.puppet.put_invitation(RoomInvitationPayload {
            id: "i1".into(),
            inviter_id: "u2".into(),
            topic: "rustaceans".into(),
        });

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::RoomInvite { invitation_id: "i1".into() })
            .await;

        let sessions = f.handler.recorded();
        let session = &sessions[0];
        assert_eq!(session.kind, SessionType::GuildRequest);
        assert_eq!(session.message_id.as_deref(), Some("i1"));
        assert_eq!(session.channel_id.as_deref(), Some("rustaceans"));
        assert_eq!(session.channel_name.as_deref(), Some("rustaceans"));
        assert_eq!(session.guild_id.as_deref(), Some("rustaceans"));
        assert_eq!(session.guild_name.as_deref(), Some("rustaceans"));
        assert_eq!(session.user_id.as_deref(), Some("u2"));
    }

    #[tokio::test]
    async fn room_join_fans_out_one_session_per_invitee() {
        let f = fixture();
        login(&f, "self-1").await;

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::RoomJoin {
                room_id: "room-1".into(),
                invitee_ids: vec!["u2".into(), "self-1".into(), "u3".into()],
                inviter_id: "u2".into(),
                timestamp_ms: None,
            })
            .await;

        let sessions = f.handler.recorded();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].kind, SessionType::GuildMemberAdded);
        assert_eq!(sessions[0].subtype.as_deref(), Some("active"));
        assert_eq!(sessions[0].target_id.as_deref(), Some("u2"));
        assert_eq!(sessions[1].kind, SessionType::GuildAdded);
        assert_eq!(sessions[1].subtype.as_deref(), Some("passive"));
        assert_eq!(sessions[2].kind, SessionType::GuildMemberAdded);
        assert_eq!(sessions[2].subtype.as_deref(), Some("passive"));
        for session in &sessions {
            assert_eq!(session.channel_id.as_deref(), Some("room-1"));
            assert_eq!(session.guild_id.as_deref(), Some("room-1"));
            assert_eq!(session.operator_id.as_deref(), Some("u2"));
            // Fallback timestamps come from one shared capture.
            assert_eq!(session.timestamp, sessions[0].timestamp);
        }
    }

    #[tokio::test]
    async fn room_leave_subtype_follows_the_operator() {
        let f = fixture();
        login(&f, "self-1").await;

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::RoomLeave {
                room_id: "room-1".into(),
                leaver_ids: vec!["u2".into()],
                operator_id: None,
                timestamp_ms: Some(9000),
            })
            .await;
        f.adapter
            .bridge()
            .handle_event(PuppetEvent::RoomLeave {
                room_id: "room-1".into(),
                leaver_ids: vec!["self-1".into(), "u3".into()],
                operator_id: Some("u9".into()),
                timestamp_ms: Some(9001),
            })
            .await;

        let sessions = f.handler.recorded();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].kind, SessionType::GuildMemberDeleted);
        assert_eq!(sessions[0].subtype.as_deref(), Some("active"));
        assert_eq!(sessions[0].operator_id, None);
        assert_eq!(sessions[0].timestamp, Some(9000));
        assert_eq!(sessions[1].kind, SessionType::GuildDeleted);
        assert_eq!(sessions[1].subtype.as_deref(), Some("passive"));
        assert_eq!(sessions[1].operator_id.as_deref(), Some("u9"));
        assert_eq!(sessions[2].kind, SessionType::GuildMemberDeleted);
        assert_eq!(sessions[2].target_id.as_deref(), Some("u3"));
    }

    #[tokio::test]
    async fn passthrough_events_keep_their_arguments() {
        let f = fixture();
        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Scan {
                qrcode: "https://login.example/qr".into(),
                status: ScanStatus::Waiting,
            })
            .await;
        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Heartbeat { data: json!({"beat": 1}) })
            .await;
        f.adapter
            .bridge()
            .handle_event(PuppetEvent::RoomTopic {
                room_id: "room-1".into(),
                new_topic: "new".into(),
                old_topic: "old".into(),
                changer_id: "u2".into(),
                timestamp_ms: Some(7),
            })
            .await;

        let sessions = f.handler.recorded();
        assert_eq!(sessions.len(), 3);
        assert_eq!(
            sessions[0].kind,
            SessionType::Passthrough("wechat/scan".into())
        );
        let scan = sessions[0].data.as_ref().unwrap();
        assert_eq!(scan["qrcode"], "https://login.example/qr");
        assert_eq!(scan["status"], u8::from(ScanStatus::Waiting));
        assert_eq!(scan.get("type"), None);

        assert_eq!(
            sessions[1].kind,
            SessionType::Passthrough("wechat/heartbeat".into())
        );
        assert_eq!(sessions[1].data.as_ref().unwrap()["data"]["beat"], 1);

        assert_eq!(
            sessions[2].kind,
            SessionType::Passthrough("wechat/room-topic".into())
        );
        let topic = sessions[2].data.as_ref().unwrap();
        assert_eq!(topic["new_topic"], "new");
        assert_eq!(topic["changer_id"], "u2");
    }

    #[tokio::test]
    async fn error_event_is_passthrough_and_flips_status() {
        let f = fixture();
        login(&f, "self-1").await;

        f.adapter
            .bridge()
            .handle_event(PuppetEvent::Error { message: "socket hung up".into() })
            .await;

        assert_eq!(f.adapter.bot().status(), BotStatus::Offline);
        assert_eq!(
            f.adapter.bot().last_error().as_deref(),
            Some("socket hung up")
        );
        let sessions = f.handler.recorded();
        assert_eq!(
            sessions[0].kind,
            SessionType::Passthrough("wechat/error".into())
        );
        assert_eq!(sessions[0].data.as_ref().unwrap()["message"], "socket hung up");
    }

    #[tokio::test]
    async fn pump_carries_events_from_start_to_stop() {
        let f = fixture();
        f.adapter.start().await.unwrap();
        assert!(f.puppet.is_started());

        f.puppet.emit(PuppetEvent::Login { user_id: "self-1".into() });
        f.puppet.emit(PuppetEvent::Heartbeat { data: json!({"beat": 1}) });

        let mut sessions = Vec::new();
        for _ in 0..100 {
            sessions = f.handler.recorded();
            if !sessions.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(
            sessions[0].kind,
            SessionType::Passthrough("wechat/heartbeat".into())
        );
        assert_eq!(sessions[0].self_id.as_deref(), Some("self-1"));
        assert_eq!(f.adapter.bot().status(), BotStatus::Online);

        f.adapter.stop().await.unwrap();
        assert!(!f.puppet.is_started());
        assert_eq!(f.adapter.bot().status(), BotStatus::Offline);
        assert_eq!(f.puppet.event_bus().subscriber_count(), 0);
    }
}
