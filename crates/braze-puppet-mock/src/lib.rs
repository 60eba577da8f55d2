//! # Braze Puppet Mock
//!
//! A scriptable, in-memory [`Puppet`] for exercising adapters without a chat
//! client. Tests preload payloads with the `put_*` methods, push events with
//! [`MockPuppet::emit`], and inspect what the adapter sent through
//! [`MockPuppet::sent`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use braze_puppet::{
    BoxedPuppet, ContactPayload, EventBus, FileBox, FriendshipPayload, MessagePayload,
    MessageQuery, Puppet, PuppetError, PuppetEvent, PuppetRegistry, PuppetResult, Recipient,
    RoomInvitationPayload, RoomPayload, UrlLinkPayload,
};

/// One message the adapter asked the mock to send.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Text {
        to: Recipient,
        text: String,
        mention_ids: Vec<String>,
    },
    File {
        to: Recipient,
        file: FileBox,
    },
    Contact {
        to: Recipient,
        contact_id: String,
    },
    Url {
        to: Recipient,
        link: UrlLinkPayload,
    },
}

#[derive(Default)]
struct MockState {
    contacts: HashMap<String, ContactPayload>,
    avatars: HashMap<String, FileBox>,
    rooms: HashMap<String, RoomPayload>,
    topics: HashMap<String, String>,
    messages: HashMap<String, MessagePayload>,
    files: HashMap<String, FileBox>,
    urls: HashMap<String, UrlLinkPayload>,
    message_contacts: HashMap<String, String>,
    friendships: HashMap<String, FriendshipPayload>,
    invitations: HashMap<String, RoomInvitationPayload>,
}

/// In-memory puppet whose world is whatever the test scripts into it.
#[derive(Default)]
pub struct MockPuppet {
    bus: Arc<EventBus>,
    state: RwLock<MockState>,
    sent: Mutex<Vec<SentMessage>>,
    accepted_friendships: Mutex<Vec<String>>,
    accepted_invitations: Mutex<Vec<String>>,
    started: AtomicBool,
    next_message_id: AtomicU64,
}

impl MockPuppet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers this mock under the name `"mock"`.
    pub fn register(registry: &PuppetRegistry) {
        registry.register("mock", |_options| {
            Ok(Arc::new(MockPuppet::new()) as BoxedPuppet)
        });
    }

    pub fn put_contact(&self, payload: ContactPayload) {
        self.state.write().contacts.insert(payload.id.clone(), payload);
    }

    pub fn put_avatar(&self, contact_id: impl Into<String>, avatar: FileBox) {
        self.state.write().avatars.insert(contact_id.into(), avatar);
    }

    pub fn put_room(&self, payload: RoomPayload) {
        self.state.write().rooms.insert(payload.id.clone(), payload);
    }

    pub fn put_topic(&self, room_id: impl Into<String>, topic: impl Into<String>) {
        self.state.write().topics.insert(room_id.into(), topic.into());
    }

    pub fn put_message(&self, payload: MessagePayload) {
        self.state.write().messages.insert(payload.id.clone(), payload);
    }

    pub fn put_file(&self, message_id: impl Into<String>, file: FileBox) {
        self.state.write().files.insert(message_id.into(), file);
    }

    pub fn put_url(&self, message_id: impl Into<String>, link: UrlLinkPayload) {
        self.state.write().urls.insert(message_id.into(), link);
    }

    pub fn put_message_contact(
        &self,
        message_id: impl Into<String>,
        contact_id: impl Into<String>,
    ) {
        self.state
            .write()
            .message_contacts
            .insert(message_id.into(), contact_id.into());
    }

    pub fn put_friendship(&self, payload: FriendshipPayload) {
        self.state
            .write()
            .friendships
            .insert(payload.id.clone(), payload);
    }

    pub fn put_invitation(&self, payload: RoomInvitationPayload) {
        self.state
            .write()
            .invitations
            .insert(payload.id.clone(), payload);
    }

    /// Pushes an event onto the bus as if the client produced it.
    pub fn emit(&self, event: PuppetEvent) -> usize {
        self.bus.emit(event)
    }

    /// Everything the adapter sent, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn accepted_friendships(&self) -> Vec<String> {
        self.accepted_friendships.lock().clone()
    }

    pub fn accepted_invitations(&self) -> Vec<String> {
        self.accepted_invitations.lock().clone()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> String {
        let n = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        format!("mock-msg-{n}")
    }
}

#[async_trait]
impl Puppet for MockPuppet {
    fn name(&self) -> &str {
        "mock"
    }

    fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    async fn start(&self) -> PuppetResult<()> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> PuppetResult<()> {
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn contact_payload(&self, contact_id: &str) -> PuppetResult<Option<ContactPayload>> {
        Ok(self.state.read().contacts.get(contact_id).cloned())
    }

    async fn contact_list(&self) -> PuppetResult<Vec<String>> {
        let mut ids: Vec<_> = self.state.read().contacts.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn contact_avatar(&self, contact_id: &str) -> PuppetResult<Option<FileBox>> {
        Ok(self.state.read().avatars.get(contact_id).cloned())
    }

    async fn room_payload(&self, room_id: &str) -> PuppetResult<Option<RoomPayload>> {
        Ok(self.state.read().rooms.get(room_id).cloned())
    }

    async fn room_list(&self) -> PuppetResult<Vec<String>> {
        let mut ids: Vec<_> = self.state.read().rooms.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn room_topic(&self, room_id: &str) -> PuppetResult<String> {
        self.state
            .read()
            .topics
            .get(room_id)
            .cloned()
            .ok_or_else(|| PuppetError::not_found(format!("topic of room {room_id}")))
    }

    async fn message_payload(&self, message_id: &str) -> PuppetResult<Option<MessagePayload>> {
        Ok(self.state.read().messages.get(message_id).cloned())
    }

    async fn message_search(&self, query: &MessageQuery) -> PuppetResult<Vec<String>> {
        let state = self.state.read();
        let mut hits: Vec<_> = state
            .messages
            .values()
            .filter(|m| {
                query
                    .room_id
                    .as_ref()
                    .is_none_or(|room| m.room_id.as_deref() == Some(room.as_str()))
            })
            .filter(|m| {
                query
                    .talker_id
                    .as_ref()
                    .is_none_or(|talker| m.talker_id == *talker)
            })
            .collect();
        hits.sort_by(|a, b| a.timestamp_ms.cmp(&b.timestamp_ms).then(a.id.cmp(&b.id)));
        Ok(hits.into_iter().map(|m| m.id.clone()).collect())
    }

    async fn message_file(&self, message_id: &str) -> PuppetResult<Option<FileBox>> {
        Ok(self.state.read().files.get(message_id).cloned())
    }

    async fn message_url(&self, message_id: &str) -> PuppetResult<Option<UrlLinkPayload>> {
        Ok(self.state.read().urls.get(message_id).cloned())
    }

    async fn message_contact(&self, message_id: &str) -> PuppetResult<Option<String>> {
        Ok(self.state.read().message_contacts.get(message_id).cloned())
    }

    async fn message_send_text(
        &self,
        to: &Recipient,
        text: &str,
        mention_ids: &[String],
    ) -> PuppetResult<Option<String>> {
        self.sent.lock().push(SentMessage::Text {
            to: to.clone(),
            text: text.to_string(),
            mention_ids: mention_ids.to_vec(),
        });
        Ok(Some(self.next_id()))
    }

    async fn message_send_file(
        &self,
        to: &Recipient,
        file: &FileBox,
    ) -> PuppetResult<Option<String>> {
        self.sent.lock().push(SentMessage::File {
            to: to.clone(),
            file: file.clone(),
        });
        Ok(Some(self.next_id()))
    }

    async fn message_send_contact(
        &self,
        to: &Recipient,
        contact_id: &str,
    ) -> PuppetResult<Option<String>> {
        self.sent.lock().push(SentMessage::Contact {
            to: to.clone(),
            contact_id: contact_id.to_string(),
        });
        Ok(Some(self.next_id()))
    }

    async fn message_send_url(
        &self,
        to: &Recipient,
        link: &UrlLinkPayload,
    ) -> PuppetResult<Option<String>> {
        self.sent.lock().push(SentMessage::Url {
            to: to.clone(),
            link: link.clone(),
        });
        Ok(Some(self.next_id()))
    }

    async fn friendship_payload(
        &self,
        friendship_id: &str,
    ) -> PuppetResult<Option<FriendshipPayload>> {
        Ok(self.state.read().friendships.get(friendship_id).cloned())
    }

    async fn friendship_accept(&self, friendship_id: &str) -> PuppetResult<()> {
        self.accepted_friendships
            .lock()
            .push(friendship_id.to_string());
        Ok(())
    }

    async fn room_invitation_payload(
        &self,
        invitation_id: &str,
    ) -> PuppetResult<Option<RoomInvitationPayload>> {
        Ok(self.state.read().invitations.get(invitation_id).cloned())
    }

    async fn room_invitation_accept(&self, invitation_id: &str) -> PuppetResult<()> {
        self.accepted_invitations
            .lock()
            .push(invitation_id.to_string());
        Ok(())
    }
}
