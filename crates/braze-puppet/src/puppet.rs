//! The puppet service-provider contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::bus::EventBus;
use crate::error::{PuppetError, PuppetResult};
use crate::filebox::FileBox;
use crate::payload::{
    ContactPayload, FriendshipPayload, MessagePayload, MessageQuery, RoomInvitationPayload,
    RoomPayload, UrlLinkPayload,
};

/// Where an outgoing message is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// A one-to-one conversation with a contact.
    Contact(String),
    /// A room (group conversation).
    Room(String),
}

impl Recipient {
    /// The raw client-side id, regardless of conversation kind.
    pub fn id(&self) -> &str {
        match self {
            Recipient::Contact(id) | Recipient::Room(id) => id,
        }
    }
}

/// A shared handle to a puppet implementation.
pub type BoxedPuppet = Arc<dyn Puppet>;

/// Backend driver for one chat client protocol.
///
/// A puppet owns the connection to the chat service, reports entities through
/// payload accessors and pushes state changes onto its [`EventBus`]. Payload
/// accessors return `Ok(None)` when the entity does not exist; `Err` is
/// reserved for transport and protocol failures.
///
/// Every operation beyond the lifecycle defaults to
/// [`PuppetError::Unsupported`], so an implementation only overrides what its
/// protocol can actually do.
#[async_trait]
pub trait Puppet: Send + Sync {
    /// The registered puppet name, e.g. `"web"`.
    fn name(&self) -> &str;

    /// The bus this puppet emits events on.
    fn event_bus(&self) -> Arc<EventBus>;

    /// Connects to the chat service and begins emitting events.
    async fn start(&self) -> PuppetResult<()>;

    /// Disconnects and stops emitting events.
    async fn stop(&self) -> PuppetResult<()>;

    async fn contact_payload(&self, _contact_id: &str) -> PuppetResult<Option<ContactPayload>> {
        Err(PuppetError::unsupported("contact_payload"))
    }

    async fn contact_list(&self) -> PuppetResult<Vec<String>> {
        Err(PuppetError::unsupported("contact_list"))
    }

    async fn contact_avatar(&self, _contact_id: &str) -> PuppetResult<Option<FileBox>> {
        Err(PuppetError::unsupported("contact_avatar"))
    }

    async fn room_payload(&self, _room_id: &str) -> PuppetResult<Option<RoomPayload>> {
        Err(PuppetError::unsupported("room_payload"))
    }

    async fn room_list(&self) -> PuppetResult<Vec<String>> {
        Err(PuppetError::unsupported("room_list"))
    }

    /// Reads the room topic. May be a network round-trip on the client side.
    async fn room_topic(&self, _room_id: &str) -> PuppetResult<String> {
        Err(PuppetError::unsupported("room_topic"))
    }

    async fn message_payload(&self, _message_id: &str) -> PuppetResult<Option<MessagePayload>> {
        Err(PuppetError::unsupported("message_payload"))
    }

    /// Returns ids of stored messages matching `query`, oldest first.
    async fn message_search(&self, _query: &MessageQuery) -> PuppetResult<Vec<String>> {
        Err(PuppetError::unsupported("message_search"))
    }

    /// The file attached to a message, for attachment-bearing message types.
    async fn message_file(&self, _message_id: &str) -> PuppetResult<Option<FileBox>> {
        Err(PuppetError::unsupported("message_file"))
    }

    /// The link card carried by a URL message.
    async fn message_url(&self, _message_id: &str) -> PuppetResult<Option<UrlLinkPayload>> {
        Err(PuppetError::unsupported("message_url"))
    }

    /// The contact id carried by a contact-card message.
    async fn message_contact(&self, _message_id: &str) -> PuppetResult<Option<String>> {
        Err(PuppetError::unsupported("message_contact"))
    }

    /// Sends plain text, mentioning `mention_ids` where the protocol supports
    /// it. Returns the new message id if the client reports one.
    async fn message_send_text(
        &self,
        _to: &Recipient,
        _text: &str,
        _mention_ids: &[String],
    ) -> PuppetResult<Option<String>> {
        Err(PuppetError::unsupported("message_send_text"))
    }

    async fn message_send_file(
        &self,
        _to: &Recipient,
        _file: &FileBox,
    ) -> PuppetResult<Option<String>> {
        Err(PuppetError::unsupported("message_send_file"))
    }

    async fn message_send_contact(
        &self,
        _to: &Recipient,
        _contact_id: &str,
    ) -> PuppetResult<Option<String>> {
        Err(PuppetError::unsupported("message_send_contact"))
    }

    async fn message_send_url(
        &self,
        _to: &Recipient,
        _link: &UrlLinkPayload,
    ) -> PuppetResult<Option<String>> {
        Err(PuppetError::unsupported("message_send_url"))
    }

    async fn friendship_payload(
        &self,
        _friendship_id: &str,
    ) -> PuppetResult<Option<FriendshipPayload>> {
        Err(PuppetError::unsupported("friendship_payload"))
    }

    async fn friendship_accept(&self, _friendship_id: &str) -> PuppetResult<()> {
        Err(PuppetError::unsupported("friendship_accept"))
    }

    async fn room_invitation_payload(
        &self,
        _invitation_id: &str,
    ) -> PuppetResult<Option<RoomInvitationPayload>> {
        Err(PuppetError::unsupported("room_invitation_payload"))
    }

    async fn room_invitation_accept(&self, _invitation_id: &str) -> PuppetResult<()> {
        Err(PuppetError::unsupported("room_invitation_accept"))
    }
}

impl std::fmt::Debug for dyn Puppet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puppet").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BarePuppet {
        bus: Arc<EventBus>,
    }

    #[async_trait]
    impl Puppet for BarePuppet {
        fn name(&self) -> &str {
            "bare"
        }

        fn event_bus(&self) -> Arc<EventBus> {
            Arc::clone(&self.bus)
        }

        async fn start(&self) -> PuppetResult<()> {
            Ok(())
        }

        async fn stop(&self) -> PuppetResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unimplemented_operations_report_unsupported() {
        let puppet = BarePuppet { bus: Arc::new(EventBus::new()) };
        let err = puppet.contact_list().await.unwrap_err();
        assert!(matches!(
            err,
            PuppetError::Unsupported { operation: "contact_list" }
        ));
    }

    #[test]
    fn recipient_exposes_raw_id() {
        assert_eq!(Recipient::Contact("u1".into()).id(), "u1");
        assert_eq!(Recipient::Room("r1".into()).id(), "r1");
    }
}
