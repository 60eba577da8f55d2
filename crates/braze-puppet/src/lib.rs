//! # Braze Puppet
//!
//! Client-side contracts of the Braze adapter framework.
//!
//! A *puppet* drives one concrete chat client protocol and hides it behind a
//! uniform surface:
//!
//! - **Payloads** ([`ContactPayload`], [`RoomPayload`], [`MessagePayload`],
//!   ...): flat records keyed by client-side ids, with closed numeric code
//!   enums ([`MessageType`], [`FriendshipType`], [`ScanStatus`]).
//! - **Events** ([`PuppetEvent`]): id-bearing notifications fanned out over
//!   the [`EventBus`]; subscribers fetch details through payload accessors.
//! - **The puppet contract** ([`Puppet`]): lifecycle, payload accessors and
//!   send operations, with `Unsupported` defaults so an implementation only
//!   overrides what its protocol can do.
//! - **Construction** ([`PuppetRegistry`]): configuration picks an
//!   implementation by name and hands it JSON options.
//!
//! File content moves through [`FileBox`], which stays lazy for remote URLs.

pub mod bus;
pub mod error;
pub mod event;
pub mod filebox;
pub mod payload;
pub mod puppet;
pub mod registry;

pub use bus::{EventBus, Subscription};
pub use error::{PuppetError, PuppetResult};
pub use event::PuppetEvent;
pub use filebox::FileBox;
pub use payload::{
    ContactPayload, FriendshipPayload, FriendshipType, MessagePayload, MessageQuery, MessageType,
    RoomInvitationPayload, RoomPayload, ScanStatus, UrlLinkPayload,
};
pub use puppet::{BoxedPuppet, Puppet, Recipient};
pub use registry::{PuppetFactory, PuppetRegistry};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::bus::{EventBus, Subscription};
    pub use crate::error::{PuppetError, PuppetResult};
    pub use crate::event::PuppetEvent;
    pub use crate::filebox::FileBox;
    pub use crate::payload::{
        ContactPayload, FriendshipPayload, FriendshipType, MessagePayload, MessageQuery,
        MessageType, RoomInvitationPayload, RoomPayload, ScanStatus, UrlLinkPayload,
    };
    pub use crate::puppet::{BoxedPuppet, Puppet, Recipient};
    pub use crate::registry::PuppetRegistry;
}
