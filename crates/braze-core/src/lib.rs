//! # Braze Core
//!
//! Host-side contracts of the Braze adapter framework.
//!
//! This crate defines the platform-agnostic shapes every adapter populates
//! and the two seams an adapter plugs into:
//!
//! - **Entities** ([`User`], [`Guild`], [`Channel`], [`GuildMember`],
//!   [`Message`]) and the typed content model ([`Element`]).
//! - **Sessions** ([`Session`], [`SessionType`]): sparse event records an
//!   adapter builds per platform event and pushes into the [`Dispatcher`].
//! - **The bot contract** ([`Bot`]): the operation surface the host calls on
//!   a live connection, with `Unsupported` defaults so adapters implement
//!   only what their platform serves.
//!
//! ```text
//! ┌───────────┐  sessions   ┌────────────┐     ┌───────────┐
//! │  Adapter  │────────────▶│ Dispatcher │────▶│  Handler  │
//! │           │◀────────────│    host    │     │  Handler  │
//! └───────────┘  bot calls  └────────────┘     └───────────┘
//! ```
//!
//! The `"private:" + userId` channel-id convention is the only on-wire
//! compatibility contract between the two sides; [`private_channel_id`] and
//! [`parse_private_channel_id`] keep it in one place.

pub mod bot;
pub mod dispatcher;
pub mod element;
pub mod entity;
pub mod session;

pub use bot::{ApiError, ApiResult, Bot, BotStatus, BoxedBot, downcast_bot};
pub use dispatcher::{Dispatcher, SessionHandler};
pub use element::{Element, render};
pub use entity::{
    Channel, Guild, GuildMember, Message, PRIVATE_PREFIX, SUBTYPE_GROUP, SUBTYPE_PRIVATE, User,
    parse_private_channel_id, private_channel_id,
};
pub use session::{Session, SessionType};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::bot::{ApiError, ApiResult, Bot, BotStatus, BoxedBot};
    pub use crate::dispatcher::{Dispatcher, SessionHandler};
    pub use crate::element::Element;
    pub use crate::entity::{Channel, Guild, GuildMember, Message, User};
    pub use crate::session::{Session, SessionType};
}
