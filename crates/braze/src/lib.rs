//! # Braze
//!
//! Chat-platform adapters over replaceable puppet clients.
//!
//! ## Overview
//!
//! Braze splits a chat bot integration into three layers:
//!
//! ```text
//! ┌──────────────┐      ┌───────────────────┐      ┌───────────────┐
//! │   Puppet     │─────▶│     Adapter       │─────▶│     Host      │
//! │ (client      │      │ (event bridge +   │      │ (dispatcher + │
//! │  protocol)   │◀─────│  bot facade)      │◀─────│  handlers)    │
//! └──────────────┘      └───────────────────┘      └───────────────┘
//! ```
//!
//! - **Puppets** speak one concrete client protocol and push raw
//!   [`PuppetEvent`](braze_puppet::PuppetEvent)s
//! - **Adapters** translate those events into universal
//!   [`Session`](braze_core::Session)s and map host calls back onto puppet
//!   operations
//! - **Hosts** register [`SessionHandler`](braze_core::SessionHandler)s on a
//!   dispatcher and act through the [`Bot`](braze_core::Bot) trait
//!
//! Swapping the underlying client (for example moving from a web-protocol
//! puppet to a pad-protocol one) never touches host code: only the puppet
//! registered under the configured name changes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use braze::prelude::*;
//! use braze::wechat::{WechatAdapter, WechatConfig};
//!
//! #[tokio::main]
//! async fn main() -> PuppetResult<()> {
//!     let registry = PuppetRegistry::new();
//!     // register concrete puppet implementations here
//!
//!     let dispatcher = Arc::new(Dispatcher::new());
//!     let adapter = WechatAdapter::from_registry(
//!         WechatConfig::new("assistant"),
//!         &registry,
//!         dispatcher,
//!     )?;
//!     adapter.start().await
//! }
//! ```
//!
//! ## Features
//!
//! - `adapter-wechat` (default): the WeChat adapter, re-exported as
//!   [`wechat`]

pub use braze_core as core;
pub use braze_puppet as puppet;

#[cfg(feature = "adapter-wechat")]
pub use braze_adapter_wechat as wechat;

/// Commonly used types, importable in one line.
///
/// ```rust,ignore
/// use braze::prelude::*;
/// ```
pub mod prelude {
    pub use braze_core::prelude::*;
    pub use braze_puppet::prelude::*;

    #[cfg(feature = "adapter-wechat")]
    pub use braze_adapter_wechat::{WechatAdapter, WechatBot, WechatConfig};
}
