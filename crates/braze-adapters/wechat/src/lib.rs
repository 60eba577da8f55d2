//! WeChat adapter: binds a puppet-style WeChat client to the bot host.
//!
//! The adapter sits between two contracts. Below it, a [`Puppet`](braze_puppet::Puppet)
//! implementation speaks the WeChat client protocol and pushes raw events.
//! Above it, the host consumes [`Session`](braze_core::Session)s and calls
//! back through the [`Bot`](braze_core::Bot) trait. Everything in this crate
//! translates between those two vocabularies.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use braze_adapter_wechat::{WechatAdapter, WechatConfig};
//! use braze_core::Dispatcher;
//! use braze_puppet::PuppetRegistry;
//!
//! # async fn run(registry: PuppetRegistry) -> braze_puppet::PuppetResult<()> {
//! let config = WechatConfig::new("assistant");
//! let dispatcher = Arc::new(Dispatcher::new());
//! let adapter = WechatAdapter::from_registry(config, &registry, dispatcher)?;
//! adapter.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapt;
pub mod adapter;
pub mod bot;
pub mod config;

/// Platform name reported by every bot and stamped on every session.
pub const PLATFORM: &str = "wechat";

pub use adapter::{PASSTHROUGH_EVENTS, WechatAdapter};
pub use bot::WechatBot;
pub use config::WechatConfig;
