//! Adapter configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_puppet() -> String {
    "web".to_string()
}

fn default_puppet_options() -> Value {
    serde_json::json!({ "uos": true })
}

/// Configuration for one adapter instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WechatConfig {
    /// Profile name. Doubles as the client's credential cache identifier, so
    /// two instances with the same name share a login.
    pub name: String,
    /// Puppet implementation to build, by registered name.
    #[serde(default = "default_puppet")]
    pub puppet: String,
    /// Options bag handed verbatim to the puppet factory.
    #[serde(default = "default_puppet_options")]
    pub puppet_options: Value,
}

impl WechatConfig {
    /// Creates a configuration with the given profile name and the default
    /// puppet selection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            puppet: default_puppet(),
            puppet_options: default_puppet_options(),
        }
    }
}
