//! Name-based puppet construction.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::{PuppetError, PuppetResult};
use crate::puppet::BoxedPuppet;

/// Builds a puppet from its JSON options.
pub type PuppetFactory = dyn Fn(Value) -> PuppetResult<BoxedPuppet> + Send + Sync;

/// Registry mapping puppet names to factories.
///
/// Implementations register themselves under a stable name (`"web"`,
/// `"mock"`, ...) and configuration selects one by that name at startup.
/// Registering a name twice replaces the earlier factory.
#[derive(Default)]
pub struct PuppetRegistry {
    factories: RwLock<HashMap<String, Arc<PuppetFactory>>>,
}

impl PuppetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(Value) -> PuppetResult<BoxedPuppet> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(puppet = %name, "puppet factory registered");
        self.factories.write().insert(name, Arc::new(factory));
    }

    /// Instantiates the puppet registered under `name` with `options`.
    pub fn create(&self, name: &str, options: Value) -> PuppetResult<BoxedPuppet> {
        let factory = self
            .factories
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PuppetError::unknown_puppet(name))?;
        debug!(puppet = name, "creating puppet");
        factory(options)
    }

    /// Registered puppet names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for PuppetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuppetRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use crate::puppet::Puppet;
    use async_trait::async_trait;

    struct NullPuppet {
        bus: Arc<EventBus>,
    }

    #[async_trait]
    impl Puppet for NullPuppet {
        fn name(&self) -> &str {
            "null"
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

    #[test]
    fn creates_registered_puppets_with_options() {
        let registry = PuppetRegistry::new();
        registry.register("null", |options| {
            assert_eq!(options["uos"], true);
            Ok(Arc::new(NullPuppet {
                bus: Arc::new(EventBus::new()),
            }) as BoxedPuppet)
        });

        let puppet = registry
            .create("null", serde_json::json!({"uos": true}))
            .unwrap();
        assert_eq!(puppet.name(), "null");
        assert!(registry.names().contains(&"null".to_string()));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let registry = PuppetRegistry::new();
        let err = registry.create("web", Value::Null).unwrap_err();
        assert!(matches!(err, PuppetError::UnknownPuppet { .. }));
    }
}
