//! Session dispatcher.
//!
//! The [`Dispatcher`] is the host framework's event bus: adapters push
//! [`Session`]s into it, and it distributes each session to every registered
//! [`SessionHandler`] whose filter accepts it, in registration order.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, Level, debug, span};

use crate::bot::BoxedBot;
use crate::session::Session;

/// A consumer of dispatched sessions.
#[async_trait]
pub trait SessionHandler: Send + Sync {
    /// Name used in dispatch logs.
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// Filter deciding whether [`handle`](Self::handle) runs for a session.
    fn matches(&self, _session: &Session) -> bool {
        true
    }

    /// Processes one session.
    async fn handle(&self, session: &Session, bot: &BoxedBot);
}

/// The central session dispatcher.
///
/// Handlers run sequentially in registration order; a handler's filter is
/// consulted before each invocation. `Dispatcher` is `Send + Sync` and can be
/// shared across tasks behind an `Arc`.
#[derive(Default, Clone)]
pub struct Dispatcher {
    handlers: Vec<Arc<dyn SessionHandler>>,
}

impl Dispatcher {
    /// Creates a new, empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers a handler.
    pub fn add(&mut self, handler: Arc<dyn SessionHandler>) {
        self.handlers.push(handler);
    }

    /// Registers a handler (builder pattern).
    pub fn with(mut self, handler: Arc<dyn SessionHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Removes all registered handlers.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Dispatches a session to all matching handlers.
    ///
    /// Returns `true` if at least one handler accepted the session.
    pub async fn dispatch(&self, session: &Session, bot: &BoxedBot) -> bool {
        let span = span!(Level::DEBUG, "dispatch", session_type = %session.kind);
        async {
            let mut any_matched = false;
            for handler in &self.handlers {
                if handler.matches(session) {
                    any_matched = true;
                    debug!(handler = handler.name(), "invoking session handler");
                    handler.handle(session, bot).await;
                }
            }
            any_matched
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{ApiResult, Bot, BotStatus};
    use crate::session::SessionType;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockBot;

    #[async_trait]
    impl Bot for MockBot {
        fn platform(&self) -> &str {
            "test"
        }

        fn self_id(&self) -> Option<String> {
            Some("self".into())
        }

        fn username(&self) -> Option<String> {
            None
        }

        fn avatar(&self) -> Option<String> {
            None
        }

        fn status(&self) -> BotStatus {
            BotStatus::Online
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn mock_bot() -> BoxedBot {
        Arc::new(MockBot)
    }

    struct Counting {
        hits: AtomicUsize,
        only: Option<SessionType>,
    }

    impl Counting {
        fn all() -> Arc<Self> {
            Arc::new(Self {
                hits: AtomicUsize::new(0),
                only: None,
            })
        }

        fn only(kind: SessionType) -> Arc<Self> {
            Arc::new(Self {
                hits: AtomicUsize::new(0),
                only: Some(kind),
            })
        }
    }

    #[async_trait]
    impl SessionHandler for Counting {
        fn matches(&self, session: &Session) -> bool {
            self.only.as_ref().is_none_or(|kind| *kind == session.kind)
        }

        async fn handle(&self, _session: &Session, _bot: &BoxedBot) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn dispatch_without_handlers_matches_nothing() {
        let dispatcher = Dispatcher::new();
        let session = Session::new(SessionType::Message);
        assert!(!dispatcher.dispatch(&session, &mock_bot()).await);
    }

    #[tokio::test]
    async fn all_matching_handlers_run() {
        let first = Counting::all();
        let second = Counting::all();
        let dispatcher = Dispatcher::new()
            .with(first.clone())
            .with(second.clone());

        let session = Session::new(SessionType::Message);
        assert!(dispatcher.dispatch(&session, &mock_bot()).await);
        assert_eq!(first.hits.load(Ordering::SeqCst), 1);
        assert_eq!(second.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn filter_skips_non_matching_sessions() {
        let requests = Counting::only(SessionType::FriendRequest);
        let dispatcher = Dispatcher::new().with(requests.clone());

        let matched = dispatcher
            .dispatch(&Session::new(SessionType::Message), &mock_bot())
            .await;
        assert!(!matched);

        dispatcher
            .dispatch(&Session::new(SessionType::FriendRequest), &mock_bot())
            .await;
        assert_eq!(requests.hits.load(Ordering::SeqCst), 1);
    }
}
