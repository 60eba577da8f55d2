//! Event distribution between a puppet and its subscribers.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use crate::event::PuppetEvent;

type SubscriberMap = HashMap<u64, mpsc::UnboundedSender<PuppetEvent>>;

/// Fan-out channel for [`PuppetEvent`]s.
///
/// Every subscriber receives its own clone of each emitted event. Subscribers
/// detach either explicitly through [`Subscription::unsubscribe`] or
/// implicitly when the [`Subscription`] is dropped; closed channels are also
/// swept out on the next emit.
#[derive(Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<SubscriberMap>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().insert(id, sender);
        trace!(subscriber = id, "event bus subscription added");
        Subscription {
            id,
            receiver,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Delivers `event` to every live subscriber and returns how many
    /// received it.
    pub fn emit(&self, event: PuppetEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|_, sender| sender.send(event.clone()).is_ok());
        let delivered = subscribers.len();
        if delivered < before {
            trace!(swept = before - delivered, "dropped closed event bus subscribers");
        }
        trace!(event = event.name(), delivered, "event emitted");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A live subscription to an [`EventBus`].
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<PuppetEvent>,
    subscribers: Arc<Mutex<SubscriberMap>>,
}

impl Subscription {
    /// Waits for the next event. Returns `None` once the subscription has
    /// been detached and the queue drained.
    pub async fn recv(&mut self) -> Option<PuppetEvent> {
        self.receiver.recv().await
    }

    /// Detaches from the bus, dropping any queued events.
    pub fn unsubscribe(self) {
        // Drop handles removal.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers.lock().remove(&self.id);
        trace!(subscriber = self.id, "event bus subscription removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(user_id: &str) -> PuppetEvent {
        PuppetEvent::Login { user_id: user_id.into() }
    }

    #[tokio::test]
    async fn every_subscriber_receives_each_event() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.emit(login("u1")), 2);
        assert_eq!(first.recv().await, Some(login("u1")));
        assert_eq!(second.recv().await, Some(login("u1")));
    }

    #[tokio::test]
    async fn dropped_subscription_detaches() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.emit(login("u1")), 0);
    }

    #[tokio::test]
    async fn unsubscribe_detaches() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn events_queue_until_received() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();

        bus.emit(login("u1"));
        bus.emit(login("u2"));

        assert_eq!(sub.recv().await, Some(login("u1")));
        assert_eq!(sub.recv().await, Some(login("u2")));
    }
}
