//! Notification fan-out
//!
//! Synchronous listeners run in registration order; a broadcast channel serves async
//! subscribers. Listeners are invoked with no internal lock held, so they may call
//! back into the client.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::events::{ClientEvent, EventKind};

/// Buffered notifications per broadcast subscriber
const BROADCAST_CAPACITY: usize = 256;

/// Listener callback
pub type Listener = Arc<dyn Fn(&ClientEvent) + Send + Sync>;

pub struct Notifier {
    listeners: RwLock<Vec<(EventKind, Listener)>>,
    broadcast: broadcast::Sender<ClientEvent>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            listeners: RwLock::new(Vec::new()),
            broadcast,
        }
    }

    /// Register a listener for `kind`
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push((kind, Arc::new(listener)));
    }

    /// Receiver for every notification raised from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.broadcast.subscribe()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.read().iter().filter(|(k, _)| *k == kind).count()
    }

    /// Raise a notification
    pub fn emit(&self, event: ClientEvent) {
        let kind = event.kind();
        let targets: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, l)| l.clone())
            .collect();

        for listener in targets {
            listener(&event);
        }

        // No subscribers is fine
        let _ = self.broadcast.send(event);
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = ClientEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Raise a `debug` notification
    pub fn debug(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(notification = "debug", "{message}");
        self.emit(ClientEvent::Debug(message));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.read().len())
            .field("subscribers", &self.broadcast.receiver_count())
            .finish()
    }
}
