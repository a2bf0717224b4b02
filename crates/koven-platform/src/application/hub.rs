//! EventHub: fan-out of oven events to browser sessions.
//!
//! The device link publishes each decoded [`Event`] once; the hub translates
//! it to JSON a single time and broadcasts the text to every subscribed
//! session.
//!
//! Each session holds a [`HubSubscription`].  Creating one increments the
//! connected-client count and dropping it decrements the count again, so a
//! session that ends for any reason is never counted twice or forgotten.
//!
//! A session that falls more than `capacity` events behind sees
//! [`broadcast::error::RecvError::Lagged`] and is expected to disconnect.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use koven_core::Event;
use tokio::sync::broadcast;
use tracing::{error, trace};

use super::bridge_service::translate_event;

/// Broadcasts serialized events to all connected browser sessions.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<String>,
    clients: Arc<AtomicUsize>,
}

impl EventHub {
    /// Creates a hub whose sessions may lag by up to `capacity` events.
    ///
    /// A `capacity` of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            clients: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Translates `event` and sends it to every subscriber.
    ///
    /// Returns the number of sessions the event was queued for.
    pub fn publish(&self, event: &Event) -> usize {
        let json = match serde_json::to_string(&translate_event(event)) {
            Ok(json) => json,
            Err(e) => {
                error!("failed to serialize event: {e}");
                return 0;
            }
        };
        match self.tx.send(json) {
            Ok(n) => n,
            Err(_) => {
                trace!("no browser sessions; event dropped");
                0
            }
        }
    }

    /// Registers a new session.
    pub fn subscribe(&self) -> HubSubscription {
        let count = self.clients.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(clients = count, "session subscribed");
        HubSubscription {
            rx: self.tx.subscribe(),
            clients: Arc::clone(&self.clients),
        }
    }

    /// Number of sessions currently subscribed.
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::SeqCst)
    }
}

/// A session's view of the hub.  Dropping it unregisters the session.
#[derive(Debug)]
pub struct HubSubscription {
    rx: broadcast::Receiver<String>,
    clients: Arc<AtomicUsize>,
}

impl HubSubscription {
    /// Waits for the next serialized event.
    ///
    /// # Errors
    ///
    /// Returns `Lagged` if this session fell behind, or `Closed` once every
    /// hub handle is gone.
    pub async fn recv(&mut self) -> Result<String, broadcast::error::RecvError> {
        self.rx.recv().await
    }
}

impl Drop for HubSubscription {
    fn drop(&mut self) {
        self.clients.fetch_sub(1, Ordering::SeqCst);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
