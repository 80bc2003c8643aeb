//! Change notifications for views that display builds.
//!
//! Workflows publish a `BuildEvent` after each successful mutation. The
//! presentation layer subscribes and refreshes the views the event names; the
//! store itself knows nothing about views.

use domains::BuildEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffer size for the broadcast channel. Slow subscribers lag rather than
/// block publishers.
const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BuildEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUFFER)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BuildEvent> {
        self.sender.subscribe()
    }

    /// Never fails: an event with no subscribers is simply dropped.
    pub fn publish(&self, event: BuildEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "published build event"),
            Err(broadcast::error::SendError(event)) => {
                debug!(build_id = %event.build_id(), "no subscribers for build event")
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
