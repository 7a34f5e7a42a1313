//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use anim_core::EffectInstance;

use crate::api::{Notice, Notifier};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Effect instances for remote peers to render
    Effects,
    /// User-facing notifications and private diagnostics
    Notices,
}

/// Event wrapper that carries the topic and typed payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Flat effect descriptor, delivered verbatim.
    Effect(EffectInstance),
    Notice(Notice),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Effect(_) => Topic::Effects,
            Event::Notice(_) => Topic::Notices,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks and never fails; events
/// published while nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    effects: broadcast::Sender<Event>,
    notices: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            effects: broadcast::channel(capacity).0,
            notices: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Effects => &self.effects,
            Topic::Notices => &self.notices,
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Returns the number of subscribers that will see it.
    pub fn publish(&self, event: Event) -> usize {
        let topic = event.topic();
        match self.sender(topic).send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                // No subscribers for this topic - this is normal, not an error
                tracing::trace!("No subscribers for topic {:?}", topic);
                0
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Number of live subscribers on a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for EventBus {
    fn notify(&self, notice: Notice) {
        self.publish(Event::Notice(notice));
    }
}
