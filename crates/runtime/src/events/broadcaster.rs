//! [`EffectBroadcaster`] backed by the in-process [`EventBus`].
//!
//! Peers (network bridges, other front-ends) subscribe to [`Topic::Effects`]
//! and forward or render what they receive.
use async_trait::async_trait;

use anim_core::EffectInstance;

use super::bus::{Event, EventBus, Topic};
use crate::api::{BroadcastError, EffectBroadcaster};

#[derive(Clone, Default)]
pub struct EventBusBroadcaster {
    bus: EventBus,
}

impl EventBusBroadcaster {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl EffectBroadcaster for EventBusBroadcaster {
    async fn broadcast(&self, instance: &EffectInstance) -> Result<(), BroadcastError> {
        let peers = self.bus.publish(Event::Effect(instance.clone()));
        tracing::trace!(
            file = %instance.file_name(),
            peers,
            "broadcast on {:?}",
            Topic::Effects
        );
        Ok(())
    }
}
