//! Seams to the services the engine drives but does not own.
//!
//! Runtime users plug in implementations so the engine can run against a
//! real playback service and network channel, or recording fakes in tests.
use async_trait::async_trait;
use thiserror::Error;

use anim_core::EffectInstance;

use super::notice::Notice;

/// Failure to hand an instance to the broadcast channel.
#[derive(Debug, Clone, Error)]
pub enum BroadcastError {
    #[error("broadcast channel closed")]
    Closed,

    #[error("broadcast rejected: {0}")]
    Rejected(String),
}

/// Delivers effect descriptors to every remote peer.
///
/// Delivery is best effort: the engine logs a failure and keeps dispatching.
/// Implementations need not echo the instance back to the sender.
#[async_trait]
pub trait EffectBroadcaster: Send + Sync {
    async fn broadcast(&self, instance: &EffectInstance) -> Result<(), BroadcastError>;
}

/// Plays an effect on the issuing client.
pub trait LocalPlayback: Send + Sync {
    fn play(&self, instance: &EffectInstance);
}

/// Receives user-facing notifications and private diagnostics.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
