//! Dispatch worker that plays one destination's instance sequence.
//!
//! Each instance is broadcast to peers and played locally, then the loop
//! sleeps for the instance delay before the next one. Sequences for different
//! destinations run as independent tasks; within a sequence, instance `k` and
//! its delay always complete before instance `k + 1` is emitted.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::{debug, trace, warn};

use anim_core::EffectInstance;

use crate::api::{EffectBroadcaster, LocalPlayback};

/// Rate-limited fan-out of an instance sequence.
#[derive(Clone)]
pub struct DispatchLoop {
    broadcaster: Arc<dyn EffectBroadcaster>,
    playback: Arc<dyn LocalPlayback>,
}

impl DispatchLoop {
    pub fn new(broadcaster: Arc<dyn EffectBroadcaster>, playback: Arc<dyn LocalPlayback>) -> Self {
        Self {
            broadcaster,
            playback,
        }
    }

    /// Emits every instance in order and returns the file names played.
    ///
    /// A failed broadcast is logged and does not stop local playback or the
    /// rest of the sequence. There is no cancellation: once started, the
    /// sequence runs to completion.
    pub async fn run(self, instances: Vec<EffectInstance>) -> Vec<String> {
        let mut remaining = instances.len();
        let mut used = Vec::with_capacity(remaining);

        for instance in instances {
            remaining -= 1;

            if let Err(err) = self.broadcaster.broadcast(&instance).await {
                warn!(file = %instance.file_name(), "broadcast failed: {}", err);
            }
            self.playback.play(&instance);

            debug!(
                file = %instance.file_name(),
                sequence = instance.sequence,
                remaining,
                "effect dispatched"
            );
            trace!(
                payload = %serde_json::to_string(&instance).unwrap_or_default(),
                "effect payload"
            );
            used.push(instance.file_name().to_string());

            if remaining > 0 {
                sleep(Duration::from_millis(instance.delay_ms)).await;
            }
        }

        used
    }

    /// Runs the sequence on its own task.
    pub fn spawn(self, instances: Vec<EffectInstance>) -> JoinHandle<Vec<String>> {
        tokio::spawn(self.run(instances))
    }
}
