//! Single-use "next map click" subscription for the deferred-click flow.
//!
//! At most one subscription is pending at a time. Subscribing again, or
//! cancelling, drops the previous sender so its waiter resolves to `None`.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use anim_core::Point;

/// Shared slot for the pending click subscription.
#[derive(Clone, Default)]
pub struct MapClicks {
    slot: Arc<Mutex<Option<oneshot::Sender<Point>>>>,
}

/// Waiter for one map click.
#[derive(Debug)]
pub struct PendingClick {
    rx: oneshot::Receiver<Point>,
}

impl PendingClick {
    /// Resolves with the clicked point, or `None` if the subscription was
    /// replaced or cancelled.
    pub async fn wait(self) -> Option<Point> {
        self.rx.await.ok()
    }
}

impl MapClicks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<oneshot::Sender<Point>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers for the next click, cancelling any earlier registration.
    pub fn subscribe(&self) -> PendingClick {
        let (tx, rx) = oneshot::channel();
        if self.slot().replace(tx).is_some() {
            tracing::debug!("replaced pending map click subscription");
        }
        PendingClick { rx }
    }

    /// Drops the pending subscription. Returns true if one existed.
    pub fn cancel(&self) -> bool {
        self.slot().take().is_some()
    }

    /// Delivers a click to the pending subscriber.
    ///
    /// Returns false if nobody was waiting; the click is then ignored.
    pub fn click(&self, point: Point) -> bool {
        match self.slot().take() {
            Some(tx) => tx.send(point).is_ok(),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|tx| !tx.is_closed())
    }
}
