//! Topic-based event bus for engine events.
//!
//! Effect instances are published to [`Topic::Effects`] for remote peers, and
//! notices to [`Topic::Notices`] for front-ends.

mod broadcaster;
mod bus;

pub use broadcaster::EventBusBroadcaster;
pub use bus::{Event, EventBus, Topic};
