//! Worker tasks that back the engine.
//!
//! The dispatch loop plays one destination's sequence; the engine spawns one
//! per destination and does not wait for them.

mod dispatch;

pub use dispatch::DispatchLoop;
