//! Public engine API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the engine and workers can stay focused on orchestration.

pub mod collaborators;
pub mod errors;
pub mod notice;
pub mod outcome;

pub use collaborators::{BroadcastError, EffectBroadcaster, LocalPlayback, Notifier};
pub use errors::{EngineError, ErrorKind, Result};
pub use notice::{Notice, NoticeLevel, NoticeLog, TracingNotifier};
pub use outcome::{CommandOutcome, DispatchReport};
