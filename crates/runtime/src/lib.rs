//! Async orchestration for the visual-effect dispatch engine.
//!
//! This crate wires the pure pipeline from `anim-core` to its collaborators:
//! a broadcast channel for remote peers, a local playback service, and a
//! notification sink. Consumers build an [`AnimEngine`] and feed it command
//! lines and map clicks; dispatch runs on spawned tasks and the engine
//! returns before playback finishes.
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the command pipeline and its builder
//! - [`api`] exposes collaborator traits, errors, notices and outcomes
//! - [`events`] provides the topic-based bus used as the broadcast channel
//! - [`catalog`] loads manifest files into an immutable asset catalog
//! - [`clicks`] holds the single-use "next map click" subscription
//! - [`workers`] keeps the per-destination dispatch loop internal to the crate
pub mod api;
pub mod catalog;
pub mod clicks;
pub mod engine;
pub mod events;

mod workers;

pub use api::{
    BroadcastError, CommandOutcome, DispatchReport, EffectBroadcaster, EngineError, ErrorKind,
    LocalPlayback, Notice, NoticeLevel, NoticeLog, Notifier, Result, TracingNotifier,
};
pub use catalog::{
    CatalogError, CatalogSpec, DirectoryFetcher, ManifestFetcher, ManifestGroup, ingest_manifest,
    load_catalog,
};
pub use clicks::{MapClicks, PendingClick};
pub use engine::{AnimEngine, EngineBuilder, EngineConfig};
pub use events::{Event, EventBus, EventBusBroadcaster, Topic};
pub use workers::DispatchLoop;
